//! Globe scene content: the visible sphere, location markers, and the
//! invisible collision sphere used for picking.

use bevy::prelude::*;
use fellowsphere::geo::lat_lon_to_point;

use crate::content::Locations;
use crate::picking::GlobeSelection;

/// Radius of the visible globe.
pub const GLOBE_RADIUS: f32 = 1.0;
/// Radius of the invisible collision sphere. Larger than the globe so
/// near-grazing clicks at the visual edge still register.
pub const PICK_SPHERE_RADIUS: f32 = GLOBE_RADIUS * 1.08;
/// Radius of a location marker sphere.
const MARKER_RADIUS: f32 = 0.025;
/// Markers sit a hair above the surface so they are not z-fighting the globe.
const MARKER_ALTITUDE: f64 = 1.01;
/// Scale applied to the selected marker.
const SELECTED_MARKER_SCALE: f32 = 1.6;

/// Plugin for the globe scene.
pub struct GlobePlugin;

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_globe)
            .add_systems(Update, (respawn_markers, highlight_selected_marker).chain());
    }
}

/// The invisible picking proxy for the globe.
///
/// Carries no mesh; the picking system intersects cursor rays against this
/// radius around the entity's translation.
#[derive(Component)]
pub struct PickSphere {
    pub radius: f32,
}

/// Marker sphere for one location, by index into the session's set.
#[derive(Component)]
struct LocationMarker {
    index: usize,
    base_color: Color,
}

/// Spawn the globe and its collision sphere.
fn spawn_globe(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(GLOBE_RADIUS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.08, 0.16, 0.30),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::IDENTITY,
    ));

    commands.spawn((
        PickSphere {
            radius: PICK_SPHERE_RADIUS,
        },
        Transform::IDENTITY,
    ));
}

/// (Re)spawn one marker per location whenever the list changes.
///
/// The list changes once at plugin init and at most once more when the
/// content fetch lands, so despawn-and-respawn is the simple correct move.
#[allow(clippy::needless_pass_by_value)]
fn respawn_markers(
    locations: Res<Locations>,
    existing: Query<Entity, With<LocationMarker>>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !locations.is_changed() {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let mesh = meshes.add(Sphere::new(MARKER_RADIUS));
    for (index, location) in locations.iter().enumerate() {
        let color = hex_to_color(&location.color).unwrap_or_else(|| {
            tracing::warn!(id = %location.id, color = %location.color, "unparseable marker color");
            Color::srgb(0.9, 0.4, 0.3)
        });
        let position =
            lat_lon_to_point(location.latitude, location.longitude, MARKER_ALTITUDE).as_vec3();

        commands.spawn((
            LocationMarker {
                index,
                base_color: color,
            },
            Mesh3d(mesh.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                ..default()
            })),
            Transform::from_translation(position),
        ));
    }

    tracing::info!(count = locations.len(), "spawned location markers");
}

/// Scale up and light the selected marker; restore the rest.
#[allow(clippy::needless_pass_by_value)]
fn highlight_selected_marker(
    selection: Res<GlobeSelection>,
    mut markers: Query<(&LocationMarker, &mut Transform, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !selection.is_changed() {
        return;
    }

    for (marker, mut transform, material_handle) in &mut markers {
        let is_selected = selection.selected() == Some(marker.index);
        transform.scale = if is_selected {
            Vec3::splat(SELECTED_MARKER_SCALE)
        } else {
            Vec3::ONE
        };
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.emissive = if is_selected {
                marker.base_color.to_linear() * 0.8
            } else {
                LinearRgba::BLACK
            };
        }
    }
}

/// Parse a `#rrggbb` hex string into a color.
fn hex_to_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color::srgb_u8(r, g, b))
}
