//! Pointer handling: gesture classification, globe picking, and selection.
//!
//! One resource tracks the in-flight gesture and the fallback cursor; the
//! pointer-up system runs the whole resolution chain synchronously, so every
//! click observes the cursor writes of the click before it.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;
use fellowsphere::{
    FallbackCycler, Gesture, GestureTracker, LocationSet, Resolution, SelectionState,
    ray_sphere_intersection, resolve_nearest,
};
use glam::DVec3;

use crate::camera::AutoRotate;
use crate::content::Locations;
use crate::globe::PickSphere;

/// Plugin for pointer-driven location selection.
pub struct PickingPlugin;

impl Plugin for PickingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
            .init_resource::<GlobeSelection>()
            .add_systems(Update, (pointer_down, pointer_move, pointer_up).chain());
    }
}

/// Gesture tracking and the fallback cursor.
///
/// `tracker` is `Some` only between a pointer-down on the globe and the
/// matching pointer-up. The cycler lives here so it is owned, single-writer
/// state read in the same handler that mutates it.
#[derive(Resource, Default)]
pub struct PointerState {
    pub tracker: Option<GestureTracker>,
    pub cycler: FallbackCycler,
}

/// The current selection, as shown by the details panel.
#[derive(Resource, Default)]
pub struct GlobeSelection {
    pub state: SelectionState,
}

impl GlobeSelection {
    /// Index of the selected location, if any.
    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }
}

/// Select a location by index, pausing auto-rotation.
pub fn select_location(
    index: usize,
    locations: &LocationSet,
    selection: &mut GlobeSelection,
    auto_rotate: &mut AutoRotate,
    now: f64,
) {
    let Some(location) = locations.get(index) else {
        return;
    };
    tracing::debug!(name = %location.name, "location selected");
    selection.state.select(index);
    auto_rotate.pause(now);
}

/// Select a location by display name, e.g. from a quick-pick button.
///
/// Bypasses gesture classification entirely; unknown names are ignored.
pub fn select_by_name(
    name: &str,
    locations: &LocationSet,
    selection: &mut GlobeSelection,
    auto_rotate: &mut AutoRotate,
    now: f64,
) {
    if let Some(index) = locations.find_by_name(name) {
        select_location(index, locations, selection, auto_rotate, now);
    } else {
        tracing::warn!(name, "quick-pick for unknown location");
    }
}

/// Resolve a click point on the collision sphere to a location index.
///
/// Geometric rejections fall through to the cycler; only an empty list
/// yields `None`.
fn resolve_click_point(
    point: Option<DVec3>,
    locations: &LocationSet,
    cycler: &mut FallbackCycler,
) -> Option<usize> {
    match point {
        Some(point) => match resolve_nearest(point, locations) {
            Resolution::Matched(index) => Some(index),
            rejected => {
                tracing::debug!(?rejected, "resolution rejected, cycling");
                cycler.advance(locations.len())
            }
        },
        None => {
            tracing::debug!("click missed the globe, cycling");
            cycler.advance(locations.len())
        }
    }
}

/// Start tracking a gesture on pointer-down.
///
/// Pointer-downs over the egui panel belong to the panel; no tracker starts,
/// so the matching release cannot select either.
fn pointer_down(
    mouse: Res<ButtonInput<MouseButton>>,
    window: Query<&Window, With<PrimaryWindow>>,
    mut contexts: EguiContexts,
    mut pointer: ResMut<PointerState>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    let egui_wants_pointer = contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.is_pointer_over_area());
    if egui_wants_pointer {
        pointer.tracker = None;
        return;
    }

    let Ok(window) = window.single() else {
        return;
    };
    if let Some(pos) = window.cursor_position() {
        pointer.tracker = Some(GestureTracker::begin(pos));
    }
}

/// Feed cursor movement into the active gesture.
fn pointer_move(
    window: Query<&Window, With<PrimaryWindow>>,
    mut pointer: ResMut<PointerState>,
) {
    let Some(tracker) = pointer.tracker.as_mut() else {
        return;
    };
    let Ok(window) = window.single() else {
        return;
    };
    if let Some(pos) = window.cursor_position() {
        tracker.update(pos);
    }
}

/// Classify the gesture on pointer-up and resolve clicks to a selection.
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
fn pointer_up(
    mouse: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    window: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    pick_query: Query<(&PickSphere, &GlobalTransform)>,
    locations: Res<Locations>,
    mut contexts: EguiContexts,
    mut pointer: ResMut<PointerState>,
    mut selection: ResMut<GlobeSelection>,
    mut auto_rotate: ResMut<AutoRotate>,
) {
    if !mouse.just_released(MouseButton::Left) {
        return;
    }
    let Some(tracker) = pointer.tracker.take() else {
        return;
    };

    // A release over the panel is the panel's business.
    let egui_wants_pointer = contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.is_pointer_over_area());
    if egui_wants_pointer {
        return;
    }

    // The cursor can leave the window mid-gesture; fall back to the last
    // tracked position.
    let release_pos = window
        .single()
        .ok()
        .and_then(Window::cursor_position)
        .unwrap_or_else(|| tracker.last_position());

    let Gesture::Click(pos) = tracker.finish(release_pos) else {
        return;
    };

    let hit = intersect_globe(pos, &camera_query, &pick_query);
    let pointer = &mut *pointer;
    if let Some(index) = resolve_click_point(hit, &locations, &mut pointer.cycler) {
        select_location(
            index,
            &locations,
            &mut selection,
            &mut auto_rotate,
            time.elapsed_secs_f64(),
        );
    }
}

/// Cast a ray from the cursor through the camera onto the collision sphere.
fn intersect_globe(
    cursor_pos: Vec2,
    camera_query: &Query<(&Camera, &GlobalTransform)>,
    pick_query: &Query<(&PickSphere, &GlobalTransform)>,
) -> Option<DVec3> {
    let (camera, camera_transform) = camera_query.single().ok()?;
    let (pick_sphere, sphere_transform) = pick_query.single().ok()?;

    let ray = camera.viewport_to_world(camera_transform, cursor_pos).ok()?;
    ray_sphere_intersection(
        ray.origin.as_dvec3(),
        Vec3::from(ray.direction).as_dvec3(),
        sphere_transform.translation().as_dvec3(),
        f64::from(pick_sphere.radius),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fellowsphere::{Location, geo::lat_lon_to_unit};

    fn location(name: &str, lat: f64, lon: f64) -> Location {
        Location {
            id: name.to_ascii_lowercase(),
            name: name.to_string(),
            country: String::new(),
            latitude: lat,
            longitude: lon,
            color: "#ffffff".to_string(),
            description: String::new(),
            mentors: Vec::new(),
        }
    }

    #[test]
    fn test_click_on_marker_resolves_without_cycling() {
        let set = LocationSet::new(vec![
            location("Exeter", 50.7184, -3.5339),
            location("Sydney", -33.8688, 151.2093),
        ]);
        let mut cycler = FallbackCycler::default();

        let click = lat_lon_to_unit(50.7184, -3.5339) * 1.08;
        assert_eq!(resolve_click_point(Some(click), &set, &mut cycler), Some(0));
        // The cycler was never advanced: the next fallback starts at 0.
        assert_eq!(cycler.advance(2), Some(0));
    }

    #[test]
    fn test_missed_globe_cycles() {
        let set = LocationSet::new(vec![
            location("A", 0.0, 0.0),
            location("B", 0.0, 90.0),
            location("C", 0.0, -90.0),
        ]);
        let mut cycler = FallbackCycler::default();

        assert_eq!(resolve_click_point(None, &set, &mut cycler), Some(0));
        assert_eq!(resolve_click_point(None, &set, &mut cycler), Some(1));
        assert_eq!(resolve_click_point(None, &set, &mut cycler), Some(2));
        assert_eq!(resolve_click_point(None, &set, &mut cycler), Some(0));
    }

    #[test]
    fn test_ambiguous_click_cycles() {
        // Two locations 2 degrees apart; a click between them is ambiguous.
        let set = LocationSet::new(vec![location("A", 0.0, -1.0), location("B", 0.0, 1.0)]);
        let mut cycler = FallbackCycler::default();

        let click = lat_lon_to_unit(0.0, 0.0);
        assert_eq!(resolve_click_point(Some(click), &set, &mut cycler), Some(0));
        assert_eq!(resolve_click_point(Some(click), &set, &mut cycler), Some(1));
    }

    #[test]
    fn test_empty_list_is_noop() {
        let set = LocationSet::default();
        let mut cycler = FallbackCycler::default();

        assert_eq!(resolve_click_point(None, &set, &mut cycler), None);
        assert_eq!(
            resolve_click_point(Some(lat_lon_to_unit(0.0, 0.0)), &set, &mut cycler),
            None
        );
    }
}
