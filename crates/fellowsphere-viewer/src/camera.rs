//! Orbit camera controller for the globe.
//!
//! Dragging with the left button orbits the camera around the globe center;
//! the scroll wheel zooms. The globe auto-rotates slowly until a location is
//! selected, then resumes a fixed delay after the last selection.

use bevy::ecs::message::MessageReader;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::launch_params::LaunchParams;

/// Default camera distance from the globe center.
pub const DEFAULT_DISTANCE: f32 = 3.0;
/// Closest zoom; inside this the globe fills the view.
pub const MIN_DISTANCE: f32 = 1.4;
/// Farthest zoom.
pub const MAX_DISTANCE: f32 = 8.0;
/// Seconds auto-rotation stays paused after a selection.
pub const ROTATE_PAUSE_SECS: f64 = 10.0;

/// Keep the orbit short of the poles so the up vector stays well-defined.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.05;

/// Plugin for orbit camera controls and auto-rotation.
pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitSettings>()
            .init_resource::<AutoRotate>()
            .add_systems(
                Update,
                (orbit_drag, orbit_zoom, auto_rotate, sync_camera_transform).chain(),
            );
    }
}

/// Settings for orbit movement.
#[derive(Resource)]
pub struct OrbitSettings {
    /// Radians of orbit per pixel of mouse motion.
    pub drag_sensitivity: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.005,
        }
    }
}

/// Whether auto-rotation is currently suppressed.
///
/// Selecting a location records a resume timestamp; rotation skips until the
/// clock passes it. Each new selection overwrites the timestamp, re-arming
/// the delay.
#[derive(Resource, Default)]
pub struct AutoRotate {
    resume_at: Option<f64>,
}

impl AutoRotate {
    /// Pause rotation until [`ROTATE_PAUSE_SECS`] from `now`.
    pub fn pause(&mut self, now: f64) {
        self.resume_at = Some(now + ROTATE_PAUSE_SECS);
    }

    /// Whether rotation is paused at `now`, clearing an expired timestamp.
    pub fn is_paused(&mut self, now: f64) -> bool {
        match self.resume_at {
            Some(resume_at) if now < resume_at => true,
            Some(_) => {
                self.resume_at = None;
                false
            }
            None => false,
        }
    }
}

/// Orbit state for the camera entity.
#[derive(Component)]
pub struct OrbitCamera {
    /// Rotation around the world Y axis, radians.
    pub yaw: f32,
    /// Elevation above the equatorial plane, radians, clamped short of the poles.
    pub pitch: f32,
    /// Distance from the globe center.
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.35,
            distance: DEFAULT_DISTANCE,
        }
    }
}

/// Camera position for an orbit state, looking at the origin.
fn orbit_translation(yaw: f32, pitch: f32, distance: f32) -> Vec3 {
    Quat::from_euler(EulerRot::YXZ, yaw, -pitch, 0.0) * (Vec3::Z * distance)
}

/// Orbit the camera while the left button is held.
///
/// Drags that started over the egui panel belong to the panel, not the globe.
fn orbit_drag(
    mouse: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    settings: Res<OrbitSettings>,
    mut contexts: EguiContexts,
    mut query: Query<&mut OrbitCamera>,
) {
    let mut delta = Vec2::ZERO;
    for event in mouse_motion.read() {
        delta += event.delta;
    }

    if !mouse.pressed(MouseButton::Left) || delta == Vec2::ZERO {
        return;
    }

    let egui_wants_pointer = contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.is_pointer_over_area());
    if egui_wants_pointer {
        return;
    }

    for mut orbit in &mut query {
        orbit.yaw -= delta.x * settings.drag_sensitivity;
        orbit.pitch = (orbit.pitch + delta.y * settings.drag_sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

/// Zoom with the scroll wheel.
fn orbit_zoom(mut scroll_events: MessageReader<MouseWheel>, mut query: Query<&mut OrbitCamera>) {
    for event in scroll_events.read() {
        // Normalize scroll value: web reports pixels, native reports lines.
        let scroll = match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / 120.0,
        };
        if scroll == 0.0 {
            continue;
        }
        // Adjust distance logarithmically for smooth scaling.
        let factor = 1.1_f32.powf(-scroll);
        for mut orbit in &mut query {
            orbit.distance = (orbit.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }
}

/// Advance the orbit yaw at the configured rate while rotation is enabled.
#[allow(clippy::needless_pass_by_value)]
fn auto_rotate(
    time: Res<Time>,
    params: Res<LaunchParams>,
    mut pause: ResMut<AutoRotate>,
    mut query: Query<&mut OrbitCamera>,
) {
    if params.rotate_speed == 0.0 || pause.is_paused(time.elapsed_secs_f64()) {
        return;
    }
    for mut orbit in &mut query {
        orbit.yaw += params.rotate_speed * time.delta_secs();
    }
}

/// Write the orbit state into the camera transform.
fn sync_camera_transform(mut query: Query<(&OrbitCamera, &mut Transform)>) {
    for (orbit, mut transform) in &mut query {
        let translation = orbit_translation(orbit.yaw, orbit.pitch, orbit.distance);
        *transform = Transform::from_translation(translation).looking_at(Vec3::ZERO, Vec3::Y);
    }
}
