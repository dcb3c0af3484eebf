//! Interactive fellowship-training globe using Bevy.
//!
//! Renders a rotating globe with one marker per fellowship training
//! location. Clicking a marker (or near one) opens a details panel with the
//! mentors at that location; dragging rotates the globe.

mod camera;
mod content;
mod globe;
mod launch_params;
mod picking;
mod ui;

use bevy::prelude::*;
use camera::OrbitCameraPlugin;
use content::ContentPlugin;
use globe::GlobePlugin;
use launch_params::LaunchParams;
use picking::PickingPlugin;
use ui::PanelUiPlugin;

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ContentPlugin,
            GlobePlugin,
            OrbitCameraPlugin,
            PickingPlugin,
            PanelUiPlugin,
        ))
        .add_systems(Startup, setup_scene);
    }
}

/// Set up the camera and lighting.
///
/// The camera entity's transform is written every frame by the orbit camera
/// system from its yaw/pitch/distance state.
fn setup_scene(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: bevy::camera::ClearColorConfig::Custom(Color::srgb(0.02, 0.03, 0.06)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, camera::DEFAULT_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
        Projection::Perspective(PerspectiveProjection {
            fov: std::f32::consts::FRAC_PI_4,
            near: 0.01,
            far: 100.0,
            ..Default::default()
        }),
        camera::OrbitCamera::default(),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(4.0, 6.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    tracing::info!("Scene setup complete - drag to rotate, click a marker to select");
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let params = LaunchParams::from_environment();

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "fellowsphere-viewer".to_string(),
        resolution: (1280, 720).into(),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }));

    app.insert_resource(params).add_plugins(AppPlugin).run();
}
