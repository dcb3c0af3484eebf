//! Launch parameter parsing for the viewer.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available) and the
//! built-in location list is shown.

use bevy::prelude::*;

/// Default auto-rotation speed in radians per second.
const DEFAULT_ROTATE_SPEED: f32 = 0.1;

/// Launch parameters for the viewer.
#[derive(Resource, Debug)]
pub struct LaunchParams {
    /// Base URL of the content API serving the location list. When absent,
    /// the built-in default list is used without any fetch.
    pub content_api: Option<String>,
    /// Auto-rotation speed in radians per second. Zero disables auto-rotation.
    pub rotate_speed: f32,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            content_api: None,
            rotate_speed: DEFAULT_ROTATE_SPEED,
        }
    }
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    /// Interactive fellowship-training globe.
    #[derive(Parser, Debug)]
    #[command(version, about)]
    struct Args {
        /// Base URL of the content API serving the location list.
        #[arg(long)]
        content_api: Option<String>,

        /// Auto-rotation speed in radians per second (0 disables).
        #[arg(long, default_value_t = DEFAULT_ROTATE_SPEED)]
        rotate_speed: f32,
    }

    impl LaunchParams {
        /// Parse launch parameters from command-line arguments.
        pub fn from_environment() -> Self {
            let args = Args::parse();
            Self {
                content_api: args.content_api,
                rotate_speed: args.rotate_speed.max(0.0),
            }
        }
    }
}

#[cfg(target_family = "wasm")]
impl LaunchParams {
    /// WASM has no command line; use defaults.
    pub fn from_environment() -> Self {
        Self::default()
    }
}
