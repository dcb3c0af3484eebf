//! Location picking logic for an interactive fellowship-training globe.
//!
//! This crate holds everything about "which location did the user click" that
//! does not depend on a rendering library: gesture classification, ray–sphere
//! intersection, geographic projection, nearest-location resolution with a
//! clear-winner margin rule, the round-robin fallback cycler, and the
//! selection state machine. The viewer wires these into its scene and UI.
//!
//! # Design principles
//!
//! - **Renderer-agnostic**: the viewer hands over rays and points; no scene
//!   or camera types appear here
//! - **One projection**: marker placement and click resolution share the
//!   forward/inverse conversion pair in [`geo`], so they cannot drift apart
//! - **Degrades, never fails**: rejected clicks fall through to the fallback
//!   cycler; an empty location list makes every operation a no-op

pub mod geo;
pub mod gesture;
pub mod location;
pub mod ray;
pub mod resolve;
pub mod selection;

pub use gesture::{DRAG_THRESHOLD_PX, Gesture, GestureTracker};
pub use location::{Location, LocationSet, Mentor};
pub use ray::ray_sphere_intersection;
pub use resolve::{FallbackCycler, MATCH_MARGIN_KM, MAX_MATCH_KM, Resolution, resolve_nearest};
pub use selection::SelectionState;
