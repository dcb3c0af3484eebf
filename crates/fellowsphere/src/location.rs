//! Reference data for the fellowship training locations.
//!
//! The set is loaded once when the viewer starts (from the content source or
//! its built-in fallback) and never mutated afterwards. The resolver only
//! reads coordinates; everything else is presentation data for the details
//! panel.

/// One mentor at a training location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mentor {
    pub name: String,
    pub title: String,
    pub bio: String,
    /// Expertise tags shown as chips in the details panel.
    pub expertise: Vec<String>,
}

/// One fixed fellowship-training point shown on the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Stable identifier from the content source.
    pub id: String,
    /// Display name (city).
    pub name: String,
    pub country: String,
    /// Degrees, positive north.
    pub latitude: f64,
    /// Degrees, positive east.
    pub longitude: f64,
    /// Marker color as a hex string (e.g. `"#e8604c"`).
    pub color: String,
    /// Free text shown in the details panel.
    pub description: String,
    pub mentors: Vec<Mentor>,
}

/// The ordered, immutable set of locations for a session.
#[derive(Debug, Clone, Default)]
pub struct LocationSet {
    locations: Vec<Location>,
}

impl LocationSet {
    /// Build a set, sanitizing coordinates.
    ///
    /// Latitude is clamped to [-90, 90] and longitude wrapped into
    /// [-180, 180]. Offending records are logged and kept rather than
    /// rejected, so a partially bad content payload still renders.
    pub fn new(mut locations: Vec<Location>) -> Self {
        for location in &mut locations {
            if !(-90.0..=90.0).contains(&location.latitude) {
                tracing::warn!(
                    id = %location.id,
                    latitude = location.latitude,
                    "clamping out-of-range latitude"
                );
                location.latitude = location.latitude.clamp(-90.0, 90.0);
            }
            if !(-180.0..=180.0).contains(&location.longitude) {
                tracing::warn!(
                    id = %location.id,
                    longitude = location.longitude,
                    "wrapping out-of-range longitude"
                );
                location.longitude = wrap_longitude(location.longitude);
            }
        }
        Self { locations }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// Case-insensitive lookup by display name, for quick-pick selection.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.locations
            .iter()
            .position(|location| location.name.eq_ignore_ascii_case(name))
    }
}

/// Wrap a longitude into [-180, 180].
fn wrap_longitude(lon_deg: f64) -> f64 {
    (lon_deg + 180.0).rem_euclid(360.0) - 180.0
}
