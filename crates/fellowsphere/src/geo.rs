//! Geographic coordinate conversions and great-circle distance.
//!
//! Marker placement (forward) and click resolution (inverse) both go through
//! the projection pair in this module, so the two can never drift apart in
//! axis convention. The convention is Y-up: latitude is the arcsine of the
//! vertical component, longitude the arctangent of X over Z, with longitude 0
//! facing +Z and 90°E facing +X.

use glam::DVec3;

/// Mean Earth radius in kilometers, used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Convert latitude and longitude (degrees) to a point on the unit sphere.
///
/// Uses a spherical Earth approximation.
pub fn lat_lon_to_unit(lat_deg: f64, lon_deg: f64) -> DVec3 {
    let lat_rad = lat_deg.to_radians();
    let lon_rad = lon_deg.to_radians();
    DVec3::new(
        lat_rad.cos() * lon_rad.sin(),
        lat_rad.sin(),
        lat_rad.cos() * lon_rad.cos(),
    )
}

/// Convert latitude and longitude (degrees) to a point at the given radius.
pub fn lat_lon_to_point(lat_deg: f64, lon_deg: f64, radius: f64) -> DVec3 {
    lat_lon_to_unit(lat_deg, lon_deg) * radius
}

/// Convert a point in globe space back to latitude and longitude (degrees).
///
/// The point is normalized first, so points on any sphere concentric with the
/// globe (the collision sphere included) convert directly. A zero-length
/// point maps to (0, 0) rather than NaN.
pub fn point_to_lat_lon(point: DVec3) -> (f64, f64) {
    let unit = point.normalize_or_zero();
    let lat_rad = unit.y.clamp(-1.0, 1.0).asin();
    let lon_rad = unit.x.atan2(unit.z);
    (lat_rad.to_degrees(), lon_rad.to_degrees())
}

/// Great-circle distance between two coordinates in kilometers, via the
/// haversine formula.
pub fn haversine_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let lat_a_rad = lat_a.to_radians();
    let lat_b_rad = lat_b.to_radians();
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lon = (lon_b - lon_a).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a_rad.cos() * lat_b_rad.cos() * (d_lon / 2.0).sin().powi(2);

    // h can exceed 1 by a rounding error for near-antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}
