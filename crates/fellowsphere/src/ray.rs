//! Ray–sphere intersection for globe picking.

use glam::DVec3;

/// Intersect a ray with a sphere, returning the nearest intersection point
/// along the ray.
///
/// The direction does not need to be normalized. When the ray origin is
/// inside the sphere (the camera zoomed fully in on the collision sphere),
/// the near root is behind the origin and the far root is returned instead.
///
/// Returns `None` when the ray misses the sphere, the sphere lies entirely
/// behind the origin, or the direction is zero.
pub fn ray_sphere_intersection(
    origin: DVec3,
    direction: DVec3,
    center: DVec3,
    radius: f64,
) -> Option<DVec3> {
    let dir = direction.normalize_or_zero();
    if dir == DVec3::ZERO {
        return None;
    }

    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let near = -b - sqrt_d;
    let far = -b + sqrt_d;

    // Nearest intersection that is actually on the ray.
    let t = if near >= 0.0 {
        near
    } else if far >= 0.0 {
        far
    } else {
        return None;
    };

    Some(origin + dir * t)
}
