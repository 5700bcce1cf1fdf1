//! Random vectors for scattering bodies

use glam::Vec3;
use rand::Rng;

/// Random point within `radius` of `center`.
///
/// An offset is drawn uniformly from the cube of half-width `radius` until
/// it lands inside the sphere, then scaled by `(|offset| / radius)^4`, so the
/// distance from `center` goes as the fifth power of the raw offset: a dense
/// core with a sparse halo reaching out to the full radius.
/// `radius` must be positive; zero never accepts a sample.
pub fn sample<R: Rng + ?Sized>(rng: &mut R, center: Vec3, radius: f32) -> Vec3 {
    let radius_sq = radius * radius;
    let offset = loop {
        let dr = Vec3::new(
            (2.0 * rng.gen::<f32>() - 1.0) * radius,
            (2.0 * rng.gen::<f32>() - 1.0) * radius,
            (2.0 * rng.gen::<f32>() - 1.0) * radius,
        );
        if dr.length_squared() <= radius_sq {
            break dr;
        }
    };

    let t = offset.length_squared() / radius_sq;
    center + offset * t * t
}
