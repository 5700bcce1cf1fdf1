//! Initial state generation

use glam::Vec3;
use rand::Rng;

use crate::constants::{
    DISC_FLATTENING, DISC_RADIUS, DRIFT_FACTOR, DRIFT_JITTER, DRIFT_ORIGIN, FOCAL_GALAXY_OFFSET,
    GALAXY_RADIUS, GALAXY_SPREAD, MASS_PER_STAR,
};
use crate::sampler::sample;
use crate::state::{Eye, SimulationState};

/// Circular orbit velocity around a disc with spin axis `normal`, for a
/// star sitting at offset `dr` from the galaxy center: `v = sqrt(M / r)`
/// along `normal × dr`.
pub fn orbital_velocity(mass: f32, normal: Vec3, dr: Vec3) -> Vec3 {
    let r = dr.length();
    if r == 0.0 {
        return Vec3::ZERO;
    }
    (mass / r).sqrt() * normal.cross(dr).normalize_or_zero()
}

/// Squash a disc offset toward the plane perpendicular to `normal`.
///
/// The out-of-plane component is reduced by `0.4 * atan(h / 0.5)`, which is
/// smooth and bounded for any height `h`.
pub fn flatten_to_disc(dr: Vec3, normal: Vec3) -> Vec3 {
    let height = dr.dot(normal) / DISC_RADIUS;
    dr - DISC_FLATTENING * height.atan() * normal
}

/// Overwrite every galaxy and star in `state` with a fresh layout around
/// the viewer.
///
/// Galaxy 0 is always placed just below and in front of the eye so there
/// is something to look at. Attractors are left alone; they belong to the
/// interaction layer.
pub fn initialize<const GALAXIES: usize, const PER_GALAXY: usize, R: Rng + ?Sized>(
    state: &mut SimulationState<GALAXIES, PER_GALAXY>,
    rng: &mut R,
) {
    let eye = state.eye;
    let mass = PER_GALAXY as f32 * MASS_PER_STAR;

    for g in 0..GALAXIES {
        let position = if g == 0 {
            eye.position + eye.to_world(Vec3::from(FOCAL_GALAXY_OFFSET))
        } else {
            sample(rng, GALAXY_SPREAD * eye.position, GALAXY_RADIUS)
        };
        let drift = -DRIFT_FACTOR * (position - DRIFT_ORIGIN * eye.position);
        let velocity = sample(rng, drift, DRIFT_JITTER);
        let normal = sample(rng, Vec3::ZERO, 1.0)
            .try_normalize()
            .unwrap_or(Vec3::Z);

        let galaxy = &mut state.galaxies[g];
        galaxy.position = position;
        galaxy.velocity = velocity;
        galaxy.mass = mass;
        galaxy.normal = normal;

        let members = &mut state.stars[g * PER_GALAXY..(g + 1) * PER_GALAXY];
        for star in members {
            let dr = flatten_to_disc(sample(rng, Vec3::ZERO, DISC_RADIUS), normal);
            star.position = position + dr;
            star.velocity = velocity + orbital_velocity(mass, normal, dr);
        }
    }
}

impl<const GALAXIES: usize, const PER_GALAXY: usize> SimulationState<GALAXIES, PER_GALAXY> {
    /// Allocate and lay out a fresh scene around `eye`
    pub fn initialized<R: Rng + ?Sized>(eye: Eye, rng: &mut R) -> Self {
        let mut state = Self::new(eye);
        initialize(&mut state, rng);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type Small = SimulationState<3, 40>;

    fn eye() -> Eye {
        Eye::new(Vec3::new(0.0, 0.3, 2.0), Mat3::IDENTITY)
    }

    #[test]
    fn fills_every_slot() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = Small::initialized(eye(), &mut rng);

        assert_eq!(state.galaxies.len(), 3);
        assert_eq!(state.stars.len(), 120);
        assert!(state.is_finite());
        for galaxy in &state.galaxies {
            assert_eq!(galaxy.mass, 40.0 * MASS_PER_STAR);
            assert!((galaxy.normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn stars_cluster_around_their_galaxy() {
        let mut rng = StdRng::seed_from_u64(2);
        let state = Small::initialized(eye(), &mut rng);

        for (i, star) in state.stars.iter().enumerate() {
            let galaxy = &state.galaxies[Small::galaxy_of(i)];
            assert!((star.position - galaxy.position).length() <= DISC_RADIUS + 1e-5);
        }
    }

    #[test]
    fn orbital_velocity_is_perpendicular() {
        let mut rng = StdRng::seed_from_u64(3);
        let state = Small::initialized(eye(), &mut rng);

        for (i, star) in state.stars.iter().enumerate() {
            let galaxy = &state.galaxies[Small::galaxy_of(i)];
            let offset = star.position - galaxy.position;
            let orbit = star.velocity - galaxy.velocity;
            if offset.length() < 1e-2 || orbit.length() == 0.0 {
                continue;
            }
            let orbit = orbit.normalize();
            assert!(orbit.dot(galaxy.normal).abs() < 1e-3);
            assert!(orbit.dot(offset.normalize()).abs() < 1e-3);
        }
    }

    #[test]
    fn focal_galaxy_sits_in_front_of_viewer() {
        let mut rng = StdRng::seed_from_u64(4);
        let state = Small::initialized(eye(), &mut rng);

        let expected = eye().position + Vec3::new(0.0, -0.2, -1.2);
        assert!((state.galaxies[0].position - expected).length() < 1e-6);
    }

    #[test]
    fn reinitializing_overwrites_everything() {
        let mut a = Small::initialized(eye(), &mut StdRng::seed_from_u64(5));
        for star in a.stars.iter_mut() {
            star.position = Vec3::splat(100.0);
            star.velocity = Vec3::splat(-3.0);
        }
        a.galaxies[1].mass = 0.0;

        initialize(&mut a, &mut StdRng::seed_from_u64(5));
        let b = Small::initialized(eye(), &mut StdRng::seed_from_u64(5));

        assert_eq!(a.galaxies, b.galaxies);
        assert_eq!(a.stars, b.stars);
    }

    #[test]
    fn single_star_orbit_direction_and_speed() {
        let mass = 5e-11;
        let v = orbital_velocity(mass, Vec3::Z, Vec3::new(0.5, 0.0, 0.0));

        let speed = (mass / 0.5f32).sqrt();
        assert!((v.normalize() - Vec3::Y).length() < 1e-6);
        assert!((v.length() - speed).abs() <= speed * 1e-5);
    }

    #[test]
    fn in_plane_offsets_are_not_flattened() {
        let dr = Vec3::new(0.3, -0.2, 0.0);
        assert_eq!(flatten_to_disc(dr, Vec3::Z), dr);

        let tall = flatten_to_disc(Vec3::new(0.0, 0.0, 0.5), Vec3::Z);
        let expected = 0.5 - 0.4 * 1.0f32.atan();
        assert!((tall.z - expected).abs() < 1e-6);
    }

    #[test]
    fn degenerate_offset_has_no_orbit() {
        assert_eq!(orbital_velocity(1.0, Vec3::Z, Vec3::ZERO), Vec3::ZERO);
        assert_eq!(orbital_velocity(1.0, Vec3::Z, Vec3::new(0.0, 0.0, 0.2)), Vec3::ZERO);
    }
}
