//! Velocity contributions from galaxies and attractors

use glam::Vec3;

use crate::constants::{
    GALAXY_SOFTENING, TIP_LOOKAHEAD, TIP_LOOKAHEAD_PER_KIND, TIP_SOFTENING, TIP_STRENGTH,
};
use crate::state::SimulationState;

/// What kind of body is being pushed around.
///
/// Attractors aim at where the body is heading rather than where it is, and
/// how far ahead they look depends on the body: galaxies use the base
/// lookahead, star `i` adds `1e-4 * i` on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Galaxy,
    Star(usize),
}

impl BodyKind {
    /// Velocity multiplier used to project the body forward
    pub fn lookahead(self) -> f32 {
        let weight = match self {
            BodyKind::Galaxy => 0.0,
            BodyKind::Star(index) => index as f32,
        };
        TIP_LOOKAHEAD + TIP_LOOKAHEAD_PER_KIND * weight
    }
}

/// Add the pull of force source `source` on a body at `position` into
/// `velocity`.
///
/// Sources `0..GALAXIES` are galaxies, `GALAXIES..` are attractor slots.
/// Inactive attractors add nothing. Excluding a galaxy from acting on itself
/// is the caller's job.
pub fn contribute<const GALAXIES: usize, const PER_GALAXY: usize>(
    kind: BodyKind,
    position: Vec3,
    velocity: &mut Vec3,
    source: usize,
    state: &SimulationState<GALAXIES, PER_GALAXY>,
) {
    if source < GALAXIES {
        let galaxy = &state.galaxies[source];
        let dr = galaxy.position - position;
        *velocity += galaxy.mass * dr.normalize_or_zero() / (GALAXY_SOFTENING + dr.length_squared());
    } else if let Some(tip) = state.attractors.get(source - GALAXIES) {
        if tip.active {
            let dr = tip.position - (position + kind.lookahead() * *velocity);
            *velocity += TIP_STRENGTH * dr / (TIP_SOFTENING + dr.length_squared());
        }
    }
}

/// Sum every source except `exclude` into `velocity`, in source order
pub fn accumulate<const GALAXIES: usize, const PER_GALAXY: usize>(
    kind: BodyKind,
    position: Vec3,
    velocity: &mut Vec3,
    exclude: Option<usize>,
    state: &SimulationState<GALAXIES, PER_GALAXY>,
) {
    for source in 0..SimulationState::<GALAXIES, PER_GALAXY>::NUM_SOURCES {
        if Some(source) != exclude {
            contribute(kind, position, velocity, source, state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Eye;

    type Pair = SimulationState<2, 1>;

    fn scene() -> Pair {
        let mut state = Pair::new(Eye::default());
        state.galaxies[0].position = Vec3::new(1.0, 0.0, 0.0);
        state.galaxies[0].mass = 1e-6;
        state.galaxies[1].position = Vec3::new(0.0, -2.0, 0.0);
        state.galaxies[1].mass = 3e-6;
        state
    }

    #[test]
    fn galaxy_pull_is_softened_inverse_square() {
        let state = scene();
        let mut v = Vec3::ZERO;
        contribute(BodyKind::Galaxy, Vec3::ZERO, &mut v, 0, &state);

        let expected = 1e-6 / (GALAXY_SOFTENING + 1.0);
        assert!((v - Vec3::new(expected, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn coincident_galaxy_adds_nothing() {
        let state = scene();
        let mut v = Vec3::new(0.1, 0.2, 0.3);
        contribute(BodyKind::Star(0), Vec3::new(1.0, 0.0, 0.0), &mut v, 0, &state);
        assert_eq!(v, Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn inactive_attractor_contributes_nothing() {
        let mut state = scene();
        state.attractors.set(0, Vec3::new(0.0, 0.0, -1.0));
        state.attractors.release(0);

        for position in [Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::splat(5.0)] {
            let mut v = Vec3::new(1e-3, 0.0, 0.0);
            contribute(BodyKind::Star(7), position, &mut v, 2, &state);
            assert_eq!(v, Vec3::new(1e-3, 0.0, 0.0));
        }
    }

    #[test]
    fn active_attractor_pulls_toward_lookahead_point() {
        let mut state = scene();
        let tip = Vec3::new(0.0, 0.0, -1.0);
        state.attractors.set(0, tip);

        let v0 = Vec3::new(0.0, 1e-2, 0.0);
        let mut v = v0;
        contribute(BodyKind::Galaxy, Vec3::ZERO, &mut v, 2, &state);

        let dr = tip - 0.1 * v0;
        let expected = v0 + TIP_STRENGTH * dr / (TIP_SOFTENING + dr.length_squared());
        assert!((v - expected).length() < 1e-9);
        assert!(v.z < 0.0);
    }

    #[test]
    fn lookahead_depends_on_body_kind() {
        assert_eq!(BodyKind::Galaxy.lookahead(), 0.1);
        assert_eq!(BodyKind::Star(0).lookahead(), 0.1);
        assert!((BodyKind::Star(1000).lookahead() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn accumulate_skips_excluded_source() {
        let state = scene();
        let mut all = Vec3::ZERO;
        accumulate(BodyKind::Galaxy, Vec3::ZERO, &mut all, None, &state);

        let mut without_first = Vec3::ZERO;
        accumulate(BodyKind::Galaxy, Vec3::ZERO, &mut without_first, Some(0), &state);

        let mut only_second = Vec3::ZERO;
        contribute(BodyKind::Galaxy, Vec3::ZERO, &mut only_second, 1, &state);

        assert_eq!(without_first, only_second);
        assert!(all.x > 0.0 && all.y < 0.0);
    }
}
