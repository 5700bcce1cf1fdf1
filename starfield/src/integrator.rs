//! Fixed-step predictor/corrector integration with escape recycling

use glam::Vec3;

use crate::constants::{
    CORRECTOR_BLEND, ESCAPE_RADIUS_SQ, PREDICTOR_BLEND, PREDICTOR_STEP, RESPAWN_BACKTRACK,
    RESPAWN_FORWARD,
};
use crate::forces::{accumulate, BodyKind};
use crate::state::{Eye, SimulationState, Star};

/// Advance one body by one step.
///
/// The predictor velocity is kept in a temporary while the corrector
/// accumulates straight into `velocity`, and the position moves by a 1:3
/// blend of the two.
fn advance<const GALAXIES: usize, const PER_GALAXY: usize>(
    kind: BodyKind,
    position: &mut Vec3,
    velocity: &mut Vec3,
    exclude: Option<usize>,
    state: &SimulationState<GALAXIES, PER_GALAXY>,
) {
    let mut temp_v = *velocity;
    accumulate(kind, *position, &mut temp_v, exclude, state);

    let temp_p = *position + PREDICTOR_STEP * temp_v;
    accumulate(kind, temp_p, velocity, exclude, state);

    *position += PREDICTOR_BLEND * temp_v + CORRECTOR_BLEND * *velocity;
}

/// Put a star that wandered out of range back in front of the viewer.
/// Returns true if the star was moved.
pub fn recycle(star: &mut Star, eye: &Eye) -> bool {
    if (star.position - eye.position).length_squared() <= ESCAPE_RADIUS_SQ {
        return false;
    }
    star.position = eye.position - RESPAWN_BACKTRACK * star.velocity + eye.forward() * RESPAWN_FORWARD;
    star.velocity = Vec3::ZERO;
    true
}

/// Advance every star, then every galaxy, by one step.
///
/// Bodies are updated in index order against the live state, so a later
/// body sees the already-moved galaxies of this step. Results are exactly
/// reproducible only for the same iteration order.
///
/// Returns the number of stars recycled this step.
pub fn step<const GALAXIES: usize, const PER_GALAXY: usize>(
    state: &mut SimulationState<GALAXIES, PER_GALAXY>,
) -> usize {
    let eye = state.eye;
    let mut recycled = 0;

    for i in 0..state.stars.len() {
        let mut star = state.stars[i];
        advance(BodyKind::Star(i), &mut star.position, &mut star.velocity, None, state);
        if recycle(&mut star, &eye) {
            recycled += 1;
        }
        state.stars[i] = star;
    }

    for g in 0..GALAXIES {
        let galaxy = state.galaxies[g];
        let (mut position, mut velocity) = (galaxy.position, galaxy.velocity);
        advance(BodyKind::Galaxy, &mut position, &mut velocity, Some(g), state);
        state.galaxies[g].position = position;
        state.galaxies[g].velocity = velocity;
    }

    if recycled > 0 {
        log::trace!("recycled {} escaped stars", recycled);
    }
    recycled
}
