//! Two-slot trail buffer fed to the renderer

use crate::constants::{FLOATS_PER_SAMPLE, FLOATS_PER_STAR};
use crate::integrator;
use crate::state::{SimulationState, Star};

const FLOAT_BYTES: u64 = std::mem::size_of::<f32>() as u64;

/// Byte stride for drawing every sample as a line endpoint
pub const LINE_STRIDE: u64 = FLOATS_PER_SAMPLE as u64 * FLOAT_BYTES;

/// Byte stride for drawing one sample per star
pub const POINT_STRIDE: u64 = FLOATS_PER_STAR as u64 * FLOAT_BYTES;

/// Per-star history of the two most recent `(position, velocity)` samples.
///
/// Each star owns 12 floats: slot 0 then slot 1. Every update flips the
/// parity bit and overwrites only the slot it selects, so the other slot
/// still holds the previous frame and a line between them is the star's
/// latest motion.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    data: Box<[f32]>,
    parity: usize,
}

impl TrailBuffer {
    /// Buffer sized for `state`, seeded with its current stars in both slots
    pub fn new<const GALAXIES: usize, const PER_GALAXY: usize>(
        state: &SimulationState<GALAXIES, PER_GALAXY>,
    ) -> Self {
        let mut trail = Self {
            data: vec![0.0; state.stars.len() * FLOATS_PER_STAR].into_boxed_slice(),
            parity: 0,
        };
        trail.fill(state);
        trail
    }

    /// Step the simulation and record the new samples.
    ///
    /// `_dt` is ignored: one call is one fixed simulation step regardless of
    /// frame time.
    pub fn update<const GALAXIES: usize, const PER_GALAXY: usize>(
        &mut self,
        state: &mut SimulationState<GALAXIES, PER_GALAXY>,
        _dt: f32,
    ) -> &[f32] {
        self.parity ^= 1;
        integrator::step(state);
        self.write_slot(&state.stars, self.parity);
        &self.data
    }

    /// Write the current state into both slots, collapsing every trail to a
    /// point. Used after a reset so no line joins the old and new layout.
    pub fn fill<const GALAXIES: usize, const PER_GALAXY: usize>(
        &mut self,
        state: &SimulationState<GALAXIES, PER_GALAXY>,
    ) {
        self.write_slot(&state.stars, 0);
        self.write_slot(&state.stars, 1);
    }

    fn write_slot(&mut self, stars: &[Star], slot: usize) {
        debug_assert_eq!(stars.len() * FLOATS_PER_STAR, self.data.len());

        let offset = slot * FLOATS_PER_SAMPLE;
        for (chunk, star) in self.data.chunks_exact_mut(FLOATS_PER_STAR).zip(stars) {
            let sample = &mut chunk[offset..offset + FLOATS_PER_SAMPLE];
            sample[..3].copy_from_slice(&star.position.to_array());
            sample[3..].copy_from_slice(&star.velocity.to_array());
        }
    }

    /// The whole buffer, `12 * num_stars` floats
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Slot written by the latest update
    pub fn parity(&self) -> usize {
        self.parity
    }

    pub fn num_stars(&self) -> usize {
        self.data.len() / FLOATS_PER_STAR
    }

    /// Vertices for the line pass: both slots of every star
    pub fn line_vertex_count(&self) -> u32 {
        (2 * self.num_stars()) as u32
    }

    /// Byte offset of the fresh slot for the point pass
    pub fn point_offset(&self) -> u64 {
        self.parity as u64 * LINE_STRIDE
    }

    /// Sample `slot` of star `index` as `(position, velocity)`
    pub fn sample(&self, index: usize, slot: usize) -> ([f32; 3], [f32; 3]) {
        let base = index * FLOATS_PER_STAR + slot * FLOATS_PER_SAMPLE;
        let s = &self.data[base..base + FLOATS_PER_SAMPLE];
        ([s[0], s[1], s[2]], [s[3], s[4], s[5]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Eye;
    use glam::{Mat3, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type Small = SimulationState<2, 25>;

    fn scene() -> Small {
        let eye = Eye::new(Vec3::new(0.0, 0.0, 1.5), Mat3::IDENTITY);
        Small::initialized(eye, &mut StdRng::seed_from_u64(8))
    }

    #[test]
    fn buffer_has_twelve_floats_per_star() {
        let state = scene();
        let trail = TrailBuffer::new(&state);
        assert_eq!(trail.as_slice().len(), 12 * 50);
        assert_eq!(trail.line_vertex_count(), 100);
        assert_eq!(trail.parity(), 0);
    }

    #[test]
    fn updates_alternate_slots() {
        let mut state = scene();
        let mut trail = TrailBuffer::new(&state);

        trail.update(&mut state, 0.016);
        assert_eq!(trail.parity(), 1);
        let first: Vec<_> = (0..50).map(|i| trail.sample(i, 1)).collect();
        for (i, star) in state.stars.iter().enumerate() {
            assert_eq!(first[i], (star.position.to_array(), star.velocity.to_array()));
        }

        trail.update(&mut state, 0.016);
        assert_eq!(trail.parity(), 0);
        for (i, star) in state.stars.iter().enumerate() {
            // Fresh slot holds the new state, the other still holds call k-1
            assert_eq!(trail.sample(i, 0), (star.position.to_array(), star.velocity.to_array()));
            assert_eq!(trail.sample(i, 1), first[i]);
        }
    }

    #[test]
    fn point_offset_tracks_parity() {
        let mut state = scene();
        let mut trail = TrailBuffer::new(&state);
        assert_eq!(trail.point_offset(), 0);

        trail.update(&mut state, 0.0);
        assert_eq!(trail.point_offset(), 24);
        assert_eq!(POINT_STRIDE, 48);
    }

    #[test]
    fn fill_collapses_trails() {
        let mut state = scene();
        let mut trail = TrailBuffer::new(&state);
        for _ in 0..3 {
            trail.update(&mut state, 0.0);
        }

        trail.fill(&state);
        for i in 0..trail.num_stars() {
            assert_eq!(trail.sample(i, 0), trail.sample(i, 1));
        }
    }

    #[test]
    fn dt_does_not_scale_the_step() {
        let mut a = scene();
        let mut b = scene();
        let mut trail_a = TrailBuffer::new(&a);
        let mut trail_b = TrailBuffer::new(&b);

        let slow = trail_a.update(&mut a, 0.001).to_vec();
        let fast = trail_b.update(&mut b, 1.0).to_vec();
        assert_eq!(slow, fast);
    }
}
