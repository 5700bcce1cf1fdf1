//! Simulation state: galaxies, stars, attractors and the viewer

use glam::{Mat3, Vec3};

use crate::constants::{MAX_TIPS, NUM_GALAXIES, STARS_PER};

/// A point star. Its galaxy is implied by its index.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// A star cluster with its own mass and disc orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Galaxy {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    /// Unit spin axis of the disc
    pub normal: Vec3,
}

impl Default for Galaxy {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            mass: 0.0,
            normal: Vec3::Z,
        }
    }
}

/// A user-controlled point that pulls bodies toward it while active
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attractor {
    pub position: Vec3,
    pub active: bool,
}

/// Fixed set of attractor slots
#[derive(Debug, Clone, Default)]
pub struct Attractors {
    slots: [Attractor; MAX_TIPS],
}

impl Attractors {
    /// Move a tip and switch it on
    pub fn set(&mut self, tip: usize, position: Vec3) {
        let slot = &mut self.slots[tip];
        if !slot.active {
            log::debug!("attractor {} engaged at {:?}", tip, position);
        }
        *slot = Attractor { position, active: true };
    }

    /// Switch a tip off, keeping its last position
    pub fn release(&mut self, tip: usize) {
        let slot = &mut self.slots[tip];
        if slot.active {
            log::debug!("attractor {} released", tip);
        }
        slot.active = false;
    }

    pub fn release_all(&mut self) {
        for tip in 0..MAX_TIPS {
            self.release(tip);
        }
    }

    pub fn get(&self, tip: usize) -> Option<&Attractor> {
        self.slots.get(tip)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|a| a.active).count()
    }

    pub fn len(&self) -> usize {
        MAX_TIPS
    }

    pub fn is_empty(&self) -> bool {
        MAX_TIPS == 0
    }
}

/// Where the viewer stands and which way they face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eye {
    pub position: Vec3,
    /// World -> eye rotation
    pub rotation: Mat3,
}

impl Eye {
    pub fn new(position: Vec3, rotation: Mat3) -> Self {
        Self { position, rotation }
    }

    /// Rotate an eye-space vector into world space
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.rotation.transpose() * v
    }

    /// World-space look direction
    pub fn forward(&self) -> Vec3 {
        self.to_world(Vec3::NEG_Z)
    }
}

impl Default for Eye {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Mat3::IDENTITY)
    }
}

/// Everything the integrator reads and writes.
///
/// Star `i` belongs to galaxy `i / PER_GALAXY`. Storage is sized once from
/// the const parameters and never grows or shrinks.
#[derive(Debug, Clone)]
pub struct SimulationState<const GALAXIES: usize, const PER_GALAXY: usize> {
    pub galaxies: [Galaxy; GALAXIES],
    pub stars: Box<[Star]>,
    pub attractors: Attractors,
    pub eye: Eye,
}

/// The application's layout
pub type Starfield = SimulationState<NUM_GALAXIES, STARS_PER>;

impl<const GALAXIES: usize, const PER_GALAXY: usize> SimulationState<GALAXIES, PER_GALAXY> {
    pub const NUM_GALAXIES: usize = GALAXIES;
    pub const STARS_PER: usize = PER_GALAXY;
    pub const NUM_STARS: usize = GALAXIES * PER_GALAXY;

    /// Number of force sources: galaxies followed by attractor slots
    pub const NUM_SOURCES: usize = GALAXIES + MAX_TIPS;

    /// Zeroed state; run [`crate::galaxy::initialize`] before stepping
    pub fn new(eye: Eye) -> Self {
        Self {
            galaxies: [Galaxy::default(); GALAXIES],
            stars: vec![Star::default(); Self::NUM_STARS].into_boxed_slice(),
            attractors: Attractors::default(),
            eye,
        }
    }

    /// Galaxy index of star `i`
    #[inline]
    pub fn galaxy_of(i: usize) -> usize {
        i / PER_GALAXY
    }

    /// Stars belonging to galaxy `g`
    pub fn stars_of(&self, g: usize) -> &[Star] {
        &self.stars[g * PER_GALAXY..(g + 1) * PER_GALAXY]
    }

    /// True when every position and velocity is finite
    pub fn is_finite(&self) -> bool {
        self.stars
            .iter()
            .all(|s| s.position.is_finite() && s.velocity.is_finite())
            && self
                .galaxies
                .iter()
                .all(|g| g.position.is_finite() && g.velocity.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_matches_layout() {
        let state = SimulationState::<3, 4>::new(Eye::default());
        assert_eq!(state.galaxies.len(), 3);
        assert_eq!(state.stars.len(), 12);
        assert_eq!(SimulationState::<3, 4>::NUM_SOURCES, 3 + MAX_TIPS);
    }

    #[test]
    fn membership_is_index_partition() {
        type S = SimulationState<3, 4>;
        assert_eq!(S::galaxy_of(0), 0);
        assert_eq!(S::galaxy_of(3), 0);
        assert_eq!(S::galaxy_of(4), 1);
        assert_eq!(S::galaxy_of(11), 2);

        let state = S::new(Eye::default());
        assert_eq!(state.stars_of(2).len(), 4);
    }

    #[test]
    fn attractor_toggling() {
        let mut tips = Attractors::default();
        assert_eq!(tips.active_count(), 0);

        tips.set(2, Vec3::ONE);
        tips.set(4, Vec3::X);
        assert_eq!(tips.active_count(), 2);

        tips.release(2);
        let slot = tips.get(2).unwrap();
        assert!(!slot.active);
        assert_eq!(slot.position, Vec3::ONE);

        tips.release_all();
        assert_eq!(tips.active_count(), 0);
    }

    #[test]
    fn eye_forward_follows_rotation() {
        let eye = Eye::default();
        assert_eq!(eye.forward(), Vec3::NEG_Z);

        // Looking down +X: world +X must map to eye -Z
        let rotation = Mat3::from_cols(Vec3::Z, Vec3::Y, -Vec3::X).transpose();
        let eye = Eye::new(Vec3::ZERO, rotation);
        assert!((eye.forward() - Vec3::X).length() < 1e-6);
    }
}
