//! Galaxy Starfield
//!
//! A handful of star clusters orbit each other under a softened gravity
//! model. Stars and galaxies can be pulled around by user-controlled
//! attractors ("tips"), and every frame the star state is packed into a
//! two-slot trail buffer that the renderer draws as line segments plus points.
//!
//! - [`sampler`]: random offsets for scattering bodies
//! - [`galaxy`]: initial state generation
//! - [`forces`]: per-source velocity contributions
//! - [`integrator`]: the per-frame predictor/corrector step
//! - [`trail`]: the parity-toggled vertex buffer
//! - [`layer`]: the scene driver tying it together

pub mod config;
pub mod forces;
pub mod galaxy;
pub mod integrator;
pub mod layer;
pub mod sampler;
pub mod state;
pub mod trail;

pub use config::SceneConfig;
pub use layer::{EventAction, SpaceLayer};
pub use state::{Attractor, Attractors, Galaxy, SimulationState, Star, Starfield};
pub use trail::TrailBuffer;

/// Fixed simulation layout and tuning constants
pub mod constants {
    /// Number of galaxies in the scene
    pub const NUM_GALAXIES: usize = 6;

    /// Stars belonging to each galaxy
    pub const STARS_PER: usize = 12_000;

    /// Total star count
    pub const NUM_STARS: usize = NUM_GALAXIES * STARS_PER;

    /// Attractor slots (two hands' worth of fingertips)
    pub const MAX_TIPS: usize = 10;

    /// Floats per trail sample: position xyz + velocity xyz
    pub const FLOATS_PER_SAMPLE: usize = 6;

    /// Floats per star in the trail buffer (two samples)
    pub const FLOATS_PER_STAR: usize = 2 * FLOATS_PER_SAMPLE;

    // Galaxy gravity
    pub const GALAXY_SOFTENING: f32 = 3e-4;
    pub const MASS_PER_STAR: f32 = 5e-11;

    // Attractor pull
    pub const TIP_STRENGTH: f32 = 2e-4;
    pub const TIP_SOFTENING: f32 = 1e-2;
    pub const TIP_LOOKAHEAD: f32 = 0.1;
    pub const TIP_LOOKAHEAD_PER_KIND: f32 = 1e-4;

    // Predictor/corrector weights
    pub const PREDICTOR_STEP: f32 = 0.667;
    pub const PREDICTOR_BLEND: f32 = 0.25;
    pub const CORRECTOR_BLEND: f32 = 0.75;

    // Escape recycling
    pub const ESCAPE_RADIUS_SQ: f32 = 50.0;
    pub const RESPAWN_BACKTRACK: f32 = 10.0;
    pub const RESPAWN_FORWARD: f32 = 0.5;

    // Initial layout
    pub const GALAXY_SPREAD: f32 = 1.2;
    pub const GALAXY_RADIUS: f32 = 1.0;
    pub const DRIFT_ORIGIN: f32 = 1.1;
    pub const DRIFT_FACTOR: f32 = 1e-3;
    pub const DRIFT_JITTER: f32 = 4e-4;
    pub const DISC_RADIUS: f32 = 0.5;
    pub const DISC_FLATTENING: f32 = 0.4;
    pub const FOCAL_GALAXY_OFFSET: [f32; 3] = [0.0, -0.2, -1.2];
}
