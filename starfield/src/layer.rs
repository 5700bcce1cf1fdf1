//! Scene driver: owns the simulation and its trail buffer

use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::config::SceneConfig;
use crate::constants::{NUM_GALAXIES, STARS_PER};
use crate::galaxy;
use crate::state::{Attractors, Eye, SimulationState};
use crate::trail::TrailBuffer;

/// Whether an input handler used an event or left it for the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Consume,
    PassOn,
}

/// The galaxy scene. Call [`SpaceLayer::update`] once per frame, then hand
/// [`SpaceLayer::trail`] to the renderer.
pub struct SpaceLayer<const GALAXIES: usize = NUM_GALAXIES, const PER_GALAXY: usize = STARS_PER> {
    state: SimulationState<GALAXIES, PER_GALAXY>,
    trail: TrailBuffer,
    rng: StdRng,
    seed: u64,
    frame: u64,
}

impl<const GALAXIES: usize, const PER_GALAXY: usize> SpaceLayer<GALAXIES, PER_GALAXY> {
    pub fn new(config: &SceneConfig, eye: Eye) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let state = SimulationState::initialized(eye, &mut rng);
        let trail = TrailBuffer::new(&state);

        log::info!(
            "starfield: {} galaxies x {} stars, seed {}",
            GALAXIES,
            PER_GALAXY,
            seed
        );

        Self {
            state,
            trail,
            rng,
            seed,
            frame: 0,
        }
    }

    /// Advance one fixed step and repack the trail buffer
    pub fn update(&mut self, dt: f32) -> &[f32] {
        self.frame += 1;
        self.trail.update(&mut self.state, dt)
    }

    /// Scatter a brand new set of galaxies around the current eye
    pub fn reset(&mut self) {
        galaxy::initialize(&mut self.state, &mut self.rng);
        self.trail.fill(&self.state);
        log::info!("starfield reset at frame {}", self.frame);
    }

    /// Space restarts the scene; everything else goes to the next handler
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) -> EventAction {
        if state != ElementState::Pressed {
            return EventAction::PassOn;
        }
        match key {
            KeyCode::Space => {
                self.reset();
                EventAction::Consume
            }
            _ => EventAction::PassOn,
        }
    }

    /// Follow the viewer; recycling and resets use the latest eye
    pub fn set_eye(&mut self, eye: Eye) {
        self.state.eye = eye;
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn state(&self) -> &SimulationState<GALAXIES, PER_GALAXY> {
        &self.state
    }

    pub fn attractors(&self) -> &Attractors {
        &self.state.attractors
    }

    pub fn attractors_mut(&mut self) -> &mut Attractors {
        &mut self.state.attractors
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat3, Vec3};

    type Layer = SpaceLayer<2, 20>;

    fn layer(seed: u64) -> Layer {
        let config = SceneConfig::default().with_seed(seed);
        Layer::new(&config, Eye::new(Vec3::new(0.0, 0.5, 2.0), Mat3::IDENTITY))
    }

    #[test]
    fn seeded_layers_agree() {
        let mut a = layer(17);
        let mut b = layer(17);
        for _ in 0..10 {
            assert_eq!(a.update(0.016), b.update(0.016));
        }
        assert_eq!(a.frame(), 10);
        assert_eq!(a.seed(), 17);
    }

    #[test]
    fn space_press_resets() {
        let mut layer = layer(5);
        for _ in 0..4 {
            layer.update(0.016);
        }
        let before = layer.state().stars.clone();

        let action = layer.handle_key(KeyCode::Space, ElementState::Pressed);
        assert_eq!(action, EventAction::Consume);
        assert_ne!(layer.state().stars, before);

        let trail = layer.trail();
        for i in 0..trail.num_stars() {
            assert_eq!(trail.sample(i, 0), trail.sample(i, 1));
        }
    }

    #[test]
    fn other_keys_pass_on() {
        let mut layer = layer(5);
        let before = layer.state().stars.clone();

        assert_eq!(
            layer.handle_key(KeyCode::Space, ElementState::Released),
            EventAction::PassOn
        );
        assert_eq!(
            layer.handle_key(KeyCode::KeyR, ElementState::Pressed),
            EventAction::PassOn
        );
        assert_eq!(layer.state().stars, before);
    }

    #[test]
    fn reset_keeps_attractors() {
        let mut layer = layer(3);
        layer.attractors_mut().set(0, Vec3::ONE);
        layer.reset();
        assert_eq!(layer.attractors().active_count(), 1);
    }
}
