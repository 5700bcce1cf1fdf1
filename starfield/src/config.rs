//! Scene configuration

use glam::Vec3;

/// Environment variable holding a fixed RNG seed
pub const SEED_VAR: &str = "STARFIELD_SEED";

/// Window and scene settings
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Where the viewer starts
    pub eye_position: Vec3,
    /// Seed for the layout generator; `None` draws one from entropy
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "Galaxy Starfield - Rust/wgpu".to_string(),
            width: 1280,
            height: 720,
            eye_position: Vec3::new(0.0, 0.5, 2.0),
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Defaults, with the seed taken from `STARFIELD_SEED` if set
    pub fn from_env() -> Self {
        let var = std::env::var(SEED_VAR).ok();
        Self {
            seed: parse_seed(var.as_deref()),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn parse_seed(value: Option<&str>) -> Option<u64> {
    let value = value?.trim();
    match value.parse() {
        Ok(seed) => Some(seed),
        Err(err) => {
            log::warn!("ignoring {}={:?}: {}", SEED_VAR, value, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parsing() {
        assert_eq!(parse_seed(None), None);
        assert_eq!(parse_seed(Some("1234")), Some(1234));
        assert_eq!(parse_seed(Some(" 7 ")), Some(7));
        assert_eq!(parse_seed(Some("galaxy")), None);
        assert_eq!(parse_seed(Some("-1")), None);
    }

    #[test]
    fn defaults_are_unseeded() {
        let config = SceneConfig::default();
        assert!(config.seed.is_none());
        assert_eq!(config.with_seed(9).seed, Some(9));
    }
}
