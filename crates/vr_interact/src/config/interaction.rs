//! Interaction settings

use super::{Config, ConfigError, Deserialize, Serialize};

/// Default radius of the generated near-touch sphere (meters)
pub const DEFAULT_COLLIDER_RADIUS: f32 = 0.2;

/// Whether `radius` can describe a sphere (finite and strictly positive)
pub fn is_valid_collider_radius(radius: f32) -> bool {
    radius.is_finite() && radius > 0.0
}

/// Top-level interaction configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Near-touch volume settings
    pub near_touch: NearTouchConfig,
}

impl Config for InteractionConfig {}

impl InteractionConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.near_touch.validate()
    }
}

/// Near-touch volume configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearTouchConfig {
    /// Radius of the auto generated sphere when no custom container is used
    pub collider_radius: f32,

    /// Name of a scene entity holding custom colliders to clone instead
    pub custom_collider_container: Option<String>,
}

impl Default for NearTouchConfig {
    fn default() -> Self {
        Self {
            collider_radius: DEFAULT_COLLIDER_RADIUS,
            custom_collider_container: None,
        }
    }
}

impl NearTouchConfig {
    /// Reject radii that cannot describe a sphere
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_collider_radius(self.collider_radius) {
            return Err(ConfigError::Invalid(format!(
                "near_touch.collider_radius must be a positive number, got {}",
                self.collider_radius
            )));
        }
        Ok(())
    }
}
