//! Collision layer system for filtering overlap detection
//!
//! Every collider sits on a layer and carries a mask of the layers it wants to
//! hear about. A pair is only tested when each side's layer is in the other
//! side's mask.

/// Collision layer definitions
pub struct CollisionLayers;

impl CollisionLayers {
    /// No collision layer
    pub const NONE: u32 = 0;

    /// All collision layers
    pub const ALL: u32 = 0xFFFF_FFFF;

    /// Default layer for scene props
    pub const DEFAULT: u32 = 1 << 0;

    /// Tracked controllers and their interaction volumes
    pub const CONTROLLER: u32 = 1 << 1;

    /// Objects that can be touched, grabbed or used
    pub const INTERACTABLE: u32 = 1 << 2;

    /// Static environment geometry
    pub const ENVIRONMENT: u32 = 1 << 3;

    /// Trigger volumes (no physical response)
    pub const TRIGGER: u32 = 1 << 4;

    /// Layers that should never see the player's own volumes
    pub const IGNORE_CONTROLLER: u32 = 1 << 5;

    /// Check if two colliders should be tested based on their layers and masks
    ///
    /// # Example
    /// ```
    /// # use vr_interact::physics::CollisionLayers;
    /// let hand_mask = CollisionLayers::INTERACTABLE | CollisionLayers::DEFAULT;
    /// assert!(CollisionLayers::should_collide(
    ///     CollisionLayers::CONTROLLER, hand_mask,
    ///     CollisionLayers::INTERACTABLE, CollisionLayers::ALL,
    /// ));
    /// ```
    pub const fn should_collide(layer_a: u32, mask_a: u32, layer_b: u32, mask_b: u32) -> bool {
        // A's layer must be in B's mask AND B's layer must be in A's mask
        (layer_a & mask_b) != 0 && (layer_b & mask_a) != 0
    }

    /// Helper to create a mask from multiple layers
    pub fn mask(layers: &[u32]) -> u32 {
        layers.iter().fold(Self::NONE, |acc, &layer| acc | layer)
    }
}
