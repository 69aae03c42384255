//! Collision detection components for ECS
//!
//! A collider describes a shape in its entity's local space. Trigger colliders
//! report overlaps but never produce a physical response.

use crate::ecs::Component;
use crate::physics::{CollisionLayers, CollisionShape};

/// Component that marks an entity as having collision detection enabled
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderComponent {
    /// The collision shape, in local space
    pub shape: CollisionShape,

    /// Collision layer bitmask (what layer is this entity on?)
    pub layer: u32,

    /// Collision mask (what layers can this entity collide with?)
    pub mask: u32,

    /// Is this a trigger volume (generates events but no physical response)?
    pub is_trigger: bool,
}

impl Component for ColliderComponent {
    fn instantiate(&self) -> Option<Self> {
        Some(self.clone())
    }
}

impl ColliderComponent {
    /// Create a new solid collider on all layers
    pub fn new(shape: CollisionShape) -> Self {
        Self {
            shape,
            layer: CollisionLayers::ALL,
            mask: CollisionLayers::ALL,
            is_trigger: false,
        }
    }

    /// Sphere collider centered on the entity
    pub fn sphere(radius: f32) -> Self {
        Self::new(CollisionShape::sphere(radius))
    }

    /// Create a collider with specific layer and mask
    pub fn with_layers(mut self, layer: u32, mask: u32) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Mark this as a trigger volume
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }
}
