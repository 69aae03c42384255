//! Interactable object component
//!
//! Any entity carrying [`InteractableObject`] can be near touched. Colliders on
//! the entity or its descendants count as part of the object.

use crate::ecs::{Component, Entity};
use super::touch::{ControllerHand, ControllerReference};

/// Which controllers may interact with an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AllowedController {
    /// Any controller
    #[default]
    Both,
    /// Only the left hand controller
    LeftOnly,
    /// Only the right hand controller
    RightOnly,
}

impl AllowedController {
    /// Check whether a controller held in `hand` is admitted
    pub fn admits(self, hand: ControllerHand) -> bool {
        match self {
            Self::Both => true,
            Self::LeftOnly => hand == ControllerHand::Left,
            Self::RightOnly => hand == ControllerHand::Right,
        }
    }
}

/// Object that reacts to controllers coming near it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractableObject {
    /// Controllers permitted to near touch this object
    pub allowed_near_touch_controllers: AllowedController,

    near_touching: Vec<Entity>,
}

impl Component for InteractableObject {
    fn instantiate(&self) -> Option<Self> {
        // A fresh copy is not near touched by anyone
        Some(Self::new().with_allowed_near_touch_controllers(self.allowed_near_touch_controllers))
    }
}

impl InteractableObject {
    /// Create an interactable open to both hands
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Restrict which controllers may near touch
    pub fn with_allowed_near_touch_controllers(mut self, allowed: AllowedController) -> Self {
        self.allowed_near_touch_controllers = allowed;
        self
    }

    /// Check whether `controller` may interact given an allow-list
    pub fn is_valid_interactable_controller(
        &self,
        controller: &ControllerReference,
        allowed: AllowedController,
    ) -> bool {
        allowed.admits(controller.hand)
    }

    /// Record that the near-touch volume owned by `owner` reached this object
    pub fn start_near_touching(&mut self, owner: Entity) {
        if !self.near_touching.contains(&owner) {
            self.near_touching.push(owner);
        }
    }

    /// Record that the near-touch volume owned by `owner` left this object
    pub fn stop_near_touching(&mut self, owner: Entity) {
        self.near_touching.retain(|&e| e != owner);
    }

    /// True while at least one controller near touches this object
    pub fn is_near_touched(&self) -> bool {
        !self.near_touching.is_empty()
    }

    /// Owners currently near touching, oldest first
    pub fn near_touching_owners(&self) -> &[Entity] {
        &self.near_touching
    }
}
