//! Touch controller component and interaction event payloads

use crate::ecs::{Component, Entity};

/// Which hand a tracked controller is held in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControllerHand {
    /// Left hand controller
    Left,
    /// Right hand controller
    Right,
    /// Hand not known (e.g. a tracker or a simulated controller)
    #[default]
    Unknown,
}

/// Identifies the controller taking part in an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerReference {
    /// Entity carrying the [`InteractTouch`] component
    pub entity: Entity,
    /// Hand the controller is held in
    pub hand: ControllerHand,
}

/// Payload of controller/object interaction events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectInteractEvent {
    /// Controller doing the interacting
    pub controller: ControllerReference,
    /// Object being interacted with
    pub target: Entity,
}

/// Marks an entity as a touch-capable controller
///
/// Near-touch volumes are anchored to the entity carrying this component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractTouch {
    /// Hand the controller is held in
    pub hand: ControllerHand,
}

impl Component for InteractTouch {
    fn instantiate(&self) -> Option<Self> {
        Some(self.clone())
    }
}

impl InteractTouch {
    /// Create a touch controller for the given hand
    pub fn new(hand: ControllerHand) -> Self {
        Self { hand }
    }

    /// Reference to this controller, given the entity it lives on
    pub fn reference(&self, entity: Entity) -> ControllerReference {
        ControllerReference { entity, hand: self.hand }
    }

    /// Build the event payload for an interaction with `target`
    pub fn interact_event(&self, entity: Entity, target: Entity) -> ObjectInteractEvent {
        ObjectInteractEvent {
            controller: self.reference(entity),
            target,
        }
    }
}
