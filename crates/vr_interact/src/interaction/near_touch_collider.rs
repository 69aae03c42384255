//! Near-touch sensor
//!
//! Lives on the volume built by [`InteractNearTouch`] and turns overlaps of the
//! volume into near-touch events on its owner.

use crate::ecs::{Component, Entity, World};
use super::interactable::InteractableObject;
use super::near_touch::{InteractNearTouch, NearTouchEventType};
use super::touch::{ControllerReference, InteractTouch};
use super::InteractionError;

/// Sensor component placed on a near-touch volume
#[derive(Debug, Default)]
pub struct NearTouchCollider {
    owner: Option<Entity>,
}

impl Component for NearTouchCollider {}

impl NearTouchCollider {
    /// Create an unbound sensor
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the sensor to the entity carrying its [`InteractNearTouch`]
    ///
    /// The handle does not keep the owner alive. Binding twice is rejected and
    /// keeps the first owner.
    pub fn set_owner(&mut self, owner: Entity) -> Result<(), InteractionError> {
        if let Some(existing) = self.owner {
            return Err(InteractionError::OwnerAlreadyBound { sensor_owner: existing });
        }
        self.owner = Some(owner);
        Ok(())
    }

    /// Entity owning this sensor
    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    /// Handle `other` starting to overlap the volume holding `sensor`
    ///
    /// Returns whether the near-touch event was raised.
    pub fn on_overlap_begin(world: &mut World, sensor: Entity, other: Entity) -> bool {
        Self::forward(world, sensor, other, NearTouchEventType::NearTouch)
    }

    /// Handle `other` no longer overlapping the volume holding `sensor`
    ///
    /// Returns whether the near-untouch event was raised.
    pub fn on_overlap_end(world: &mut World, sensor: Entity, other: Entity) -> bool {
        Self::forward(world, sensor, other, NearTouchEventType::NearUntouch)
    }

    /// Whether `controller` may near touch `candidate`
    ///
    /// Bodies without an interactable are always valid targets.
    pub fn is_valid(world: &World, controller: &ControllerReference, candidate: Option<Entity>) -> bool {
        candidate
            .and_then(|candidate| world.get_component::<InteractableObject>(candidate))
            .map_or(true, |interactable| {
                interactable.is_valid_interactable_controller(
                    controller,
                    interactable.allowed_near_touch_controllers,
                )
            })
    }

    fn forward(world: &mut World, sensor: Entity, other: Entity, event_type: NearTouchEventType) -> bool {
        let Some(owner) = world.get_component::<Self>(sensor).and_then(Self::owner) else {
            log::warn!("Near-touch sensor {sensor:?} received an overlap before being bound to an owner");
            return false;
        };
        let Some(controller) = world
            .get_component::<InteractNearTouch>(owner)
            .and_then(InteractNearTouch::interact_touch)
        else {
            log::warn!("Near-touch sensor {sensor:?} lost its owner {owner:?}");
            return false;
        };
        let Some(touch) = world.get_component::<InteractTouch>(controller) else {
            return false;
        };

        let event = touch.interact_event(controller, other);
        let candidate = world.find_in_ancestors::<InteractableObject>(other);

        if !Self::is_valid(world, &event.controller, candidate) {
            log::trace!("{event_type:?} of {other:?} suppressed: controller {controller:?} not allowed");
            return false;
        }

        if let Some(interactable) = candidate.and_then(|c| world.get_component_mut::<InteractableObject>(c)) {
            match event_type {
                NearTouchEventType::NearTouch => interactable.start_near_touching(owner),
                NearTouchEventType::NearUntouch => interactable.stop_near_touching(owner),
            }
        }

        if let Some(near_touch) = world.get_component_mut::<InteractNearTouch>(owner) {
            match event_type {
                NearTouchEventType::NearTouch => near_touch.notify_near_touch(owner, &event),
                NearTouchEventType::NearUntouch => near_touch.notify_near_untouch(owner, &event),
            };
        }
        log::trace!("{event_type:?}: controller {controller:?} -> {other:?}");
        true
    }
}
