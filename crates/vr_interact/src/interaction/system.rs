//! ECS near-touch system
//!
//! Bridges a host frame loop to the near-touch components:
//! - `enable` / `disable` forward the host's lifecycle hooks to
//!   [`InteractNearTouch::activate`] / [`InteractNearTouch::deactivate`]
//! - `update` destroys volumes whose owner is gone, then runs overlap
//!   detection once and routes every transition to the sensor owning the
//!   overlapping collider

use crate::ecs::{Entity, World};
use crate::physics::{OverlapDetector, OverlapEvent};
use super::near_touch::InteractNearTouch;
use super::near_touch_collider::NearTouchCollider;
use super::InteractionError;

/// Per-frame driver for near-touch volumes
#[derive(Debug, Default)]
pub struct NearTouchSystem {
    detector: OverlapDetector,
}

impl NearTouchSystem {
    /// Create a new system with a fresh overlap detector
    pub fn new() -> Self {
        Self::default()
    }

    /// Host enabled the component on `owner`
    ///
    /// Overlaps tracked for a volume replaced by the activation are dropped
    /// without raising near-untouch.
    pub fn enable(&mut self, world: &mut World, owner: Entity) -> Result<Option<Entity>, InteractionError> {
        let stale = Self::volume_entities(world, owner);
        let volume = InteractNearTouch::activate(world, owner);
        self.detector.forget(&stale);
        volume
    }

    /// Host disabled the component on `owner`
    ///
    /// Overlaps of the destroyed volume are dropped without raising
    /// near-untouch.
    pub fn disable(&mut self, world: &mut World, owner: Entity) -> bool {
        let stale = Self::volume_entities(world, owner);
        let destroyed = InteractNearTouch::deactivate(world, owner);
        self.detector.forget(&stale);
        destroyed
    }

    /// Destroy volumes whose owner is gone or no longer carries [`InteractNearTouch`]
    ///
    /// Returns how many volumes were destroyed.
    pub fn reap_orphaned_volumes(&mut self, world: &mut World) -> usize {
        let orphaned: Vec<Entity> = world
            .query::<NearTouchCollider>()
            .into_iter()
            .filter(|(_, sensor)| {
                sensor
                    .owner()
                    .is_some_and(|owner| !world.has_component::<InteractNearTouch>(owner))
            })
            .map(|(volume, _)| volume)
            .collect();

        let mut reaped = 0;
        for volume in orphaned {
            let entities = world.descendants(volume);
            if world.destroy_entity(volume) {
                log::debug!("Destroyed near-touch volume {volume:?} left behind by its owner");
                reaped += 1;
            }
            self.detector.forget(&entities);
        }
        reaped
    }

    /// Run one frame; returns how many near-touch / near-untouch events fired
    pub fn update(&mut self, world: &mut World) -> usize {
        self.reap_orphaned_volumes(world);
        let events = self.detector.detect(world);
        events
            .into_iter()
            .map(|event| Self::route(world, event))
            .sum()
    }

    /// Deliver one overlap transition to whichever side carries a sensor
    ///
    /// Transitions involving a destroyed entity are dropped, the same way a
    /// destroyed trigger never reports leaving.
    pub fn route(world: &mut World, event: OverlapEvent) -> usize {
        let pair = event.pair();
        if !world.is_alive(pair.entity_a) || !world.is_alive(pair.entity_b) {
            return 0;
        }

        let mut fired = 0;
        for (collider, other) in [(pair.entity_a, pair.entity_b), (pair.entity_b, pair.entity_a)] {
            let Some(sensor) = world.find_in_ancestors::<NearTouchCollider>(collider) else {
                continue;
            };
            let raised = match event {
                OverlapEvent::Begin(_) => NearTouchCollider::on_overlap_begin(world, sensor, other),
                OverlapEvent::End(_) => NearTouchCollider::on_overlap_end(world, sensor, other),
            };
            fired += usize::from(raised);
        }
        fired
    }

    fn volume_entities(world: &World, owner: Entity) -> Vec<Entity> {
        world
            .get_component::<InteractNearTouch>(owner)
            .and_then(InteractNearTouch::volume)
            .map_or_else(Vec::new, |volume| world.descendants(volume))
    }

    /// Overlap detector backing this system
    pub fn detector(&self) -> &OverlapDetector {
        &self.detector
    }
}
