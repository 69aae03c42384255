//! Near-touch volume owner
//!
//! [`InteractNearTouch`] sits on a controller (or on an entity below one). On
//! activation it builds a trigger volume as a child of the controller:
//!
//! - without a custom collider container, a new entity with a sphere trigger of
//!   `collider_radius`, carrying the controller's local scale;
//! - with a container, a clone of the container hierarchy, whose first collider
//!   is forced into trigger mode.
//!
//! Either way the volume gets exactly one kinematic, rotation-locked rigid body
//! and a [`NearTouchCollider`] bound back to the owner. The volume is destroyed
//! on deactivation and rebuilt from scratch on the next activation.

use crate::config::{is_valid_collider_radius, ConfigError, NearTouchConfig, DEFAULT_COLLIDER_RADIUS};
use crate::ecs::components::{ColliderComponent, RigidBodyComponent, RigidBodyConstraints, TransformComponent};
use crate::ecs::{Component, Entity, World};
use crate::events::{EventDispatcher, HandlerId};
use crate::foundation::math::Vec3;
use crate::foundation::naming::generated_object_name;
use super::near_touch_collider::NearTouchCollider;
use super::touch::{InteractTouch, ObjectInteractEvent};
use super::InteractionError;

/// Events raised by [`InteractNearTouch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NearTouchEventType {
    /// A valid object entered the near-touch volume
    NearTouch,
    /// A valid object left the near-touch volume
    NearUntouch,
}

/// Owner of a controller's near-touch volume
#[derive(Debug)]
pub struct InteractNearTouch {
    /// Radius of the auto generated sphere when no container is supplied
    pub collider_radius: f32,

    /// Optional entity whose colliders are cloned instead of generating a sphere.
    /// Borrowed: never modified or destroyed here.
    pub custom_collider_container: Option<Entity>,

    /// Touch controller the volume belongs to. Resolved from the owner's
    /// ancestors on activation when left empty.
    pub interact_touch: Option<Entity>,

    volume: Option<Entity>,
    events: EventDispatcher<NearTouchEventType, ObjectInteractEvent>,
}

impl Component for InteractNearTouch {}

impl Default for InteractNearTouch {
    fn default() -> Self {
        Self {
            collider_radius: DEFAULT_COLLIDER_RADIUS,
            custom_collider_container: None,
            interact_touch: None,
            volume: None,
            events: EventDispatcher::new(),
        }
    }
}

impl InteractNearTouch {
    /// Create an owner with the default radius
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an owner from configuration, resolving the container by entity name
    ///
    /// The configuration is validated first, so an unusable radius is
    /// reported here rather than at activation.
    pub fn from_config(config: &NearTouchConfig, world: &World) -> Result<Self, ConfigError> {
        config.validate()?;
        let container = config.custom_collider_container.as_deref().and_then(|name| {
            let found = world.find_entity_by_name(name);
            if found.is_none() {
                log::warn!("Custom collider container '{name}' not found, generating a sphere instead");
            }
            found
        });

        Ok(Self {
            collider_radius: config.collider_radius,
            custom_collider_container: container,
            ..Self::default()
        })
    }

    /// Builder pattern: Set the generated sphere radius
    pub fn with_collider_radius(mut self, radius: f32) -> Self {
        self.collider_radius = radius;
        self
    }

    /// Builder pattern: Clone this container instead of generating a sphere
    pub fn with_custom_collider_container(mut self, container: Entity) -> Self {
        self.custom_collider_container = Some(container);
        self
    }

    /// Builder pattern: Use this touch controller instead of searching ancestors
    pub fn with_interact_touch(mut self, controller: Entity) -> Self {
        self.interact_touch = Some(controller);
        self
    }

    /// The current volume entity, if built
    pub fn volume(&self) -> Option<Entity> {
        self.volume
    }

    /// The resolved (or explicitly set) touch controller
    pub fn interact_touch(&self) -> Option<Entity> {
        self.interact_touch
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    /// Listen for valid objects entering the volume
    pub fn subscribe_near_touch(
        &mut self,
        handler: impl FnMut(Entity, &ObjectInteractEvent) + Send + Sync + 'static,
    ) -> HandlerId {
        self.events.register_handler(NearTouchEventType::NearTouch, Box::new(handler))
    }

    /// Listen for valid objects leaving the volume
    pub fn subscribe_near_untouch(
        &mut self,
        handler: impl FnMut(Entity, &ObjectInteractEvent) + Send + Sync + 'static,
    ) -> HandlerId {
        self.events.register_handler(NearTouchEventType::NearUntouch, Box::new(handler))
    }

    /// Stop a listener registered with either subscribe method
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        self.events.unregister_handler(id)
    }

    /// Number of listeners for an event
    pub fn listener_count(&self, event_type: NearTouchEventType) -> usize {
        self.events.handler_count(event_type)
    }

    /// Raise the near-touch event; returns how many listeners ran
    pub fn notify_near_touch(&mut self, source: Entity, event: &ObjectInteractEvent) -> usize {
        self.events.dispatch(NearTouchEventType::NearTouch, source, event)
    }

    /// Raise the near-untouch event; returns how many listeners ran
    pub fn notify_near_untouch(&mut self, source: Entity, event: &ObjectInteractEvent) -> usize {
        self.events.dispatch(NearTouchEventType::NearUntouch, source, event)
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Activate the owner living on `owner`, building its volume
    ///
    /// Returns the new volume, or `None` when `owner` has no
    /// `InteractNearTouch`, no touch controller can be resolved, or a sphere
    /// would be generated from a radius that is not finite and positive. In
    /// that case the owner stays inert until activated again.
    pub fn activate(world: &mut World, owner: Entity) -> Result<Option<Entity>, InteractionError> {
        let Some(near_touch) = world.get_component::<Self>(owner) else {
            return Ok(None);
        };
        let explicit = near_touch.interact_touch;
        let radius = near_touch.collider_radius;
        let container = near_touch
            .custom_collider_container
            .filter(|&container| world.is_alive(container));

        // Never more than one volume per owner
        Self::deactivate(world, owner);

        let controller = explicit
            .filter(|&controller| world.has_component::<InteractTouch>(controller))
            .or_else(|| world.find_in_ancestors::<InteractTouch>(owner));
        if let Some(near_touch) = world.get_component_mut::<Self>(owner) {
            near_touch.interact_touch = controller;
        }

        let Some(controller) = controller else {
            log::debug!("No touch controller found for near-touch owner {owner:?}, staying inert");
            return Ok(None);
        };

        if container.is_none() && !is_valid_collider_radius(radius) {
            log::warn!("Near-touch owner {owner:?} has unusable collider radius {radius}, staying inert");
            return Ok(None);
        }

        let volume = Self::build_detection_volume(world, owner, controller, radius, container)?;
        if let Some(near_touch) = world.get_component_mut::<Self>(owner) {
            near_touch.volume = Some(volume);
        }
        Ok(Some(volume))
    }

    /// Deactivate the owner living on `owner`, destroying its volume
    ///
    /// Returns `false` when there was nothing to destroy.
    pub fn deactivate(world: &mut World, owner: Entity) -> bool {
        let volume = world
            .get_component_mut::<Self>(owner)
            .and_then(|near_touch| near_touch.volume.take());

        match volume {
            Some(volume) => {
                let destroyed = world.destroy_entity(volume);
                if destroyed {
                    log::debug!("Destroyed near-touch volume {volume:?} of {owner:?}");
                }
                destroyed
            }
            None => false,
        }
    }

    fn build_detection_volume(
        world: &mut World,
        owner: Entity,
        controller: Entity,
        radius: f32,
        container: Option<Entity>,
    ) -> Result<Entity, InteractionError> {
        let volume = match container {
            None => {
                let volume = world.create_entity(String::new());
                world.set_parent(volume, Some(controller))?;
                let scale = world
                    .get_component::<TransformComponent>(controller)
                    .map_or_else(|| Vec3::new(1.0, 1.0, 1.0), |transform| transform.scale);
                world.add_component(volume, TransformComponent::identity().with_scale(scale))?;
                volume
            }
            Some(container) => {
                let volume = world.instantiate(container, Some(controller))?;
                // Placed at the controller origin, scale stays the container's own
                let scale = world
                    .get_component::<TransformComponent>(volume)
                    .map_or_else(|| Vec3::new(1.0, 1.0, 1.0), |transform| transform.scale);
                world.add_component(volume, TransformComponent::identity().with_scale(scale))?;
                volume
            }
        };

        world.set_name(
            volume,
            generated_object_name(true, &["Controller", "NearTouch", "CollidersContainer"]),
        )?;

        let (body_holder, _) = world.get_or_add_in_hierarchy(volume, RigidBodyComponent::default)?;
        if let Some(body) = world.get_component_mut::<RigidBodyComponent>(body_holder) {
            body.is_kinematic = true;
            body.constraints = RigidBodyConstraints::FREEZE_ROTATION;
        }

        let (collider_holder, generated) =
            world.get_or_add_in_hierarchy(volume, || ColliderComponent::sphere(radius).as_trigger())?;
        if let Some(collider) = world.get_component_mut::<ColliderComponent>(collider_holder) {
            collider.is_trigger = true;
        }

        let mut sensor = NearTouchCollider::new();
        sensor.set_owner(owner)?;
        world.add_component(volume, sensor)?;

        world.set_active(volume, true)?;

        log::debug!(
            "Built near-touch volume {volume:?} under controller {controller:?} ({})",
            if generated { format!("sphere r={radius}") } else { "custom colliders".to_string() }
        );
        Ok(volume)
    }
}
