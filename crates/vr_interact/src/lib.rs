//! # VR Interact
//!
//! Controller near-touch detection for VR interaction toolkits.
//!
//! A tracked controller carries an [`InteractNearTouch`](interaction::InteractNearTouch)
//! component. When activated it builds a kinematic trigger volume as a child of the
//! controller; the volume's [`NearTouchCollider`](interaction::NearTouchCollider)
//! turns physics overlaps into near-touch / near-untouch events.
//!
//! ## Features
//!
//! - **Scene World**: Generational entities, hierarchy, typed component storage
//! - **Overlap Detection**: Trigger-volume begin/end events with layer filtering
//! - **Near Touch**: Volume lifecycle, validity filtering and multicast events
//! - **Configuration**: TOML / RON settings for the near-touch volume
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vr_interact::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut world = World::new();
//!     let controller = world.create_entity("RightController");
//!     world.add_component(controller, TransformComponent::identity())?;
//!     world.add_component(controller, InteractTouch::new(ControllerHand::Right))?;
//!
//!     let mut near_touch = InteractNearTouch::new().with_collider_radius(0.3);
//!     near_touch.subscribe_near_touch(|source, event: &ObjectInteractEvent| {
//!         log::info!("{:?} near touched {:?}", source, event.target);
//!     });
//!     world.add_component(controller, near_touch)?;
//!
//!     let mut system = NearTouchSystem::new();
//!     system.enable(&mut world, controller)?;
//!     system.update(&mut world);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod events;
pub mod physics;
pub mod interaction;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, InteractionConfig, NearTouchConfig},
        foundation::math::{Vec3, Quat, Transform},
        ecs::{World, Entity, Component, WorldError},
        ecs::components::TransformComponent,
        events::HandlerId,
        physics::{
            ColliderComponent, CollisionShape, CollisionLayers, RigidBodyComponent,
            RigidBodyConstraints, OverlapDetector, OverlapEvent,
        },
        interaction::{
            AllowedController, ControllerHand, ControllerReference, InteractNearTouch,
            InteractTouch, InteractableObject, InteractionError, NearTouchCollider,
            NearTouchSystem, ObjectInteractEvent,
        },
    };
}
