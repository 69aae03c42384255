//! Near-touch demo application
//!
//! Sweeps three bodies past a right-hand controller and logs the near-touch
//! events they raise: a plain crate, a mug any hand may touch and a glove
//! reserved for the left hand. Pass a `.toml` or `.ron` interaction config as
//! the first argument to override the defaults.

use thiserror::Error;
use vr_interact::foundation::logging;
use vr_interact::prelude::*;

// Sweep configuration
const SWEEP_FRAMES: u16 = 40;
const SWEEP_START: f32 = -1.0;
const SWEEP_END: f32 = 1.0;
const BODY_RADIUS: f32 = 0.05;

/// Name of the optional custom collider container in the demo scene
const FINGER_COLLIDERS: &str = "FingerColliders";

#[derive(Error, Debug)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Interaction error: {0}")]
    Interaction(#[from] InteractionError),

    #[error("World error: {0}")]
    World(#[from] WorldError),
}

struct SweptBody {
    entity: Entity,
    lane: f32, // Vertical offset from the sweep line
}

struct NearTouchDemo {
    world: World,
    system: NearTouchSystem,
    controller: Entity,
    bodies: Vec<SweptBody>,
}

impl NearTouchDemo {
    fn new(config: &InteractionConfig) -> Result<Self, AppError> {
        let mut world = World::new();
        Self::spawn_finger_colliders(&mut world)?;

        let controller = world.create_entity("RightController");
        world.add_component(controller, TransformComponent::identity())?;
        world.add_component(controller, InteractTouch::new(ControllerHand::Right))?;

        let mut near_touch = InteractNearTouch::from_config(&config.near_touch, &world)?;
        near_touch.subscribe_near_touch(|source, event: &ObjectInteractEvent| {
            log::info!(
                "Near touch: {:?} controller of {source:?} reached {:?}",
                event.controller.hand,
                event.target
            );
        });
        near_touch.subscribe_near_untouch(|source, event: &ObjectInteractEvent| {
            log::info!(
                "Near untouch: {:?} controller of {source:?} left {:?}",
                event.controller.hand,
                event.target
            );
        });
        world.add_component(controller, near_touch)?;

        let bodies = vec![
            SweptBody { entity: Self::spawn_body(&mut world, "Crate", None)?, lane: 0.0 },
            SweptBody { entity: Self::spawn_body(&mut world, "Mug", Some(AllowedController::Both))?, lane: 0.05 },
            SweptBody {
                entity: Self::spawn_body(&mut world, "LeftGlove", Some(AllowedController::LeftOnly))?,
                lane: -0.05,
            },
        ];

        Ok(Self {
            world,
            system: NearTouchSystem::new(),
            controller,
            bodies,
        })
    }

    /// Parked out of reach; only used when the config names it
    fn spawn_finger_colliders(world: &mut World) -> Result<(), AppError> {
        let container = world.create_entity(FINGER_COLLIDERS);
        world.add_component(container, TransformComponent::from_position(Vec3::new(0.0, 10.0, 0.0)))?;

        let tip = world.create_entity("IndexTip");
        world.add_component(tip, TransformComponent::from_position(Vec3::new(0.0, 0.0, 0.08)))?;
        world.add_component(tip, ColliderComponent::new(CollisionShape::cuboid(Vec3::new(0.02, 0.02, 0.06))))?;
        world.set_parent(tip, Some(container))?;
        Ok(())
    }

    fn spawn_body(world: &mut World, name: &str, allowed: Option<AllowedController>) -> Result<Entity, AppError> {
        let body = world.create_entity(name);
        world.add_component(body, TransformComponent::from_position(Vec3::new(SWEEP_START, 0.0, 0.0)))?;
        world.add_component(body, RigidBodyComponent::new())?;
        world.add_component(body, ColliderComponent::sphere(BODY_RADIUS))?;
        if let Some(allowed) = allowed {
            world.add_component(body, InteractableObject::new().with_allowed_near_touch_controllers(allowed))?;
        }
        Ok(body)
    }

    fn sweep(&mut self) -> usize {
        let mut fired = 0;
        for frame in 0..=SWEEP_FRAMES {
            let t = f32::from(frame) / f32::from(SWEEP_FRAMES);
            let x = SWEEP_START + (SWEEP_END - SWEEP_START) * t;
            for body in &self.bodies {
                if let Some(transform) = self.world.get_component_mut::<TransformComponent>(body.entity) {
                    transform.position = Vec3::new(x, body.lane, 0.0);
                }
            }

            let events = self.system.update(&mut self.world);
            if events > 0 {
                log::debug!("Frame {frame}: {events} near-touch event(s)");
            }
            fired += events;
        }
        fired
    }

    fn run(&mut self) -> Result<(), AppError> {
        match self.system.enable(&mut self.world, self.controller)? {
            Some(volume) => log::info!(
                "Near-touch volume '{}' ready",
                self.world.name(volume).unwrap_or_default()
            ),
            None => log::warn!("No near-touch volume was built, expect no events"),
        }

        let fired = self.sweep();
        log::info!("Sweep finished with {fired} near-touch event(s)");

        // Park the mug on the controller and cycle the volume
        let mug = self.bodies[1].entity;
        if let Some(transform) = self.world.get_component_mut::<TransformComponent>(mug) {
            transform.position = Vec3::zeros();
        }
        log::info!("Cycling the near-touch volume");
        self.system.disable(&mut self.world, self.controller);
        self.system.enable(&mut self.world, self.controller)?;
        self.system.update(&mut self.world);

        let near_touched = self
            .world
            .get_component::<InteractableObject>(mug)
            .is_some_and(InteractableObject::is_near_touched);
        log::info!("Mug near touched after reactivation: {near_touched}");

        self.system.disable(&mut self.world, self.controller);
        self.system.update(&mut self.world);
        Ok(())
    }
}

fn main() -> Result<(), AppError> {
    logging::init();
    log::info!("Starting near-touch demo");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading interaction config from {path}");
            InteractionConfig::load_from_file(&path)?
        }
        None => InteractionConfig::default(),
    };
    config.validate()?;

    let mut demo = NearTouchDemo::new(&config)?;
    match demo.run() {
        Ok(()) => {
            log::info!("Near-touch demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Near-touch demo failed: {e}");
            Err(e)
        }
    }
}
