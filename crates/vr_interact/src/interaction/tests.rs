//! Near-touch scenarios driven through the world and the overlap detector

use super::*;
use crate::ecs::components::{ColliderComponent, RigidBodyComponent, TransformComponent};
use crate::ecs::{Entity, World};
use crate::foundation::math::Vec3;
use crate::foundation::naming::generated_object_name;
use crate::physics::{CollisionShape, OverlapEvent, OverlapPair};
use approx::assert_relative_eq;
use std::sync::{Arc, Mutex};

type EventLog = Arc<Mutex<Vec<(Entity, ObjectInteractEvent)>>>;

fn spawn_controller(world: &mut World, hand: ControllerHand) -> Entity {
    crate::foundation::logging::init_for_tests();
    let controller = world.create_entity("Controller");
    world.add_component(controller, TransformComponent::identity()).unwrap();
    world.add_component(controller, InteractTouch::new(hand)).unwrap();
    controller
}

fn spawn_prop(world: &mut World, name: &str, position: Vec3) -> Entity {
    let prop = world.create_entity(name);
    world.add_component(prop, TransformComponent::from_position(position)).unwrap();
    world.add_component(prop, RigidBodyComponent::new()).unwrap();
    world.add_component(prop, ColliderComponent::sphere(0.1)).unwrap();
    prop
}

fn move_to(world: &mut World, entity: Entity, position: Vec3) {
    world.get_component_mut::<TransformComponent>(entity).unwrap().position = position;
}

fn record_events(world: &mut World, owner: Entity) -> (EventLog, EventLog) {
    let touches = EventLog::default();
    let untouches = EventLog::default();
    let near_touch = world.get_component_mut::<InteractNearTouch>(owner).unwrap();

    let sink = Arc::clone(&touches);
    near_touch.subscribe_near_touch(move |source, event| sink.lock().unwrap().push((source, *event)));
    let sink = Arc::clone(&untouches);
    near_touch.subscribe_near_untouch(move |source, event| sink.lock().unwrap().push((source, *event)));

    (touches, untouches)
}

fn near() -> Vec3 {
    Vec3::new(0.2, 0.0, 0.0)
}

fn far() -> Vec3 {
    Vec3::new(3.0, 0.0, 0.0)
}

#[test]
fn test_radius_builds_kinematic_trigger_sphere_under_controller() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    world.add_component(
        controller,
        TransformComponent::from_position(Vec3::new(1.0, 1.5, 0.0)).with_uniform_scale(2.0),
    ).unwrap();
    world.add_component(controller, InteractNearTouch::new().with_collider_radius(0.3)).unwrap();

    let volume = InteractNearTouch::activate(&mut world, controller).unwrap().unwrap();

    assert_eq!(world.parent(volume), Some(controller));
    assert_eq!(
        world.name(volume),
        Some(generated_object_name(true, &["Controller", "NearTouch", "CollidersContainer"]).as_str())
    );

    let collider = world.get_component::<ColliderComponent>(volume).unwrap();
    assert!(collider.is_trigger);
    assert_relative_eq!(collider.shape.radius().unwrap(), 0.3);

    let body = world.get_component::<RigidBodyComponent>(volume).unwrap();
    assert!(body.is_kinematic);
    assert!(body.is_rotation_frozen());

    let transform = world.get_component::<TransformComponent>(volume).unwrap();
    assert_relative_eq!(transform.position, Vec3::zeros());
    assert_relative_eq!(transform.scale, Vec3::new(2.0, 2.0, 2.0));

    let sensor = world.get_component::<NearTouchCollider>(volume).unwrap();
    assert_eq!(sensor.owner(), Some(controller));

    let near_touch = world.get_component::<InteractNearTouch>(controller).unwrap();
    assert_eq!(near_touch.volume(), Some(volume));
    assert_eq!(near_touch.interact_touch(), Some(controller));
    assert!(world.is_active_in_hierarchy(volume));
}

#[test]
fn test_custom_container_is_cloned_and_forced_to_trigger() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);

    let container = world.create_entity("FingerColliders");
    world.add_component(
        container,
        TransformComponent::from_position(Vec3::new(5.0, 0.0, 0.0)).with_uniform_scale(0.5),
    ).unwrap();
    let tip = world.create_entity("Tip");
    world.add_component(tip, ColliderComponent::new(CollisionShape::cuboid(Vec3::new(0.1, 0.1, 0.2)))).unwrap();
    world.set_parent(tip, Some(container)).unwrap();
    let knuckle = world.create_entity("Knuckle");
    world.add_component(knuckle, ColliderComponent::sphere(0.05)).unwrap();
    world.set_parent(knuckle, Some(container)).unwrap();

    world.add_component(
        controller,
        InteractNearTouch::new().with_custom_collider_container(container),
    ).unwrap();

    let volume = InteractNearTouch::activate(&mut world, controller).unwrap().unwrap();

    assert_ne!(volume, container);
    assert_eq!(world.parent(volume), Some(controller));
    assert!(!world.has_component::<ColliderComponent>(volume));
    assert!(world.get_component::<RigidBodyComponent>(volume).unwrap().is_kinematic);

    let transform = world.get_component::<TransformComponent>(volume).unwrap();
    assert_relative_eq!(transform.position, Vec3::zeros());
    assert_relative_eq!(transform.scale, Vec3::new(0.5, 0.5, 0.5));

    let cloned = world.children(volume).to_vec();
    assert_eq!(cloned.len(), 2);
    assert!(world.get_component::<ColliderComponent>(cloned[0]).unwrap().is_trigger);
    // Only the first collider found is switched to trigger mode
    assert!(!world.get_component::<ColliderComponent>(cloned[1]).unwrap().is_trigger);

    // The source container is borrowed, never touched
    assert!(world.is_alive(container));
    assert!(!world.get_component::<ColliderComponent>(tip).unwrap().is_trigger);
    assert!(!world.has_component::<RigidBodyComponent>(container));
    assert!(!world.has_component::<NearTouchCollider>(container));
    assert_eq!(world.parent(container), None);
}

#[test]
fn test_existing_body_in_container_is_reused() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Left);
    let container = world.create_entity("Shell");
    world.add_component(container, RigidBodyComponent::new()).unwrap();
    world.add_component(container, ColliderComponent::sphere(0.4).as_trigger()).unwrap();
    world.add_component(controller, InteractNearTouch::new().with_custom_collider_container(container)).unwrap();

    let volume = InteractNearTouch::activate(&mut world, controller).unwrap().unwrap();

    let body = world.get_component::<RigidBodyComponent>(volume).unwrap();
    assert!(body.is_kinematic);
    assert!(body.is_rotation_frozen());
    assert_relative_eq!(
        world.get_component::<ColliderComponent>(volume).unwrap().shape.radius().unwrap(),
        0.4
    );
    assert_eq!(world.query::<RigidBodyComponent>().len(), 2);
    assert!(!world.get_component::<RigidBodyComponent>(container).unwrap().is_kinematic);
}

#[test]
fn test_no_controller_means_no_volume_and_no_events() {
    let mut world = World::new();
    let owner = world.create_entity("Stray");
    world.add_component(owner, TransformComponent::identity()).unwrap();
    world.add_component(owner, InteractNearTouch::new()).unwrap();
    let (touches, untouches) = record_events(&mut world, owner);
    spawn_prop(&mut world, "Prop", Vec3::zeros());
    let entities_before = world.entity_count();
    let mut system = NearTouchSystem::new();

    assert_eq!(system.enable(&mut world, owner).unwrap(), None);
    assert_eq!(world.entity_count(), entities_before);
    assert!(world.get_component::<InteractNearTouch>(owner).unwrap().volume().is_none());

    assert_eq!(system.update(&mut world), 0);
    assert!(touches.lock().unwrap().is_empty());
    assert!(untouches.lock().unwrap().is_empty());
}

#[test]
fn test_activate_without_component_is_noop() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);

    assert_eq!(InteractNearTouch::activate(&mut world, controller).unwrap(), None);
    assert!(!InteractNearTouch::deactivate(&mut world, controller));
}

#[test]
fn test_deactivate_twice_is_safe() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    world.add_component(controller, InteractNearTouch::new()).unwrap();

    assert!(!InteractNearTouch::deactivate(&mut world, controller));

    let volume = InteractNearTouch::activate(&mut world, controller).unwrap().unwrap();
    assert!(InteractNearTouch::deactivate(&mut world, controller));
    assert!(!world.is_alive(volume));
    assert!(world.children(controller).is_empty());
    assert!(!InteractNearTouch::deactivate(&mut world, controller));
}

#[test]
fn test_reactivation_rebuilds_single_volume() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    world.add_component(controller, InteractNearTouch::new()).unwrap();

    let first = InteractNearTouch::activate(&mut world, controller).unwrap().unwrap();
    let second = InteractNearTouch::activate(&mut world, controller).unwrap().unwrap();
    assert_ne!(first, second);
    assert!(!world.is_alive(first));
    assert_eq!(world.query::<NearTouchCollider>().len(), 1);

    InteractNearTouch::deactivate(&mut world, controller);
    let third = InteractNearTouch::activate(&mut world, controller).unwrap().unwrap();
    assert!(world.is_alive(third));
    assert_eq!(world.children(controller), &[third]);
}

#[test]
fn test_plain_body_fires_touch_then_untouch_with_same_payload() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    world.add_component(controller, InteractNearTouch::new().with_collider_radius(0.3)).unwrap();
    let (touches, untouches) = record_events(&mut world, controller);
    let prop = spawn_prop(&mut world, "B", far());
    let mut system = NearTouchSystem::new();
    system.enable(&mut world, controller).unwrap();

    assert_eq!(system.update(&mut world), 0);

    move_to(&mut world, prop, near());
    assert_eq!(system.update(&mut world), 1);
    // Staying inside raises nothing new
    assert_eq!(system.update(&mut world), 0);

    move_to(&mut world, prop, far());
    assert_eq!(system.update(&mut world), 1);

    let expected = ObjectInteractEvent {
        controller: ControllerReference { entity: controller, hand: ControllerHand::Right },
        target: prop,
    };
    assert_eq!(touches.lock().unwrap().as_slice(), &[(controller, expected)]);
    assert_eq!(untouches.lock().unwrap().as_slice(), &[(controller, expected)]);
}

#[test]
fn test_denying_interactable_fires_nothing() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    world.add_component(controller, InteractNearTouch::new().with_collider_radius(0.3)).unwrap();
    let (touches, untouches) = record_events(&mut world, controller);
    let prop = spawn_prop(&mut world, "LeftOnly", far());
    world.add_component(
        prop,
        InteractableObject::new().with_allowed_near_touch_controllers(AllowedController::LeftOnly),
    ).unwrap();
    let mut system = NearTouchSystem::new();
    system.enable(&mut world, controller).unwrap();
    system.update(&mut world);

    move_to(&mut world, prop, near());
    assert_eq!(system.update(&mut world), 0);
    assert!(!world.get_component::<InteractableObject>(prop).unwrap().is_near_touched());

    move_to(&mut world, prop, far());
    assert_eq!(system.update(&mut world), 0);

    assert!(touches.lock().unwrap().is_empty());
    assert!(untouches.lock().unwrap().is_empty());
}

#[test]
fn test_allowed_interactable_tracks_near_touching_owner() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Left);
    world.add_component(controller, InteractNearTouch::new().with_collider_radius(0.3)).unwrap();
    let (touches, untouches) = record_events(&mut world, controller);

    // Interactable on the root, collider on a child
    let mug = world.create_entity("Mug");
    world.add_component(mug, TransformComponent::from_position(far())).unwrap();
    world.add_component(mug, RigidBodyComponent::new()).unwrap();
    world.add_component(
        mug,
        InteractableObject::new().with_allowed_near_touch_controllers(AllowedController::LeftOnly),
    ).unwrap();
    let handle = world.create_entity("Handle");
    world.add_component(handle, ColliderComponent::sphere(0.1)).unwrap();
    world.set_parent(handle, Some(mug)).unwrap();

    let mut system = NearTouchSystem::new();
    system.enable(&mut world, controller).unwrap();
    system.update(&mut world);

    move_to(&mut world, mug, near());
    assert_eq!(system.update(&mut world), 1);
    let interactable = world.get_component::<InteractableObject>(mug).unwrap();
    assert_eq!(interactable.near_touching_owners(), &[controller]);
    assert_eq!(touches.lock().unwrap()[0].1.target, handle);

    move_to(&mut world, mug, far());
    assert_eq!(system.update(&mut world), 1);
    assert!(!world.get_component::<InteractableObject>(mug).unwrap().is_near_touched());
    assert_eq!(untouches.lock().unwrap().len(), 1);
}

#[test]
fn test_owner_below_controller_resolves_through_ancestors() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    let anchor = world.create_entity("NearTouchAnchor");
    world.set_parent(anchor, Some(controller)).unwrap();
    world.add_component(anchor, InteractNearTouch::new().with_collider_radius(0.3)).unwrap();
    let (touches, _) = record_events(&mut world, anchor);
    let prop = spawn_prop(&mut world, "Prop", far());
    let mut system = NearTouchSystem::new();

    let volume = system.enable(&mut world, anchor).unwrap().unwrap();
    assert_eq!(world.parent(volume), Some(controller));
    assert_eq!(world.get_component::<InteractNearTouch>(anchor).unwrap().interact_touch(), Some(controller));

    system.update(&mut world);
    move_to(&mut world, prop, near());
    system.update(&mut world);

    let touches = touches.lock().unwrap();
    assert_eq!(touches.len(), 1);
    assert_eq!(touches[0].0, anchor);
    assert_eq!(touches[0].1.controller.entity, controller);
}

#[test]
fn test_explicit_controller_wins_over_ancestors() {
    let mut world = World::new();
    let parent_controller = spawn_controller(&mut world, ControllerHand::Left);
    let explicit = spawn_controller(&mut world, ControllerHand::Right);
    let anchor = world.create_entity("Anchor");
    world.set_parent(anchor, Some(parent_controller)).unwrap();
    world.add_component(anchor, InteractNearTouch::new().with_interact_touch(explicit)).unwrap();

    let volume = InteractNearTouch::activate(&mut world, anchor).unwrap().unwrap();
    assert_eq!(world.parent(volume), Some(explicit));

    // A handle without a touch controller falls back to the search
    let not_a_controller = world.create_entity("Plain");
    world.get_component_mut::<InteractNearTouch>(anchor).unwrap().interact_touch = Some(not_a_controller);
    let volume = InteractNearTouch::activate(&mut world, anchor).unwrap().unwrap();
    assert_eq!(world.parent(volume), Some(parent_controller));
}

#[test]
fn test_disable_while_overlapping_raises_no_untouch() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    world.add_component(controller, InteractNearTouch::new().with_collider_radius(0.3)).unwrap();
    let (touches, untouches) = record_events(&mut world, controller);
    spawn_prop(&mut world, "Prop", near());
    let mut system = NearTouchSystem::new();
    system.enable(&mut world, controller).unwrap();

    assert_eq!(system.update(&mut world), 1);
    assert!(system.disable(&mut world, controller));
    assert_eq!(system.update(&mut world), 0);

    assert_eq!(touches.lock().unwrap().len(), 1);
    assert!(untouches.lock().unwrap().is_empty());
    assert!(system.detector().current_pairs().is_empty());
}

#[test]
fn test_route_skips_destroyed_entities() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    world.add_component(controller, InteractNearTouch::new()).unwrap();
    let volume = InteractNearTouch::activate(&mut world, controller).unwrap().unwrap();
    let prop = spawn_prop(&mut world, "Prop", Vec3::zeros());

    assert_eq!(NearTouchSystem::route(&mut world, OverlapEvent::Begin(OverlapPair::new(volume, prop))), 1);

    world.destroy_entity(prop);
    assert_eq!(NearTouchSystem::route(&mut world, OverlapEvent::End(OverlapPair::new(volume, prop))), 0);
}

#[test]
fn test_sensor_with_destroyed_owner_is_inert() {
    let mut world = World::new();
    let owner = world.create_entity("Gone");
    let volume = world.create_entity("Volume");
    let mut sensor = NearTouchCollider::new();
    sensor.set_owner(owner).unwrap();
    world.add_component(volume, sensor).unwrap();
    let prop = world.create_entity("Prop");
    world.destroy_entity(owner);

    assert!(!NearTouchCollider::on_overlap_begin(&mut world, volume, prop));
}

#[test]
fn test_two_controllers_near_touch_same_object() {
    let mut world = World::new();
    let left = spawn_controller(&mut world, ControllerHand::Left);
    let right = spawn_controller(&mut world, ControllerHand::Right);
    move_to(&mut world, right, Vec3::new(0.4, 0.0, 0.0));
    world.add_component(left, InteractNearTouch::new().with_collider_radius(0.3)).unwrap();
    world.add_component(right, InteractNearTouch::new().with_collider_radius(0.3)).unwrap();
    let ball = spawn_prop(&mut world, "Ball", far());
    world.add_component(ball, InteractableObject::new()).unwrap();

    let mut system = NearTouchSystem::new();
    system.enable(&mut world, left).unwrap();
    system.enable(&mut world, right).unwrap();
    system.update(&mut world);

    move_to(&mut world, ball, near());
    assert_eq!(system.update(&mut world), 2);
    let owners = world.get_component::<InteractableObject>(ball).unwrap().near_touching_owners().to_vec();
    assert_eq!(owners.len(), 2);
    assert!(owners.contains(&left) && owners.contains(&right));
}

#[test]
fn test_any_positive_radius_builds_matching_sphere() {
    for radius in [0.01, 0.05, 0.2, 0.75, 2.5] {
        let mut world = World::new();
        let controller = spawn_controller(&mut world, ControllerHand::Right);
        world.add_component(controller, InteractNearTouch::new().with_collider_radius(radius)).unwrap();

        let volume = InteractNearTouch::activate(&mut world, controller).unwrap().unwrap();

        let collider = world.get_component::<ColliderComponent>(volume).unwrap();
        assert!(collider.is_trigger);
        assert_relative_eq!(collider.shape.radius().unwrap(), radius);
    }
}

#[test]
fn test_unusable_radius_leaves_owner_inert() {
    for radius in [0.0, -0.5, f32::NAN, f32::INFINITY] {
        let mut world = World::new();
        let controller = spawn_controller(&mut world, ControllerHand::Right);
        world.add_component(controller, InteractNearTouch::new().with_collider_radius(radius)).unwrap();
        let (touches, _) = record_events(&mut world, controller);
        spawn_prop(&mut world, "Prop", Vec3::new(0.35, 0.0, 0.0));
        let mut system = NearTouchSystem::new();

        assert_eq!(system.enable(&mut world, controller).unwrap(), None);
        assert!(world.query::<NearTouchCollider>().is_empty());
        assert_eq!(system.update(&mut world), 0);
        assert!(touches.lock().unwrap().is_empty());
    }
}

#[test]
fn test_container_ignores_radius() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    let container = world.create_entity("Shell");
    world.add_component(container, ColliderComponent::sphere(0.4)).unwrap();
    world.add_component(
        controller,
        InteractNearTouch::new()
            .with_collider_radius(-1.0)
            .with_custom_collider_container(container),
    ).unwrap();

    assert!(InteractNearTouch::activate(&mut world, controller).unwrap().is_some());
}

#[test]
fn test_repeated_begins_are_not_deduplicated() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    world.add_component(controller, InteractNearTouch::new()).unwrap();
    let (touches, _) = record_events(&mut world, controller);
    let volume = InteractNearTouch::activate(&mut world, controller).unwrap().unwrap();
    let mug = spawn_prop(&mut world, "Mug", Vec3::zeros());
    world.add_component(mug, InteractableObject::new()).unwrap();

    assert!(NearTouchCollider::on_overlap_begin(&mut world, volume, mug));
    assert!(NearTouchCollider::on_overlap_begin(&mut world, volume, mug));

    assert_eq!(touches.lock().unwrap().len(), 2);
    // The interactable records each owner once
    assert_eq!(
        world.get_component::<InteractableObject>(mug).unwrap().near_touching_owners(),
        &[controller]
    );
}

#[test]
fn test_volume_of_destroyed_owner_is_reaped() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    let anchor = world.create_entity("NearTouchAnchor");
    world.set_parent(anchor, Some(controller)).unwrap();
    world.add_component(anchor, InteractNearTouch::new().with_collider_radius(0.3)).unwrap();
    spawn_prop(&mut world, "Prop", near());
    let mut system = NearTouchSystem::new();
    let volume = system.enable(&mut world, anchor).unwrap().unwrap();
    assert_eq!(system.update(&mut world), 1);

    world.destroy_entity(anchor);
    for _ in 0..4 {
        assert_eq!(system.update(&mut world), 0);
    }

    assert!(!world.is_alive(volume));
    assert!(world.query::<NearTouchCollider>().is_empty());
    assert!(system.detector().current_pairs().is_empty());
    assert!(world.is_alive(controller));
}

#[test]
fn test_volume_of_removed_component_is_reaped() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Left);
    world.add_component(controller, InteractNearTouch::new()).unwrap();
    let mut system = NearTouchSystem::new();
    let volume = system.enable(&mut world, controller).unwrap().unwrap();

    world.remove_component::<InteractNearTouch>(controller);

    assert_eq!(system.reap_orphaned_volumes(&mut world), 1);
    assert!(!world.is_alive(volume));
    assert_eq!(system.reap_orphaned_volumes(&mut world), 0);
}

#[test]
fn test_reenable_while_overlapping_touches_again() {
    let mut world = World::new();
    let controller = spawn_controller(&mut world, ControllerHand::Right);
    world.add_component(controller, InteractNearTouch::new().with_collider_radius(0.3)).unwrap();
    let (touches, untouches) = record_events(&mut world, controller);
    spawn_prop(&mut world, "Prop", near());
    let mut system = NearTouchSystem::new();
    let first = system.enable(&mut world, controller).unwrap().unwrap();
    assert_eq!(system.update(&mut world), 1);

    let second = system.enable(&mut world, controller).unwrap().unwrap();
    assert!(!system.detector().current_pairs().iter().any(|pair| pair.contains(first)));
    assert_eq!(system.update(&mut world), 1);

    assert!(world.is_alive(second));
    assert_eq!(touches.lock().unwrap().len(), 2);
    assert!(untouches.lock().unwrap().is_empty());
}
