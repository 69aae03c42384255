//! Trigger overlap detection
//!
//! Each frame the detector snapshots every active collider in world space,
//! finds the overlapping pairs (broad-phase bounding spheres, then the exact
//! shape test) and diffs them against the previous frame. The difference is
//! reported as balanced [`OverlapEvent::Begin`] / [`OverlapEvent::End`] events.
//!
//! A pair is considered only when:
//! - both colliders are active in the hierarchy,
//! - at least one of them is a trigger,
//! - at least one of them belongs to a rigid body (on itself or an ancestor),
//! - they do not belong to the same rigid body,
//! - their layers and masks accept each other.

use crate::ecs::components::{ColliderComponent, RigidBodyComponent};
use crate::ecs::{Entity, World};
use crate::physics::collision::{BoundingSphere, WorldShape};
use crate::physics::collision_layers::CollisionLayers;
use std::collections::HashSet;

/// Pair of overlapping collider entities (stored in a canonical order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlapPair {
    /// Smaller entity handle
    pub entity_a: Entity,
    /// Larger entity handle
    pub entity_b: Entity,
}

impl OverlapPair {
    /// Create a new pair, ordering the entities so (a, b) == (b, a)
    pub fn new(entity_a: Entity, entity_b: Entity) -> Self {
        if entity_a <= entity_b {
            Self { entity_a, entity_b }
        } else {
            Self { entity_a: entity_b, entity_b: entity_a }
        }
    }

    /// Whether the pair involves `entity`
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }
}

/// Overlap transition between two frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapEvent {
    /// The colliders started overlapping this frame
    Begin(OverlapPair),
    /// The colliders stopped overlapping (or one of them disappeared)
    End(OverlapPair),
}

impl OverlapEvent {
    /// The pair this event is about
    pub fn pair(&self) -> OverlapPair {
        match self {
            Self::Begin(pair) | Self::End(pair) => *pair,
        }
    }
}

/// World-space snapshot of one collider
struct ColliderSnapshot {
    entity: Entity,
    shape: WorldShape,
    bounds: BoundingSphere,
    layer: u32,
    mask: u32,
    is_trigger: bool,
    body: Option<Entity>,
}

/// Frame-to-frame trigger overlap tracker
#[derive(Debug, Default)]
pub struct OverlapDetector {
    /// Overlapping pairs from the current frame
    current_pairs: HashSet<OverlapPair>,

    /// Overlapping pairs from the previous frame
    previous_pairs: HashSet<OverlapPair>,
}

impl OverlapDetector {
    /// Create a detector with no known overlaps
    pub fn new() -> Self {
        Self::default()
    }

    /// Run detection for one frame and return the transitions
    ///
    /// End events come first, then Begin events, each sorted by pair so the
    /// output is deterministic.
    pub fn detect(&mut self, world: &World) -> Vec<OverlapEvent> {
        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();

        let snapshots = Self::snapshot(world);
        for (index, a) in snapshots.iter().enumerate() {
            for b in &snapshots[index + 1..] {
                if Self::should_test(a, b) && a.bounds.intersects(&b.bounds) && a.shape.intersects(&b.shape) {
                    self.current_pairs.insert(OverlapPair::new(a.entity, b.entity));
                }
            }
        }

        let mut ended: Vec<OverlapPair> = self.previous_pairs.difference(&self.current_pairs).copied().collect();
        let mut began: Vec<OverlapPair> = self.current_pairs.difference(&self.previous_pairs).copied().collect();
        ended.sort_unstable();
        began.sort_unstable();

        if !ended.is_empty() || !began.is_empty() {
            log::trace!("Overlaps: {} began, {} ended", began.len(), ended.len());
        }

        ended
            .into_iter()
            .map(OverlapEvent::End)
            .chain(began.into_iter().map(OverlapEvent::Begin))
            .collect()
    }

    fn snapshot(world: &World) -> Vec<ColliderSnapshot> {
        world
            .query::<ColliderComponent>()
            .into_iter()
            .filter(|(entity, _)| world.is_active_in_hierarchy(*entity))
            .map(|(entity, collider)| {
                let shape = collider.shape.to_world(&world.world_transform(entity));
                ColliderSnapshot {
                    entity,
                    bounds: shape.bounding_sphere(),
                    shape,
                    layer: collider.layer,
                    mask: collider.mask,
                    is_trigger: collider.is_trigger,
                    body: world.find_in_ancestors::<RigidBodyComponent>(entity),
                }
            })
            .collect()
    }

    fn should_test(a: &ColliderSnapshot, b: &ColliderSnapshot) -> bool {
        if !(a.is_trigger || b.is_trigger) {
            return false;
        }
        match (a.body, b.body) {
            (None, None) => return false,
            (Some(body_a), Some(body_b)) if body_a == body_b => return false,
            _ => {}
        }
        CollisionLayers::should_collide(a.layer, a.mask, b.layer, b.mask)
    }

    /// All pairs overlapping as of the last [`detect`](Self::detect)
    pub fn current_pairs(&self) -> &HashSet<OverlapPair> {
        &self.current_pairs
    }

    /// Check whether two colliders overlapped in the last frame
    pub fn is_overlapping(&self, entity_a: Entity, entity_b: Entity) -> bool {
        self.current_pairs.contains(&OverlapPair::new(entity_a, entity_b))
    }

    /// Drop every pair involving one of `entities` without emitting End events
    ///
    /// Returns how many pairs were dropped from the current frame.
    pub fn forget(&mut self, entities: &[Entity]) -> usize {
        let involved = |pair: &OverlapPair| entities.iter().any(|&entity| pair.contains(entity));
        self.previous_pairs.retain(|pair| !involved(pair));
        let before = self.current_pairs.len();
        self.current_pairs.retain(|pair| !involved(pair));
        before - self.current_pairs.len()
    }

    /// Forget every tracked pair without emitting End events
    pub fn clear(&mut self) {
        self.current_pairs.clear();
        self.previous_pairs.clear();
    }
}
