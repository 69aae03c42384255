//! Physics module for trigger overlap detection
//!
//! There is no dynamics simulation here: bodies only group colliders, and
//! trigger colliders report when they start and stop overlapping others.

pub mod collision;
pub mod collision_layers;
pub mod overlap_system;

pub use collision::{BoundingSphere, CollisionShape, OrientedBox, WorldShape};
pub use collision_layers::CollisionLayers;
pub use overlap_system::{OverlapDetector, OverlapEvent, OverlapPair};
pub use crate::ecs::components::{ColliderComponent, RigidBodyComponent, RigidBodyConstraints};
