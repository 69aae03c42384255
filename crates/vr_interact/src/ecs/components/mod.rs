//! ECS Components module
//!
//! Contains the scene and physics components the interaction layer builds on

pub mod transform;
pub mod rigid_body;
pub mod collision;

pub use transform::TransformComponent;
pub use rigid_body::{RigidBodyComponent, RigidBodyConstraints};
pub use collision::ColliderComponent;
