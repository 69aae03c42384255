//! Entity-Component-System implementation
//!
//! Provides the scene world the interaction components live in: generational
//! entities arranged in a parent/child hierarchy, with typed component storage.

pub mod world;
pub mod entity;
pub mod component;
pub mod components;

pub use world::{World, WorldError};
pub use entity::Entity;
pub use component::Component;
