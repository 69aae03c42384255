//! Controller interactions
//!
//! Currently the near-touch subsystem: a controller's proximity volume and the
//! events raised when interactable objects come near it.
//!
//! Data flow for one frame:
//!
//! ```text
//! OverlapDetector ──Begin/End──▶ NearTouchSystem ──▶ NearTouchCollider (on the volume)
//!                                                        │ validity check
//!                                                        ▼
//!                                  InteractableObject ◀──┴──▶ InteractNearTouch listeners
//! ```

pub mod touch;
pub mod interactable;
pub mod near_touch;
pub mod near_touch_collider;
pub mod system;

#[cfg(test)]
mod tests;

pub use touch::{ControllerHand, ControllerReference, InteractTouch, ObjectInteractEvent};
pub use interactable::{AllowedController, InteractableObject};
pub use near_touch::{InteractNearTouch, NearTouchEventType};
pub use near_touch_collider::NearTouchCollider;
pub use system::NearTouchSystem;

use crate::ecs::{Entity, WorldError};
use thiserror::Error;

/// Interaction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// A sensor was bound a second time
    #[error("Near-touch sensor already bound to {sensor_owner:?}")]
    OwnerAlreadyBound {
        /// Owner from the first binding
        sensor_owner: Entity,
    },

    /// Scene operation failed while building a volume
    #[error("World error: {0}")]
    World(#[from] WorldError),
}
