//! Rigid body component
//!
//! Only the parts the overlap detector and the near-touch volume need: a body
//! marks the root of a collider group and can be kinematic and constrained.

use crate::ecs::Component;

bitflags::bitflags! {
    /// Degrees of freedom a rigid body is not allowed to move in
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RigidBodyConstraints: u32 {
        /// Lock translation along X
        const FREEZE_POSITION_X = 1 << 0;
        /// Lock translation along Y
        const FREEZE_POSITION_Y = 1 << 1;
        /// Lock translation along Z
        const FREEZE_POSITION_Z = 1 << 2;
        /// Lock rotation around X
        const FREEZE_ROTATION_X = 1 << 3;
        /// Lock rotation around Y
        const FREEZE_ROTATION_Y = 1 << 4;
        /// Lock rotation around Z
        const FREEZE_ROTATION_Z = 1 << 5;
        /// Lock translation on every axis
        const FREEZE_POSITION = Self::FREEZE_POSITION_X.bits()
            | Self::FREEZE_POSITION_Y.bits()
            | Self::FREEZE_POSITION_Z.bits();
        /// Lock rotation on every axis
        const FREEZE_ROTATION = Self::FREEZE_ROTATION_X.bits()
            | Self::FREEZE_ROTATION_Y.bits()
            | Self::FREEZE_ROTATION_Z.bits();
    }
}

/// Rigid body attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBodyComponent {
    /// Kinematic bodies are moved only by their transform, never by the simulation
    pub is_kinematic: bool,

    /// Locked degrees of freedom
    pub constraints: RigidBodyConstraints,
}

impl Component for RigidBodyComponent {
    fn instantiate(&self) -> Option<Self> {
        Some(self.clone())
    }
}

impl Default for RigidBodyComponent {
    fn default() -> Self {
        Self {
            is_kinematic: false,
            constraints: RigidBodyConstraints::empty(),
        }
    }
}

impl RigidBodyComponent {
    /// Create a dynamic, unconstrained body
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a kinematic body
    pub fn kinematic() -> Self {
        Self {
            is_kinematic: true,
            ..Self::default()
        }
    }

    /// Builder pattern: Set constraints
    pub fn with_constraints(mut self, constraints: RigidBodyConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// True when rotation is locked on all three axes
    pub fn is_rotation_frozen(&self) -> bool {
        self.constraints.contains(RigidBodyConstraints::FREEZE_ROTATION)
    }
}
