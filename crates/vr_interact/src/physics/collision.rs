//! Collision shapes and narrow-phase intersection tests
//!
//! Shapes are authored in an entity's local space ([`CollisionShape`]) and
//! resolved against the entity's world transform into a [`WorldShape`] before
//! testing.

use crate::foundation::math::{Quat, Transform, Vec3};

/// Collision shape in local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    /// Sphere around a local center point
    Sphere {
        /// Center offset from the entity origin
        center: Vec3,
        /// Sphere radius before scaling
        radius: f32,
    },
    /// Box around a local center point, aligned with the entity's axes
    Box {
        /// Center offset from the entity origin
        center: Vec3,
        /// Half size along each local axis before scaling
        half_extents: Vec3,
    },
}

impl CollisionShape {
    /// Sphere centered on the entity origin
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { center: Vec3::zeros(), radius }
    }

    /// Box centered on the entity origin
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box { center: Vec3::zeros(), half_extents }
    }

    /// Radius for sphere shapes
    pub fn radius(&self) -> Option<f32> {
        match self {
            Self::Sphere { radius, .. } => Some(*radius),
            Self::Box { .. } => None,
        }
    }

    /// Resolve this shape against an entity's world transform
    ///
    /// Spheres take the largest scale axis so they stay spheres.
    pub fn to_world(&self, transform: &Transform) -> WorldShape {
        match *self {
            Self::Sphere { center, radius } => WorldShape::Sphere(BoundingSphere::new(
                transform.transform_point(center),
                radius * transform.max_scale(),
            )),
            Self::Box { center, half_extents } => WorldShape::Box(OrientedBox {
                center: transform.transform_point(center),
                half_extents: half_extents.component_mul(&transform.scale).abs(),
                rotation: transform.rotation,
            }),
        }
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another (touching counts)
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }
}

/// Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    /// Center in world space
    pub center: Vec3,
    /// Half size along the box's own axes
    pub half_extents: Vec3,
    /// World rotation of the box axes
    pub rotation: Quat,
}

impl OrientedBox {
    /// Closest point of the box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let local = self.rotation.inverse() * (point - self.center);
        let clamped = Vec3::new(
            local.x.clamp(-self.half_extents.x, self.half_extents.x),
            local.y.clamp(-self.half_extents.y, self.half_extents.y),
            local.z.clamp(-self.half_extents.z, self.half_extents.z),
        );
        self.center + self.rotation * clamped
    }

    /// World-space axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let rotation = self.rotation.to_rotation_matrix();
        let matrix = rotation.matrix();
        let extent = Vec3::new(
            matrix.row(0).abs().dot(&self.half_extents.transpose()),
            matrix.row(1).abs().dot(&self.half_extents.transpose()),
            matrix.row(2).abs().dot(&self.half_extents.transpose()),
        );
        (self.center - extent, self.center + extent)
    }
}

/// Collision shape resolved into world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldShape {
    /// World-space sphere
    Sphere(BoundingSphere),
    /// World-space oriented box
    Box(OrientedBox),
}

impl WorldShape {
    /// Radius of a sphere enclosing the shape, for broad-phase culling
    pub fn bounding_sphere(&self) -> BoundingSphere {
        match self {
            Self::Sphere(sphere) => *sphere,
            Self::Box(oriented) => BoundingSphere::new(oriented.center, oriented.half_extents.magnitude()),
        }
    }

    /// Narrow-phase intersection test
    ///
    /// Sphere pairs and sphere/box pairs are exact. Box pairs are tested on
    /// their world-space axis-aligned bounds.
    pub fn intersects(&self, other: &WorldShape) -> bool {
        match (self, other) {
            (Self::Sphere(a), Self::Sphere(b)) => a.intersects(b),
            (Self::Sphere(sphere), Self::Box(oriented)) | (Self::Box(oriented), Self::Sphere(sphere)) => {
                let closest = oriented.closest_point(sphere.center);
                (closest - sphere.center).magnitude_squared() <= sphere.radius * sphere.radius
            }
            (Self::Box(a), Self::Box(b)) => {
                let (min_a, max_a) = a.bounds();
                let (min_b, max_b) = b.bounds();
                min_a.x <= max_b.x && max_a.x >= min_b.x
                    && min_a.y <= max_b.y && max_a.y >= min_b.y
                    && min_a.z <= max_b.z && max_a.z >= min_b.z
            }
        }
    }
}
