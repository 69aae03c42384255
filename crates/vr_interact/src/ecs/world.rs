//! ECS World implementation
//!
//! The world owns every entity and component. Besides typed component storage
//! it keeps the scene hierarchy, which is what the interaction layer leans on:
//! searching a collider's ancestors for an interactable, cloning a collider
//! container under a controller, tearing a generated volume down again.

use super::{Component, Entity};
use super::components::TransformComponent;
use crate::foundation::math::Transform;
use slotmap::{SecondaryMap, SlotMap};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use thiserror::Error;

/// World-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The entity was destroyed or never existed
    #[error("Entity not found: {0:?}")]
    EntityNotFound(Entity),

    /// Parenting would make an entity its own ancestor
    #[error("Parenting {child:?} under {parent:?} would create a cycle")]
    HierarchyCycle {
        /// Entity being re-parented
        child: Entity,
        /// Requested parent
        parent: Entity,
    },
}

/// Per-entity bookkeeping
#[derive(Debug, Clone)]
struct EntityRecord {
    name: String,
    parent: Option<Entity>,
    children: Vec<Entity>,
    active: bool,
}

/// Type-erased component column
trait ComponentColumn: Send + Sync {
    fn remove_entity(&mut self, entity: Entity);
    fn instantiate_into(&mut self, source: Entity, target: Entity);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Column<T: Component> {
    values: SecondaryMap<Entity, T>,
}

impl<T: Component> ComponentColumn for Column<T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.values.remove(entity);
    }

    fn instantiate_into(&mut self, source: Entity, target: Entity) {
        if let Some(copy) = self.values.get(source).and_then(Component::instantiate) {
            self.values.insert(target, copy);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// ECS World containing all entities and components
#[derive(Default)]
pub struct World {
    entities: SlotMap<Entity, EntityRecord>,
    columns: HashMap<TypeId, Box<dyn ComponentColumn>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new, active, unparented entity
    pub fn create_entity(&mut self, name: impl Into<String>) -> Entity {
        self.entities.insert(EntityRecord {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            active: true,
        })
    }

    /// Destroy an entity together with all of its descendants
    ///
    /// Returns `false` when the entity was already gone.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.detach(entity);
        for doomed in self.descendants(entity) {
            for column in self.columns.values_mut() {
                column.remove_entity(doomed);
            }
            self.entities.remove(doomed);
        }
        true
    }

    /// Check whether a handle still refers to a live entity
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Get an iterator over all entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    /// Name of an entity
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.entities.get(entity).map(|record| record.name.as_str())
    }

    /// Rename an entity
    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) -> Result<(), WorldError> {
        self.record_mut(entity)?.name = name.into();
        Ok(())
    }

    /// First live entity carrying the given name
    pub fn find_entity_by_name(&self, name: &str) -> Option<Entity> {
        self.entities
            .iter()
            .find(|(_, record)| record.name == name)
            .map(|(entity, _)| entity)
    }

    // ---------------------------------------------------------------------
    // Hierarchy
    // ---------------------------------------------------------------------

    /// Parent of an entity
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.entities.get(entity).and_then(|record| record.parent)
    }

    /// Direct children of an entity (empty for dead entities)
    pub fn children(&self, entity: Entity) -> &[Entity] {
        match self.entities.get(entity) {
            Some(record) => &record.children,
            None => &[],
        }
    }

    /// Attach `child` under `parent`, or make it a root with `None`
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> Result<(), WorldError> {
        if !self.is_alive(child) {
            return Err(WorldError::EntityNotFound(child));
        }
        if let Some(parent) = parent {
            if !self.is_alive(parent) {
                return Err(WorldError::EntityNotFound(parent));
            }
            if self.ancestors(parent).any(|ancestor| ancestor == child) {
                return Err(WorldError::HierarchyCycle { child, parent });
            }
        }

        self.detach(child);
        if let Some(parent) = parent {
            self.attach(child, parent);
        }
        Ok(())
    }

    /// The entity followed by its parent, grandparent, ... up to the root
    pub fn ancestors(&self, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
        let start = self.is_alive(entity).then_some(entity);
        std::iter::successors(start, move |&current| self.parent(current))
    }

    /// The entity and all of its descendants, depth-first pre-order
    pub fn descendants(&self, entity: Entity) -> Vec<Entity> {
        let mut result = Vec::new();
        if !self.is_alive(entity) {
            return result;
        }

        let mut stack = vec![entity];
        while let Some(current) = stack.pop() {
            result.push(current);
            // Reverse so the first child is visited first
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    fn detach(&mut self, child: Entity) {
        let old_parent = self.entities.get_mut(child).and_then(|record| record.parent.take());
        if let Some(old_parent) = old_parent {
            if let Some(record) = self.entities.get_mut(old_parent) {
                record.children.retain(|&c| c != child);
            }
        }
    }

    fn attach(&mut self, child: Entity, parent: Entity) {
        if let Some(record) = self.entities.get_mut(parent) {
            record.children.push(child);
        }
        if let Some(record) = self.entities.get_mut(child) {
            record.parent = Some(parent);
        }
    }

    // ---------------------------------------------------------------------
    // Activation
    // ---------------------------------------------------------------------

    /// Local active flag of an entity (`false` for dead entities)
    pub fn is_active(&self, entity: Entity) -> bool {
        self.entities.get(entity).is_some_and(|record| record.active)
    }

    /// Set the local active flag
    pub fn set_active(&mut self, entity: Entity, active: bool) -> Result<(), WorldError> {
        self.record_mut(entity)?.active = active;
        Ok(())
    }

    /// Active only when the entity and every ancestor are active
    pub fn is_active_in_hierarchy(&self, entity: Entity) -> bool {
        self.is_alive(entity) && self.ancestors(entity).all(|e| self.is_active(e))
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    /// Add a component to an entity, returning the one it replaced
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<Option<T>, WorldError> {
        if !self.is_alive(entity) {
            return Err(WorldError::EntityNotFound(entity));
        }
        Ok(self.column_mut::<T>().values.insert(entity, component))
    }

    /// Remove a component from an entity
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.columns
            .get_mut(&TypeId::of::<T>())
            .and_then(|column| column.as_any_mut().downcast_mut::<Column<T>>())
            .and_then(|column| column.values.remove(entity))
    }

    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.column::<T>().and_then(|column| column.values.get(entity))
    }

    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.columns
            .get_mut(&TypeId::of::<T>())
            .and_then(|column| column.as_any_mut().downcast_mut::<Column<T>>())
            .and_then(|column| column.values.get_mut(entity))
    }

    /// Check whether an entity carries a component
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_some()
    }

    /// All entities carrying a component, with the component
    pub fn query<T: Component>(&self) -> Vec<(Entity, &T)> {
        self.column::<T>()
            .map(|column| column.values.iter().collect())
            .unwrap_or_default()
    }

    /// Nearest entity carrying `T`, searching the entity itself and then its ancestors
    pub fn find_in_ancestors<T: Component>(&self, entity: Entity) -> Option<Entity> {
        self.ancestors(entity).find(|&e| self.has_component::<T>(e))
    }

    /// First entity carrying `T`, searching the entity itself and then its descendants
    pub fn find_in_descendants<T: Component>(&self, entity: Entity) -> Option<Entity> {
        self.descendants(entity)
            .into_iter()
            .find(|&e| self.has_component::<T>(e))
    }

    /// Reuse the first `T` in `root`'s hierarchy or add `make()` to `root`
    ///
    /// Returns the entity holding the component and whether it was created.
    pub fn get_or_add_in_hierarchy<T: Component>(
        &mut self,
        root: Entity,
        make: impl FnOnce() -> T,
    ) -> Result<(Entity, bool), WorldError> {
        if let Some(existing) = self.find_in_descendants::<T>(root) {
            return Ok((existing, false));
        }
        self.add_component(root, make())?;
        Ok((root, true))
    }

    fn column<T: Component>(&self) -> Option<&Column<T>> {
        self.columns
            .get(&TypeId::of::<T>())
            .and_then(|column| column.as_any().downcast_ref::<Column<T>>())
    }

    fn column_mut<T: Component>(&mut self) -> &mut Column<T> {
        let column = self
            .columns
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Column::<T> { values: SecondaryMap::new() }));
        match column.as_any_mut().downcast_mut::<Column<T>>() {
            Some(column) => column,
            None => unreachable!("component column registered under a foreign TypeId"),
        }
    }

    fn record_mut(&mut self, entity: Entity) -> Result<&mut EntityRecord, WorldError> {
        self.entities
            .get_mut(entity)
            .ok_or(WorldError::EntityNotFound(entity))
    }

    // ---------------------------------------------------------------------
    // Instantiation
    // ---------------------------------------------------------------------

    /// Clone `source` and its descendants, attaching the copy under `parent`
    ///
    /// The clone root is named `<source name>(Clone)`; descendants keep their
    /// names. Only components whose [`Component::instantiate`] returns a copy
    /// are carried over.
    pub fn instantiate(&mut self, source: Entity, parent: Option<Entity>) -> Result<Entity, WorldError> {
        let root_name = self
            .name(source)
            .map(|name| format!("{name}(Clone)"))
            .ok_or(WorldError::EntityNotFound(source))?;
        if let Some(parent) = parent {
            if !self.is_alive(parent) {
                return Err(WorldError::EntityNotFound(parent));
            }
        }

        let root = self.clone_subtree(source, parent);
        self.record_mut(root)?.name = root_name;
        Ok(root)
    }

    fn clone_subtree(&mut self, source: Entity, parent: Option<Entity>) -> Entity {
        let (name, active, children) = match self.entities.get(source) {
            Some(record) => (record.name.clone(), record.active, record.children.clone()),
            None => (String::new(), true, Vec::new()),
        };

        let copy = self.create_entity(name);
        if let Some(record) = self.entities.get_mut(copy) {
            record.active = active;
        }
        if let Some(parent) = parent {
            self.attach(copy, parent);
        }
        for column in self.columns.values_mut() {
            column.instantiate_into(source, copy);
        }
        for child in children {
            self.clone_subtree(child, Some(copy));
        }
        copy
    }

    // ---------------------------------------------------------------------
    // Transforms
    // ---------------------------------------------------------------------

    /// Local transform of an entity (identity when it has no transform)
    pub fn local_transform(&self, entity: Entity) -> Transform {
        self.get_component::<TransformComponent>(entity)
            .map(TransformComponent::to_math_transform)
            .unwrap_or_default()
    }

    /// World-space transform, composed from the root down
    pub fn world_transform(&self, entity: Entity) -> Transform {
        let chain: Vec<Entity> = self.ancestors(entity).collect();
        chain
            .into_iter()
            .rev()
            .fold(Transform::identity(), |parent, e| parent.combine(&self.local_transform(e)))
    }
}
