//! Component trait

/// Marker trait for components
pub trait Component: 'static + Send + Sync {
    /// Copy of this component for an instantiated (cloned) hierarchy
    ///
    /// Components returning `None` are left behind when a hierarchy is cloned.
    fn instantiate(&self) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}
