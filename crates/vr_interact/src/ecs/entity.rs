//! Entity implementation

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// Generational handle: a handle to a destroyed entity never aliases an
    /// entity created later, so holding one never keeps anything alive.
    pub struct Entity;
}
