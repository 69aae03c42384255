//! Names for objects generated at runtime
//!
//! Generated scene objects get bracketed, deterministic names so they are easy
//! to spot when inspecting a scene.

/// Prefix carried by every generated object name
pub const NAME_PREFIX: &str = "[VRI]";

/// Marker inserted after the prefix for auto-generated objects
pub const AUTOGEN_MARKER: &str = "[AUTOGEN]";

/// Build a generated object name from its parts
///
/// # Examples
/// ```
/// # use vr_interact::foundation::naming::generated_object_name;
/// let name = generated_object_name(true, &["Controller", "NearTouch", "CollidersContainer"]);
/// assert_eq!(name, "[VRI][AUTOGEN][Controller][NearTouch][CollidersContainer]");
/// ```
pub fn generated_object_name(autogen: bool, parts: &[&str]) -> String {
    let mut name = String::from(NAME_PREFIX);
    if autogen {
        name.push_str(AUTOGEN_MARKER);
    }
    for part in parts {
        name.push('[');
        name.push_str(part);
        name.push(']');
    }
    name
}
