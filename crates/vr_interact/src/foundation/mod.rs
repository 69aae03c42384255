//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Logging utilities
//! - Naming helpers for generated scene objects

pub mod math;
pub mod logging;
pub mod naming;
