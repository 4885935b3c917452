//! API DTOs module
//!
//! Request payloads for the `/api/machine-learning-modules` resource.

pub mod module;

pub use module::*;
