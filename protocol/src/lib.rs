//! Wire types for the machine learning module REST API
//!
//! - `common`: records returned by the server
//! - `api`: request payloads sent by clients

pub mod api;
pub mod common;
