//! Client library and terminal front end for machine learning module records
//!
//! The [`gateway`] talks to the REST API, the [`controller`] owns the page state
//! and reconciles it after every call, and [`page`] drives both from the
//! terminal through [`form`] and [`list`].

pub mod cli;
pub mod client;
pub mod collection;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod gateway;
pub mod list;
pub mod page;
pub mod ui;
pub mod version;

pub use mlmod_protocol as protocol;

#[cfg(test)]
mod tests;
