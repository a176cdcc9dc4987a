//! # nostra-core
//!
//! Core types, traits, configuration, and error handling for Nostra.

pub mod config;
pub mod contact;
pub mod error;
pub mod history;
pub mod phone;
pub mod template;
pub mod traits;

pub use config::shellexpand;
