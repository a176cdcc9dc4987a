//! # nostra-channels
//!
//! Delivery channels for Nostra.

pub mod dry_run;
pub mod whatsapp;

pub use dry_run::DryRunChannel;
pub use whatsapp::CloudApiChannel;
