//! Infrastructure layer providing external service integrations.
//!
//! Storage backends, identity, clipboard access, configuration and
//! logging setup live here.

pub mod clipboard;
pub mod config;
pub mod identity;
pub mod logging;
pub mod persistence;
pub mod rest;

pub use clipboard::*;
pub use config::*;
pub use identity::*;
pub use logging::*;
pub use persistence::*;
pub use rest::*;
