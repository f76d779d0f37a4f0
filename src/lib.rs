//! reinstate - SR-22 / FR-44 quote intake
//!
//! A terminal application that walks drivers through a short quote wizard
//! and lets staff track each resulting lead from pending to converted.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
