//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the quote wizard, submission lifecycle and the screen state of the
//! terminal front end.

pub mod lifecycle;
pub mod notifications;
pub mod state;
pub mod wizard;

#[cfg(test)]
pub(crate) mod test_support;

pub use lifecycle::*;
pub use notifications::*;
pub use state::*;
pub use wizard::*;
