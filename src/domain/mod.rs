pub mod models;
pub mod ports;
pub mod services;
pub mod errors;

pub use models::*;
pub use ports::*;
pub use services::*;
pub use errors::*;
