//! Token value types: redacted secrets, cached token state, and consent helpers.

pub mod authorization;
pub mod secret;
pub mod state;

pub use authorization::*;
pub use secret::*;
pub use state::*;
