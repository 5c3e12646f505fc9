//! Shared building blocks for the PlayRandom workspace.
//!
//! - [`ErrorLocation`]: call-site tracking attached to every error variant
//! - [`identity`]: the fixed application identity that OS resource names derive from

pub mod error;
pub mod identity;


pub use error::error_location::ErrorLocation;
pub use identity::{APP_DESCRIPTION, APP_IDENTIFIER, APP_NAME, BINARY_NAME, COM_APP_IDENTIFIER};
