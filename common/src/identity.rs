//! Application identity.
//!
//! Mutex, endpoint and boot-registration names are all derived from
//! [`APP_IDENTIFIER`], so no unrelated process can collide with them.

use const_format::concatcp;

/// Human readable application name.
pub const APP_NAME: &str = "PlayRandom";

/// Reverse-DNS style identifier, unique to this application.
pub const APP_IDENTIFIER: &str = "github.neonalig.playrandom";

/// Identifier used where the platform expects a `com.` prefixed label (macOS launch agents).
pub const COM_APP_IDENTIFIER: &str = concatcp!("com.", APP_IDENTIFIER);

/// One line description written into desktop entries.
pub const APP_DESCRIPTION: &str = "Play playlists and folders both quickly, and randomly.";

/// Executable name of the desktop binary.
pub const BINARY_NAME: &str = "playrandom";
