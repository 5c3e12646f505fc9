//! Activation channel wire protocol and OS resource naming.
//!
//! # Protocol
//!
//! UTF-8 text, exactly one `\n` terminated line per connection. The client writes,
//! flushes and closes; the server reads at most one line and disconnects.
//!
//! # Naming
//!
//! The mutex and the endpoint are both derived from an [`InstanceIdentity`]:
//! a fixed application identifier plus a scope prefix. [`InstanceScope::Session`]
//! folds the current user name into the prefix because local socket namespaces
//! (abstract sockets on Linux, `\\.\pipe\` on Windows) are machine wide.

use crate::error::ProtocolError;

use common::{APP_IDENTIFIER, ErrorLocation};

use std::env::{temp_dir, var};
#[cfg(windows)]
use std::env::var_os;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::io::Result as IoResult;
use std::panic::Location;
use std::path::PathBuf;

use interprocess::local_socket::{
    GenericFilePath, GenericNamespaced, Name, NameType, ToFsName, ToNsName,
};
use serde::Deserialize;

/// Longest line the server accepts, terminator included.
pub const MAX_LINE_BYTES: usize = 256;

const BRING_TO_FRONT: &str = "BringToFront";
const LOCAL_PREFIX: &str = "Local";
const GLOBAL_PREFIX: &str = "Global";
const LOCK_EXTENSION: &str = "lock";
const ENDPOINT_EXTENSION: &str = "sock";
const UNKNOWN_USER: &str = "user";
#[cfg(not(windows))]
const MACHINE_TEMP_DIR: &str = "/tmp";

/// Closed vocabulary of requests a Secondary can forward to the Primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationMessage {
    /// Make the Primary's window visible, un-minimize it and bring it to the foreground.
    BringToFront,
}

impl ActivationMessage {
    pub const ALL: [ActivationMessage; 1] = [ActivationMessage::BringToFront];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivationMessage::BringToFront => BRING_TO_FRONT,
        }
    }

    /// The message as written on the wire, terminator included.
    pub fn to_line(self) -> String {
        format!("{}\n", self.as_str())
    }

    /// Matches one received line against the vocabulary.
    ///
    /// Trailing `\r\n` and surrounding whitespace are ignored; the payload itself is
    /// case-sensitive.
    #[track_caller]
    pub fn from_line(line: &str) -> Result<Self, ProtocolError> {
        let location = ErrorLocation::from(Location::caller());

        if line.len() > MAX_LINE_BYTES {
            return Err(ProtocolError::MalformedMessage {
                message: format!("Line of {} bytes exceeds {MAX_LINE_BYTES}", line.len()),
                location,
            });
        }

        let payload = line.trim();
        Self::ALL
            .into_iter()
            .find(|message| message.as_str() == payload)
            .ok_or_else(|| ProtocolError::MalformedMessage {
                message: format!("Unrecognized activation message: '{}'", payload.escape_debug()),
                location,
            })
    }
}

impl Display for ActivationMessage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

/// Breadth of the single-instance guarantee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceScope {
    /// One Primary per user session.
    #[default]
    Session,
    /// One Primary per machine.
    Global,
}

/// Deterministic source of every OS resource name used for coordination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    identifier: String,
    scope: InstanceScope,
}

impl Default for InstanceIdentity {
    fn default() -> Self {
        Self::new(APP_IDENTIFIER, InstanceScope::default())
    }
}

impl InstanceIdentity {
    pub fn new(identifier: impl Into<String>, scope: InstanceScope) -> Self {
        Self {
            identifier: identifier.into(),
            scope,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn scope(&self) -> InstanceScope {
        self.scope
    }

    /// `Local-<user>` or `Global`.
    pub fn scope_prefix(&self) -> String {
        match self.scope {
            InstanceScope::Session => format!("{LOCAL_PREFIX}-{}", current_user()),
            InstanceScope::Global => GLOBAL_PREFIX.to_string(),
        }
    }

    /// Name of the session-wide mutual-exclusion object.
    pub fn mutex_name(&self) -> String {
        format!("{}-{}", self.scope_prefix(), self.identifier)
    }

    /// Directory holding file-backed resources: the lock file where the mutex is a file,
    /// the socket file where namespaced sockets are unsupported.
    ///
    /// Session scope uses per-user directories. Global scope uses a directory every user
    /// on the machine resolves to the same path.
    pub fn resource_dir(&self) -> PathBuf {
        match self.scope {
            InstanceScope::Session => dirs::runtime_dir()
                .or_else(dirs::cache_dir)
                .unwrap_or_else(temp_dir),
            InstanceScope::Global => machine_dir(),
        }
    }

    pub fn lock_path(&self) -> PathBuf {
        self.resource_dir()
            .join(format!("{}.{LOCK_EXTENSION}", self.mutex_name()))
    }

    /// Endpoint name within the local socket namespace.
    pub fn endpoint_id(&self) -> String {
        format!("{}.{ENDPOINT_EXTENSION}", self.mutex_name())
    }

    /// Filesystem path of the endpoint on platforms without a local socket namespace.
    pub fn endpoint_path(&self) -> Option<PathBuf> {
        (!GenericNamespaced::is_supported()).then(|| self.resource_dir().join(self.endpoint_id()))
    }

    /// Resolves the endpoint into a name both the listener and the client can use.
    pub fn endpoint_name(&self) -> IoResult<Name<'static>> {
        match self.endpoint_path() {
            Some(path) => path.to_fs_name::<GenericFilePath>(),
            None => self.endpoint_id().to_ns_name::<GenericNamespaced>(),
        }
    }
}

#[cfg(windows)]
fn machine_dir() -> PathBuf {
    // %TEMP% is per-user on Windows.
    var_os("ProgramData")
        .map(PathBuf::from)
        .unwrap_or_else(temp_dir)
}

#[cfg(not(windows))]
fn machine_dir() -> PathBuf {
    PathBuf::from(MACHINE_TEMP_DIR)
}

fn current_user() -> String {
    let user = var("USER")
        .or_else(|_| var("USERNAME"))
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect::<String>();

    if user.is_empty() {
        UNKNOWN_USER.to_string()
    } else {
        user
    }
}
