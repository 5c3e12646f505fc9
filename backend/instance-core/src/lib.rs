pub mod activation;
pub mod args;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod protocol;
pub mod startup;

#[cfg(test)]
mod tests;

/// Default bound on the Secondary's connect attempt, in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 500;

/// Default bound on reading the single line of an accepted connection, in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1_000;

/// Default bound on waiting for the activation server to stop, in milliseconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 2_000;
