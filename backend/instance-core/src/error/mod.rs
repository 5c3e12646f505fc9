pub mod config;
pub mod coordinator;
pub mod protocol;
pub mod startup;

pub use config::ConfigError;
pub use coordinator::CoordinatorError;
pub use protocol::ProtocolError;
pub use startup::StartupError;
