//! Test helpers for coordinator integration tests.
//!
//! Every test runs against its own identifier so parallel tests never share a mutex
//! or an endpoint.

use instance_core::config::CoordinatorConfig;
use instance_core::protocol::InstanceScope;

use uuid::Uuid;

/// Config with a fresh identifier and short timeouts.
pub fn unique_config() -> CoordinatorConfig {
    CoordinatorConfig {
        identifier: format!("test-{}", Uuid::new_v4()),
        scope: InstanceScope::Session,
        connect_timeout_ms: 500,
        read_timeout_ms: 200,
        shutdown_timeout_ms: 2_000,
    }
}
