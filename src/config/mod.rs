//! Host configuration for forta-tasks.
//!
//! This module defines the `HostConfig` struct that represents
//! `forta-tasks.yaml` at the host project root. Unknown fields are ignored
//! for forward compatibility and every field has a default, so a missing
//! file behaves like an empty one.

mod model;
mod operations;


pub use model::{DEFAULT_CLI_COMMAND, DEFAULT_CONFIG_FILE, FortaConfig, HostConfig};
