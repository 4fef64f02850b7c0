//! # mixnet-config
//!
//! Loadable configuration for mixnet components: pool size, timeouts,
//! retry budget, and debug mode, plus a `tracing_subscriber` init helper.

pub mod config;

pub use config::{default_config_path, MixnetConfig};
