// Library root. Exposes internal modules for integration tests in `tests/`.
// Production entry point remains `src/main.rs`.

pub mod alerts;
pub mod api;
pub mod error;
pub mod generation;
pub mod metrics;
pub mod services;

// Startup plumbing used by the binary; public so tests can build a Config.
pub mod cli;
pub mod config;
pub mod logging;
