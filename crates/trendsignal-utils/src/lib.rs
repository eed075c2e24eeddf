//! Shared utilities for trendsignal
//!
//! Logging setup and environment helpers used by the library and the binary.

pub mod env;
pub mod logging;

pub use env::{EnvSource, load_dotenv};
pub use logging::{LogFormat, init_tracing};
