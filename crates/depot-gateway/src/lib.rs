//! # Depot Gateway
//!
//! Thin HTTP adapter over the depot-core storage facade.
//!
//! Two endpoints:
//! - `POST /fetch`: JSON `{bucket, channel}` in, manifest bytes out
//!   (an empty channel means "every resource in the bucket")
//! - `GET /upgrade/*`: the raw content tree of one bucket, fixed at
//!   server start, served as static files
//!
//! The gateway performs no retries and holds no state of its own; every
//! request is answered straight from the store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use server::run_server;
pub use state::AppState;
