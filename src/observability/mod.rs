//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Wallet operations and HTTP handlers produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the HTTP layer into every span
//! - Metrics are cheap (atomic increments) and no-ops until a recorder is installed
//! - Secrets (private keys, mnemonics) never appear in events or labels

pub mod logging;
pub mod metrics;
