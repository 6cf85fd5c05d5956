//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Workflow operations produce:
//!     → logging.rs (structured log events, one span per run)
//!     → metrics.rs (submission, failure and confirmation metrics)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Each workflow run carries a run ID through its span
//! - Secrets never appear in log fields
//! - Metrics are cheap (atomic increments) and no-ops without an exporter

pub mod logging;
pub mod metrics;
