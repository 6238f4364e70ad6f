//! Tracing setup and in-memory audit feed for the AdCP sales agent.
//!
//! ```no_run
//! use adcp_telemetry::{audit::ActivityFeed, init_tracing};
//!
//! # fn main() -> anyhow::Result<()> {
//! init_tracing(false)?;
//! let feed = ActivityFeed::default();
//! feed.log_operation("tenant-a", "principal-1", "get_products", true, None, None);
//! Ok(())
//! # }
//! ```

pub mod audit;
mod tracing_init;

pub use tracing_init::init_tracing;
