//! Domain types, tenant/principal model, schema layer, and skill core for
//! the AdCP sales agent. Transport-agnostic: `apps/adcp-a2a-server` and
//! `apps/adcp-mcp-server` both dispatch into [`skills`] through the same
//! [`skills::Deps`] bundle.

pub mod auth;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod retry;
pub mod routing;
pub mod schema;
pub mod skills;
pub mod task;
pub mod tenant;
pub mod testkit;
pub mod webhook;
