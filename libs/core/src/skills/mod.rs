//! One async handler per AdCP operation, plus the legacy skill aliases that
//! delegate to them. Every handler takes `(&TypedRequest, &ToolContext,
//! &Deps)` and returns the operation's typed response — never panics, never
//! bubbles a raw `serde_json::Error`; failures are collected into the
//! response's own `errors[]`.

pub mod aliases;
pub mod creatives;
pub mod deps;
pub mod dispatch;
pub mod media_buy;
pub mod products;
pub mod signals;
pub mod table;

pub use deps::Deps;
pub use dispatch::dispatch_skill;
