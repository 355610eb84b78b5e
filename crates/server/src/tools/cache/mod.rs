//! Cache-related MCP tools.
//!
//! These operate on the per-module stores directly and never call the model.
//! Every store access is scoped to the module named in the request, so the
//! tools stay correct when several modules share one store file.

pub mod get;
pub mod modules;
pub mod remove;
pub mod stats;

pub use get::{CacheGetParams, get_impl};
pub use modules::{ListModulesParams, list_modules_impl};
pub use remove::{CacheRemoveParams, remove_impl};
pub use stats::{CacheStatsParams, stats_impl};
