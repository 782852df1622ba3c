//! Manifest field rules
//!
//! A [`RuleSet`] maps field paths to [`ValueRule`]s. Rules are either
//! concrete expectations or computed from the package's [`RuleContext`];
//! the [`Resolver`] turns any rule into a [`Resolved`] expectation.

mod context;
pub mod factories;
mod resolver;
mod set;
mod spec;
mod value;

pub use context::RuleContext;
pub use resolver::{DEFAULT_RESOLUTION_LIMIT, Resolver};
pub use set::RuleSet;
pub use spec::{RuleEntry, RuleSpec, Sentinel};
pub use value::{Computed, Resolved, ValueRule};
