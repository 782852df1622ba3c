//! Shared test utilities for the Monorepo Conform workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`monorepo`]: [`TestMonorepo`](monorepo::TestMonorepo) builder for
//!   temporary repositories with packages and skeletons

pub mod monorepo;

pub use monorepo::TestMonorepo;
