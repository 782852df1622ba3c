//! Skeleton reconciliation
//!
//! A skeleton is a reference directory whose entries every package must
//! contain. Packages are compared against the universal skeleton and then
//! against the skeleton for their category.

mod issues;
mod sync;

pub use issues::{SkeletonIssue, SkeletonIssues, list_skeleton_issues};
pub use sync::{ChecksumTreeSync, RsyncTreeSync, TreeSync};
