//! Shared test utilities for the release config workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`ConfigTree`] builder for source trees with config directories

pub mod tree;

pub use tree::ConfigTree;
