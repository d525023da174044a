//! Shared test utilities for the dir-mirror workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`](tree::TestTree) builder holding a source and a
//!   replica directory side by side

pub mod tree;

pub use tree::{TestTree, fixture_path};
