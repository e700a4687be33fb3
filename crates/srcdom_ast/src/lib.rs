//! srcdom_ast: The C/C++ source DOM node model.
//!
//! Defines every DOM node kind, the per-translation-unit node arena,
//! declaration-specifier and declarator decorations, and a depth-first
//! walk over offset-carrying elements.

pub mod nodes;
pub mod types;
pub mod walk;

// Re-export key types
pub use nodes::*;
pub use types::*;
pub use walk::OffsetableNodes;
