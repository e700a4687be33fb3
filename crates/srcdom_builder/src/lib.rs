//! srcdom_builder: Event-driven construction of the source DOM.
//!
//! A parser drives the `SourceElementSink` trait in strict source
//! order; `DomBuilder` turns the event stream into the node tree
//! defined by `srcdom_ast`, tracking nesting with a scope stack and
//! finalizing offsets as scopes close.

pub mod builder;
pub mod events;
pub mod scope;

pub use builder::{DomBuilder, IncompleteDomError, LineLookup, SourceDom};
pub use events::*;
pub use scope::ScopeStack;
