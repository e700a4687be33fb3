//! srcdom_core: Core utilities for the C/C++ source DOM.
//!
//! Provides text spans, line maps, string interning, and the captured
//! token buffer shared by the DOM node model and the builder.

pub mod intern;
pub mod text;
pub mod token;

// Re-export commonly used types
pub use intern::{InternedString, StringInterner};
pub use text::{LineMap, TextPos, TextSpan};
pub use token::{Name, Token, TokenBuf, TokenId, TokenKind};
