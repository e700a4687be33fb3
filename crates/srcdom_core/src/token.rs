//! Captured tokens and token-range names.
//!
//! The DOM does not scan text itself. The parser hands over the tokens
//! it wants preserved (names, initializer expressions, enumerator
//! values) and the DOM stores them in an append-only `TokenBuf`. A
//! `Name` is an inclusive range of those tokens, so qualified names
//! like `A::B::C` and operator names like `operator=` stay cheap.

use crate::intern::{InternedString, StringInterner};
use crate::text::TextSpan;

/// Index of a captured token in a `TokenBuf`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TokenId(u32);

impl TokenId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The lexical class of a captured token.
///
/// Only the distinctions the DOM needs survive capture; anything the
/// name renderer and expression capture do not care about is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    IntegerLiteral,
    FloatingLiteral,
    CharLiteral,
    StringLiteral,
    ColonColon,
    Star,
    Amp,
    Equals,
    Less,
    Greater,
    LeftParen,
    RightParen,
    Comma,
    Tilde,
    Other,
}

impl TokenKind {
    /// Word-like tokens need a separating space when rendered next to
    /// each other (`unsigned int`, `operator delete`).
    #[inline]
    pub fn is_word(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Keyword
                | TokenKind::IntegerLiteral
                | TokenKind::FloatingLiteral
        )
    }
}

/// A single captured token: kind, source span, interned image.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TextSpan,
    pub image: InternedString,
}

/// An inclusive range of captured tokens naming a declared entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Name {
    pub first: TokenId,
    pub last: TokenId,
}

impl Name {
    /// A name made of a single token.
    #[inline]
    pub fn single(token: TokenId) -> Self {
        Self {
            first: token,
            last: token,
        }
    }

    /// A name spanning from `first` through `last`, inclusive.
    #[inline]
    pub fn spanning(first: TokenId, last: TokenId) -> Self {
        debug_assert!(first.index() <= last.index());
        Self { first, last }
    }
}

/// Append-only buffer of the tokens a translation unit's DOM captured.
///
/// Owns the interner for token images and resolves `Name` ranges back
/// to display text.
pub struct TokenBuf {
    tokens: Vec<Token>,
    interner: StringInterner,
}

impl TokenBuf {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            interner: StringInterner::new(),
        }
    }

    /// Record a token, returning its id.
    pub fn push(&mut self, kind: TokenKind, span: TextSpan, image: &str) -> TokenId {
        let id = TokenId(self.tokens.len() as u32);
        self.tokens.push(Token {
            kind,
            span,
            image: self.interner.intern(image),
        });
        id
    }

    /// Look up a recorded token.
    pub fn get(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    /// The image text of a single token.
    pub fn image(&self, id: TokenId) -> &str {
        self.interner.resolve(self.tokens[id.index()].image)
    }

    /// The source span covered by a name, from the start of its first
    /// token through the end of its last.
    pub fn name_span(&self, name: Name) -> TextSpan {
        let first = self.get(name.first).span;
        let last = self.get(name.last).span;
        first.union(&last)
    }

    /// Render a name as display text.
    ///
    /// Token images are concatenated; a space is inserted only between
    /// two adjacent word-like tokens, so `unsigned int` keeps its space
    /// while `A::B`, `operator=` and `stream<char>` collapse.
    pub fn name_text(&self, name: Name) -> String {
        let mut out = String::new();
        let mut prev_word = false;
        for index in name.first.index()..=name.last.index() {
            let token = &self.tokens[index];
            let word = token.kind.is_word();
            if prev_word && word {
                out.push(' ');
            }
            out.push_str(self.interner.resolve(token.image));
            prev_word = word;
        }
        out
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for TokenBuf {
    fn default() -> Self {
        Self::new()
    }
}
