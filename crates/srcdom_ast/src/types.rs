//! Flag types, specifier enums, and declarator decorations.
//!
//! These are the plain value types carried inside DOM nodes: the
//! declaration specifier with its storage-class and cv flags, class
//! keys, member visibility, pointer operators, and the raw-token
//! expression capture.

use srcdom_core::token::{Name, TokenId};
use std::fmt;

bitflags::bitflags! {
    /// Storage-class, function, and cv-qualifier flags collected from a
    /// declaration's specifier sequence.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeclFlags: u32 {
        const NONE      = 0;
        const AUTO      = 1 << 0;
        const REGISTER  = 1 << 1;
        const STATIC    = 1 << 2;
        const EXTERN    = 1 << 3;
        const MUTABLE   = 1 << 4;
        const INLINE    = 1 << 5;
        const VIRTUAL   = 1 << 6;
        const EXPLICIT  = 1 << 7;
        const TYPEDEF   = 1 << 8;
        const FRIEND    = 1 << 9;
        const CONST     = 1 << 10;
        const VOLATILE  = 1 << 11;
        const UNSIGNED  = 1 << 12;
        const SIGNED    = 1 << 13;
        const SHORT     = 1 << 14;
        const LONG      = 1 << 15;

        const STORAGE_CLASS = Self::AUTO.bits()
            | Self::REGISTER.bits()
            | Self::STATIC.bits()
            | Self::EXTERN.bits()
            | Self::MUTABLE.bits();
        const CV_QUALIFIER = Self::CONST.bits() | Self::VOLATILE.bits();
    }
}

/// The built-in type named by a declaration specifier, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleType {
    /// No type was written (constructors, or `unsigned x;` style defaults).
    Unspecified,
    Void,
    Char,
    WChar,
    Bool,
    Int,
    Float,
    Double,
    /// A user-defined type; the name is carried separately.
    Named,
}

/// The specifier half of a declaration: flags, built-in type, and the
/// type name when the type is user-defined.
#[derive(Debug, Clone)]
pub struct DeclSpecifier {
    pub flags: DeclFlags,
    pub simple_type: SimpleType,
    pub type_name: Option<Name>,
}

impl DeclSpecifier {
    pub fn new(flags: DeclFlags, simple_type: SimpleType) -> Self {
        Self {
            flags,
            simple_type,
            type_name: None,
        }
    }

    pub fn named(flags: DeclFlags, type_name: Name) -> Self {
        Self {
            flags,
            simple_type: SimpleType::Named,
            type_name: Some(type_name),
        }
    }

    pub fn is_typedef(&self) -> bool {
        self.flags.contains(DeclFlags::TYPEDEF)
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(DeclFlags::STATIC)
    }

    pub fn is_virtual(&self) -> bool {
        self.flags.contains(DeclFlags::VIRTUAL)
    }
}

impl Default for DeclSpecifier {
    fn default() -> Self {
        Self::new(DeclFlags::NONE, SimpleType::Unspecified)
    }
}

/// The keyword introducing a class-like specifier.
///
/// `Enum` only ever appears on elaborated type specifiers
/// (`enum E e;`); enumeration definitions get their own node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKey {
    Class,
    Struct,
    Union,
    Enum,
}

impl ClassKey {
    /// Member visibility in effect before any access label is seen.
    pub fn default_visibility(self) -> AccessVisibility {
        match self {
            ClassKey::Class => AccessVisibility::Private,
            _ => AccessVisibility::Public,
        }
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassKey::Class => write!(f, "class"),
            ClassKey::Struct => write!(f, "struct"),
            ClassKey::Union => write!(f, "union"),
            ClassKey::Enum => write!(f, "enum"),
        }
    }
}

/// Member access visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessVisibility {
    Public,
    Protected,
    Private,
}

/// `*` or `&` in a declarator, with its cv-qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerOperator {
    pub kind: PointerKind,
    pub is_const: bool,
    pub is_volatile: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Pointer,
    Reference,
}

/// One `[bounds]` suffix on a declarator.
#[derive(Debug, Clone)]
pub struct ArrayQualifier {
    pub bounds: Option<Expression>,
}

/// A `: width` bit-field suffix on a member declarator.
#[derive(Debug, Clone)]
pub struct BitField {
    pub width: Expression,
}

/// A `throw(...)` clause on a function declarator.
#[derive(Debug, Clone)]
pub struct ExceptionSpecifier {
    /// Whether a throw clause was written at all.
    pub throws: bool,
    pub type_names: Vec<Name>,
}

/// The member-initializer list of a constructor definition.
#[derive(Debug, Clone, Default)]
pub struct ConstructorChain {
    pub elements: Vec<ConstructorChainElement>,
}

/// One `name(expr, ...)` element of a constructor chain.
#[derive(Debug, Clone)]
pub struct ConstructorChainElement {
    pub name: Name,
    pub expressions: Vec<Expression>,
}

/// One captured piece of an expression: a raw token or a resolvable
/// name range.
#[derive(Debug, Clone, Copy)]
pub enum ExpressionElement {
    Token(TokenId),
    Name(Name),
}

/// A raw-token expression capture.
///
/// Expressions are never evaluated here; initializers, enumerator
/// values, array bounds, and default arguments are preserved verbatim
/// for later consumers.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    elements: Vec<ExpressionElement>,
}

impl Expression {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn push_token(&mut self, token: TokenId) {
        self.elements.push(ExpressionElement::Token(token));
    }

    pub fn push_name(&mut self, name: Name) {
        self.elements.push(ExpressionElement::Name(name));
    }

    pub fn elements(&self) -> &[ExpressionElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// The keyword introducing a template parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateParameterKind {
    Class,
    Typename,
    Template,
}

/// Whether an explicit template declaration is an instantiation
/// (`template class A<int>;`) or a specialization (`template <> ...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplicitTemplateKind {
    Instantiation,
    Specialization,
}

/// A single entry of a class's base clause.
#[derive(Debug, Clone)]
pub struct BaseSpecifier {
    pub name: Name,
    pub is_virtual: bool,
    pub access: AccessVisibility,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_visibility() {
        assert_eq!(ClassKey::Class.default_visibility(), AccessVisibility::Private);
        assert_eq!(ClassKey::Struct.default_visibility(), AccessVisibility::Public);
        assert_eq!(ClassKey::Union.default_visibility(), AccessVisibility::Public);
    }

    #[test]
    fn test_decl_flags_groups() {
        let flags = DeclFlags::STATIC | DeclFlags::CONST | DeclFlags::UNSIGNED;
        assert!(flags.intersects(DeclFlags::STORAGE_CLASS));
        assert!(flags.intersects(DeclFlags::CV_QUALIFIER));
        assert!(!DeclFlags::UNSIGNED.intersects(DeclFlags::STORAGE_CLASS));
    }

    #[test]
    fn test_specifier_helpers() {
        let spec = DeclSpecifier::new(DeclFlags::TYPEDEF | DeclFlags::UNSIGNED, SimpleType::Int);
        assert!(spec.is_typedef());
        assert!(!spec.is_static());
        assert_eq!(spec.simple_type, SimpleType::Int);
        assert!(spec.type_name.is_none());
    }
}
