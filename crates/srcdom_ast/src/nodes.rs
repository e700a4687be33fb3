//! DOM node definitions and the per-translation-unit node arena.
//!
//! Nodes live in a `Dom` arena and refer to each other by `NodeId`, so
//! a child can point back at its owner and a scope can keep appending
//! declarations after the node was attached. Offsets are recorded when
//! a node opens; lengths are filled in when the matching close event
//! arrives.

use crate::types::*;
use srcdom_core::text::TextSpan;
use srcdom_core::token::Name;

/// Index of a node in its `Dom` arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Common data shared by all DOM nodes.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Byte offset where this element starts.
    pub start: u32,
    /// Total length in bytes, once the element has been closed.
    length: Option<u32>,
    /// 1-based line of the first character, when line decoration is on.
    pub first_line: Option<u32>,
    /// 1-based line of the last character, when line decoration is on.
    pub last_line: Option<u32>,
}

impl NodeData {
    pub fn new(start: u32) -> Self {
        Self {
            start,
            length: None,
            first_line: None,
            last_line: None,
        }
    }

    pub fn length(&self) -> Option<u32> {
        self.length
    }

    /// End offset (exclusive), once the element has been closed.
    pub fn end(&self) -> Option<u32> {
        self.length.map(|len| self.start + len)
    }

    /// Record the total length. Re-closing an element overwrites; the
    /// grouping of `class A { } a;` extends the wrapping declaration
    /// after the class body already closed it once.
    pub fn set_length(&mut self, length: u32) {
        self.length = Some(length);
    }

    /// Record the total length, panicking if it was already set.
    pub fn set_length_once(&mut self, length: u32) {
        assert!(
            self.length.is_none(),
            "element at offset {} was closed twice",
            self.start
        );
        self.length = Some(length);
    }

    pub fn span(&self) -> Option<TextSpan> {
        self.length.map(|len| TextSpan::new(self.start, len))
    }
}

// ============================================================================
// Scopes
// ============================================================================

/// The root of a DOM: the translation unit scope plus the preprocessor
/// side lists.
#[derive(Debug)]
pub struct TranslationUnit {
    pub data: NodeData,
    pub declarations: Vec<NodeId>,
    /// Macro definitions, in source order.
    pub macros: Vec<NodeId>,
    /// Inclusion directives, in source order.
    pub inclusions: Vec<NodeId>,
}

#[derive(Debug)]
pub struct NamespaceDefinition {
    pub data: NodeData,
    /// Absent for anonymous namespaces.
    pub name: Option<Name>,
    pub declarations: Vec<NodeId>,
}

#[derive(Debug)]
pub struct LinkageSpecification {
    pub data: NodeData,
    /// The linkage string, e.g. `"C"`.
    pub language: String,
    pub declarations: Vec<NodeId>,
}

#[derive(Debug)]
pub struct TemplateDeclaration {
    pub data: NodeData,
    pub exported: bool,
    pub parameter_list: Option<NodeId>,
    pub declarations: Vec<NodeId>,
}

#[derive(Debug)]
pub struct ExplicitTemplateDeclaration {
    pub data: NodeData,
    pub kind: ExplicitTemplateKind,
    pub declarations: Vec<NodeId>,
}

/// The `<...>` of a template declaration. Type parameters arrive as
/// `TemplateParameter` children; value parameters as
/// `ParameterDeclaration` children.
#[derive(Debug)]
pub struct TemplateParameterList {
    pub data: NodeData,
    pub parameters: Vec<NodeId>,
}

#[derive(Debug)]
pub struct TemplateParameter {
    pub data: NodeData,
    pub kind: TemplateParameterKind,
    pub name: Option<Name>,
    /// Default type-id, e.g. the `T` of `class U = T`.
    pub default_value: Option<Name>,
    /// Nested list for template-template parameters.
    pub parameter_list: Option<NodeId>,
}

// ============================================================================
// Declarations
// ============================================================================

/// A declaration: one specifier, one or more declarators.
///
/// `int a, b;` is a single `SimpleDeclaration` with two declarators.
#[derive(Debug)]
pub struct SimpleDeclaration {
    pub data: NodeData,
    pub specifier: DeclSpecifier,
    pub declarators: Vec<NodeId>,
    /// Class, enumeration, or elaborated specifier defined inline.
    pub type_specifier: Option<NodeId>,
    /// Visibility of this member, when declared inside a class.
    pub access: Option<AccessVisibility>,
    /// Whether this declaration carried a function body.
    pub is_function_definition: bool,
}

/// A parameter of a function or of a template's value-parameter slot.
#[derive(Debug)]
pub struct ParameterDeclaration {
    pub data: NodeData,
    pub specifier: DeclSpecifier,
    pub declarators: Vec<NodeId>,
}

#[derive(Debug)]
pub struct Declarator {
    pub data: NodeData,
    /// Absent for abstract declarators.
    pub name: Option<Name>,
    /// Nested declarator for pointer-to-function shapes like
    /// `int (*pf)(char)`.
    pub inner: Option<NodeId>,
    pub pointer_operators: Vec<PointerOperator>,
    pub array_qualifiers: Vec<ArrayQualifier>,
    pub bit_field: Option<BitField>,
    pub parameters: Option<NodeId>,
    pub kr_parameters: Option<NodeId>,
    pub exception_specifier: Option<ExceptionSpecifier>,
    pub constructor_chain: Option<ConstructorChain>,
    pub initializer: Option<Expression>,
    /// Trailing cv-qualifiers of a member function declarator.
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_pure_virtual: bool,
}

#[derive(Debug)]
pub struct ParameterDeclarationClause {
    pub data: NodeData,
    pub declarations: Vec<NodeId>,
}

/// The parameter declarations between a K&R function header and its
/// body.
#[derive(Debug)]
pub struct OldKRParameterDeclarationClause {
    pub data: NodeData,
    pub declarations: Vec<NodeId>,
}

// ============================================================================
// Type specifiers
// ============================================================================

#[derive(Debug)]
pub struct ClassSpecifier {
    pub data: NodeData,
    pub key: ClassKey,
    /// Absent for anonymous classes.
    pub name: Option<Name>,
    pub base_specifiers: Vec<BaseSpecifier>,
    pub declarations: Vec<NodeId>,
    /// Member visibility currently in effect while the body is open.
    pub visibility: AccessVisibility,
    /// The `SimpleDeclaration` wrapping this specifier.
    pub owner_declaration: NodeId,
}

/// `class A`, `struct S`, `union U`, or `enum E` used as a type
/// without a body.
#[derive(Debug)]
pub struct ElaboratedTypeSpecifier {
    pub data: NodeData,
    pub key: ClassKey,
    pub name: Name,
    /// The `SimpleDeclaration` wrapping this specifier.
    pub owner_declaration: NodeId,
}

#[derive(Debug)]
pub struct EnumerationSpecifier {
    pub data: NodeData,
    /// Absent for anonymous enumerations.
    pub name: Option<Name>,
    pub enumerators: Vec<NodeId>,
    /// The `SimpleDeclaration` wrapping this specifier.
    pub owner_declaration: NodeId,
}

#[derive(Debug)]
pub struct EnumeratorDefinition {
    pub data: NodeData,
    pub name: Name,
    /// The raw tokens of `= value`, when written.
    pub initial_value: Option<Expression>,
}

// ============================================================================
// Other declarations
// ============================================================================

#[derive(Debug)]
pub struct UsingDirective {
    pub data: NodeData,
    pub namespace_name: Name,
}

#[derive(Debug)]
pub struct UsingDeclaration {
    pub data: NodeData,
    pub name: Name,
    pub is_typename: bool,
}

#[derive(Debug)]
pub struct AsmDefinition {
    pub data: NodeData,
    pub body: String,
}

// ============================================================================
// Preprocessor side lists
// ============================================================================

#[derive(Debug)]
pub struct Macro {
    pub data: NodeData,
    pub name: String,
}

#[derive(Debug)]
pub struct Inclusion {
    pub data: NodeData,
    pub name: String,
    /// `<name>` rather than `"name"`.
    pub is_system: bool,
}

// ============================================================================
// Node and arena
// ============================================================================

#[derive(Debug)]
pub enum Node {
    TranslationUnit(TranslationUnit),
    Namespace(NamespaceDefinition),
    Linkage(LinkageSpecification),
    TemplateDeclaration(TemplateDeclaration),
    ExplicitTemplate(ExplicitTemplateDeclaration),
    TemplateParameterList(TemplateParameterList),
    TemplateParameter(TemplateParameter),
    SimpleDeclaration(SimpleDeclaration),
    Parameter(ParameterDeclaration),
    Declarator(Declarator),
    ParameterClause(ParameterDeclarationClause),
    KRParameterClause(OldKRParameterDeclarationClause),
    Class(ClassSpecifier),
    ElaboratedType(ElaboratedTypeSpecifier),
    Enumeration(EnumerationSpecifier),
    Enumerator(EnumeratorDefinition),
    UsingDirective(UsingDirective),
    UsingDeclaration(UsingDeclaration),
    Asm(AsmDefinition),
    Macro(Macro),
    Inclusion(Inclusion),
}

impl Node {
    pub fn data(&self) -> &NodeData {
        match self {
            Node::TranslationUnit(n) => &n.data,
            Node::Namespace(n) => &n.data,
            Node::Linkage(n) => &n.data,
            Node::TemplateDeclaration(n) => &n.data,
            Node::ExplicitTemplate(n) => &n.data,
            Node::TemplateParameterList(n) => &n.data,
            Node::TemplateParameter(n) => &n.data,
            Node::SimpleDeclaration(n) => &n.data,
            Node::Parameter(n) => &n.data,
            Node::Declarator(n) => &n.data,
            Node::ParameterClause(n) => &n.data,
            Node::KRParameterClause(n) => &n.data,
            Node::Class(n) => &n.data,
            Node::ElaboratedType(n) => &n.data,
            Node::Enumeration(n) => &n.data,
            Node::Enumerator(n) => &n.data,
            Node::UsingDirective(n) => &n.data,
            Node::UsingDeclaration(n) => &n.data,
            Node::Asm(n) => &n.data,
            Node::Macro(n) => &n.data,
            Node::Inclusion(n) => &n.data,
        }
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        match self {
            Node::TranslationUnit(n) => &mut n.data,
            Node::Namespace(n) => &mut n.data,
            Node::Linkage(n) => &mut n.data,
            Node::TemplateDeclaration(n) => &mut n.data,
            Node::ExplicitTemplate(n) => &mut n.data,
            Node::TemplateParameterList(n) => &mut n.data,
            Node::TemplateParameter(n) => &mut n.data,
            Node::SimpleDeclaration(n) => &mut n.data,
            Node::Parameter(n) => &mut n.data,
            Node::Declarator(n) => &mut n.data,
            Node::ParameterClause(n) => &mut n.data,
            Node::KRParameterClause(n) => &mut n.data,
            Node::Class(n) => &mut n.data,
            Node::ElaboratedType(n) => &mut n.data,
            Node::Enumeration(n) => &mut n.data,
            Node::Enumerator(n) => &mut n.data,
            Node::UsingDirective(n) => &mut n.data,
            Node::UsingDeclaration(n) => &mut n.data,
            Node::Asm(n) => &mut n.data,
            Node::Macro(n) => &mut n.data,
            Node::Inclusion(n) => &mut n.data,
        }
    }
}

/// The node arena for one translation unit.
#[derive(Debug, Default)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        self.nodes[id.index()].data()
    }

    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.nodes[id.index()].data_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a declaration to a scope, preserving arrival order.
    /// Panics if `scope` is not a scope-bearing node.
    pub fn add_declaration(&mut self, scope: NodeId, decl: NodeId) {
        match self.node_mut(scope) {
            Node::TranslationUnit(n) => n.declarations.push(decl),
            Node::Namespace(n) => n.declarations.push(decl),
            Node::Linkage(n) => n.declarations.push(decl),
            Node::TemplateDeclaration(n) => n.declarations.push(decl),
            Node::ExplicitTemplate(n) => n.declarations.push(decl),
            Node::TemplateParameterList(n) => n.parameters.push(decl),
            Node::Class(n) => n.declarations.push(decl),
            Node::ParameterClause(n) => n.declarations.push(decl),
            Node::KRParameterClause(n) => n.declarations.push(decl),
            other => panic!("node {:?} cannot own declarations", other.data().start),
        }
    }

    /// The declarations owned by a scope, in insertion order.
    /// Panics if `scope` is not a scope-bearing node.
    pub fn declarations(&self, scope: NodeId) -> &[NodeId] {
        match self.node(scope) {
            Node::TranslationUnit(n) => &n.declarations,
            Node::Namespace(n) => &n.declarations,
            Node::Linkage(n) => &n.declarations,
            Node::TemplateDeclaration(n) => &n.declarations,
            Node::ExplicitTemplate(n) => &n.declarations,
            Node::TemplateParameterList(n) => &n.parameters,
            Node::Class(n) => &n.declarations,
            Node::ParameterClause(n) => &n.declarations,
            Node::KRParameterClause(n) => &n.declarations,
            other => panic!("node {:?} cannot own declarations", other.data().start),
        }
    }

    // Typed accessors. These panic on kind mismatch; callers hold ids
    // they allocated themselves.

    pub fn translation_unit(&self, id: NodeId) -> &TranslationUnit {
        match self.node(id) {
            Node::TranslationUnit(n) => n,
            _ => panic!("expected translation unit"),
        }
    }

    pub fn translation_unit_mut(&mut self, id: NodeId) -> &mut TranslationUnit {
        match self.node_mut(id) {
            Node::TranslationUnit(n) => n,
            _ => panic!("expected translation unit"),
        }
    }

    pub fn simple_declaration(&self, id: NodeId) -> &SimpleDeclaration {
        match self.node(id) {
            Node::SimpleDeclaration(n) => n,
            _ => panic!("expected simple declaration"),
        }
    }

    pub fn simple_declaration_mut(&mut self, id: NodeId) -> &mut SimpleDeclaration {
        match self.node_mut(id) {
            Node::SimpleDeclaration(n) => n,
            _ => panic!("expected simple declaration"),
        }
    }

    pub fn parameter(&self, id: NodeId) -> &ParameterDeclaration {
        match self.node(id) {
            Node::Parameter(n) => n,
            _ => panic!("expected parameter declaration"),
        }
    }

    pub fn declarator(&self, id: NodeId) -> &Declarator {
        match self.node(id) {
            Node::Declarator(n) => n,
            _ => panic!("expected declarator"),
        }
    }

    pub fn declarator_mut(&mut self, id: NodeId) -> &mut Declarator {
        match self.node_mut(id) {
            Node::Declarator(n) => n,
            _ => panic!("expected declarator"),
        }
    }

    pub fn class_specifier(&self, id: NodeId) -> &ClassSpecifier {
        match self.node(id) {
            Node::Class(n) => n,
            _ => panic!("expected class specifier"),
        }
    }

    pub fn class_specifier_mut(&mut self, id: NodeId) -> &mut ClassSpecifier {
        match self.node_mut(id) {
            Node::Class(n) => n,
            _ => panic!("expected class specifier"),
        }
    }

    pub fn enumeration(&self, id: NodeId) -> &EnumerationSpecifier {
        match self.node(id) {
            Node::Enumeration(n) => n,
            _ => panic!("expected enumeration specifier"),
        }
    }

    pub fn enumerator(&self, id: NodeId) -> &EnumeratorDefinition {
        match self.node(id) {
            Node::Enumerator(n) => n,
            _ => panic!("expected enumerator"),
        }
    }

    pub fn template_declaration(&self, id: NodeId) -> &TemplateDeclaration {
        match self.node(id) {
            Node::TemplateDeclaration(n) => n,
            _ => panic!("expected template declaration"),
        }
    }

    pub fn template_declaration_mut(&mut self, id: NodeId) -> &mut TemplateDeclaration {
        match self.node_mut(id) {
            Node::TemplateDeclaration(n) => n,
            _ => panic!("expected template declaration"),
        }
    }

    pub fn template_parameter_list(&self, id: NodeId) -> &TemplateParameterList {
        match self.node(id) {
            Node::TemplateParameterList(n) => n,
            _ => panic!("expected template parameter list"),
        }
    }

    pub fn template_parameter(&self, id: NodeId) -> &TemplateParameter {
        match self.node(id) {
            Node::TemplateParameter(n) => n,
            _ => panic!("expected template parameter"),
        }
    }

    pub fn namespace(&self, id: NodeId) -> &NamespaceDefinition {
        match self.node(id) {
            Node::Namespace(n) => n,
            _ => panic!("expected namespace definition"),
        }
    }

    pub fn linkage(&self, id: NodeId) -> &LinkageSpecification {
        match self.node(id) {
            Node::Linkage(n) => n,
            _ => panic!("expected linkage specification"),
        }
    }

    pub fn explicit_template(&self, id: NodeId) -> &ExplicitTemplateDeclaration {
        match self.node(id) {
            Node::ExplicitTemplate(n) => n,
            _ => panic!("expected explicit template declaration"),
        }
    }

    pub fn elaborated_type(&self, id: NodeId) -> &ElaboratedTypeSpecifier {
        match self.node(id) {
            Node::ElaboratedType(n) => n,
            _ => panic!("expected elaborated type specifier"),
        }
    }

    pub fn parameter_clause(&self, id: NodeId) -> &ParameterDeclarationClause {
        match self.node(id) {
            Node::ParameterClause(n) => n,
            _ => panic!("expected parameter declaration clause"),
        }
    }

    pub fn kr_parameter_clause(&self, id: NodeId) -> &OldKRParameterDeclarationClause {
        match self.node(id) {
            Node::KRParameterClause(n) => n,
            _ => panic!("expected K&R parameter declaration clause"),
        }
    }
}
