//! Parser event payloads and the sink trait the parser drives.
//!
//! Every payload is self-contained: it carries its own offsets and its
//! own name, so the sink never has to remember "the last name seen"
//! between calls. Declarator shapes are described recursively and
//! realized as nodes only when the event is accepted.

use srcdom_ast::types::*;
use srcdom_core::token::Name;

/// Closing half of a scope event pair: the offset and length of the
/// construct's final token.
#[derive(Debug, Clone, Copy)]
pub struct ScopeClose {
    pub offset: u32,
    pub length: u32,
}

impl ScopeClose {
    #[inline]
    pub fn end(&self) -> u32 {
        self.offset + self.length
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompilationUnitEvent {
    pub offset: u32,
}

#[derive(Debug, Clone)]
pub struct NamespaceEvent {
    pub offset: u32,
    /// Absent for anonymous namespaces.
    pub name: Option<Name>,
}

#[derive(Debug, Clone)]
pub struct LinkageEvent {
    pub offset: u32,
    /// The linkage string, e.g. `"C"`.
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct ClassEvent {
    /// Start of the wrapping declaration, not of the class keyword.
    pub offset: u32,
    pub key: ClassKey,
    pub name: Option<Name>,
    /// Specifier flags of the wrapping declaration (`typedef struct …`).
    pub specifier: DeclSpecifier,
}

#[derive(Debug, Clone)]
pub struct BaseSpecifierEvent {
    pub name: Name,
    pub is_virtual: bool,
    /// Access as written; absent access defaults to public.
    pub access: Option<AccessVisibility>,
}

#[derive(Debug, Clone, Copy)]
pub struct VisibilityEvent {
    pub visibility: AccessVisibility,
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateEvent {
    pub offset: u32,
    pub exported: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ExplicitTemplateEvent {
    pub offset: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateParameterListEvent {
    pub offset: u32,
}

/// A type-kind template parameter. Value parameters (`int N`) arrive
/// as ordinary declaration events inside the open parameter list.
#[derive(Debug, Clone)]
pub struct TemplateParameterEvent {
    pub offset: u32,
    pub length: u32,
    pub kind: TemplateParameterKind,
    pub name: Option<Name>,
    /// Default type-id, when written.
    pub default_value: Option<Name>,
    /// Inner parameters of a template-template parameter.
    pub template_parameters: Vec<TemplateParameterEvent>,
}

/// A leaf declaration: variable, field, function, or typedef.
///
/// `offset` is the start of the whole declaration-specifier group, so
/// the declarators of `int a, b;` arrive as two events sharing one
/// offset. `length` runs from that offset through this declarator's
/// last token and through the semicolon for the final event of the
/// group.
#[derive(Debug, Clone)]
pub struct DeclarationEvent {
    pub offset: u32,
    pub length: u32,
    pub specifier: DeclSpecifier,
    pub declarator: Option<DeclaratorDescription>,
}

/// Recursive description of one declarator.
#[derive(Debug, Clone)]
pub struct DeclaratorDescription {
    pub offset: u32,
    pub length: u32,
    pub name: Option<Name>,
    /// Nested declarator for pointer-to-function shapes.
    pub inner: Option<Box<DeclaratorDescription>>,
    pub pointer_operators: Vec<PointerOperator>,
    pub array_qualifiers: Vec<ArrayQualifier>,
    pub bit_field: Option<BitField>,
    pub parameters: Option<ParameterClauseDescription>,
    pub kr_parameters: Option<ParameterClauseDescription>,
    pub exception_specifier: Option<ExceptionSpecifier>,
    pub constructor_chain: Option<ConstructorChain>,
    pub initializer: Option<Expression>,
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_pure_virtual: bool,
}

impl DeclaratorDescription {
    /// A bare named declarator with no decorations.
    pub fn named(offset: u32, length: u32, name: Name) -> Self {
        Self {
            offset,
            length,
            name: Some(name),
            inner: None,
            pointer_operators: Vec::new(),
            array_qualifiers: Vec::new(),
            bit_field: None,
            parameters: None,
            kr_parameters: None,
            exception_specifier: None,
            constructor_chain: None,
            initializer: None,
            is_const: false,
            is_volatile: false,
            is_pure_virtual: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParameterClauseDescription {
    pub offset: u32,
    pub length: u32,
    pub parameters: Vec<ParameterDescription>,
}

#[derive(Debug, Clone)]
pub struct ParameterDescription {
    pub offset: u32,
    pub length: u32,
    pub specifier: DeclSpecifier,
    pub declarator: Option<DeclaratorDescription>,
}

/// An enumeration definition with its enumerators, delivered as one
/// leaf event.
#[derive(Debug, Clone)]
pub struct EnumerationEvent {
    pub offset: u32,
    pub length: u32,
    pub name: Option<Name>,
    /// Specifier flags of the wrapping declaration.
    pub specifier: DeclSpecifier,
    pub enumerators: Vec<EnumeratorDescription>,
}

#[derive(Debug, Clone)]
pub struct EnumeratorDescription {
    pub offset: u32,
    pub length: u32,
    pub name: Name,
    pub value: Option<Expression>,
}

/// A forward declaration or elaborated-type use, e.g. `class A;` or
/// `struct S s;`.
#[derive(Debug, Clone)]
pub struct ElaboratedTypeEvent {
    pub offset: u32,
    pub length: u32,
    pub key: ClassKey,
    pub name: Name,
    pub specifier: DeclSpecifier,
    pub declarator: Option<DeclaratorDescription>,
}

#[derive(Debug, Clone)]
pub struct UsingDirectiveEvent {
    pub offset: u32,
    pub length: u32,
    pub namespace_name: Name,
}

#[derive(Debug, Clone)]
pub struct UsingDeclarationEvent {
    pub offset: u32,
    pub length: u32,
    pub name: Name,
    pub is_typename: bool,
}

#[derive(Debug, Clone)]
pub struct AsmEvent {
    pub offset: u32,
    pub length: u32,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct MacroEvent {
    pub offset: u32,
    pub length: u32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct InclusionEvent {
    pub offset: u32,
    pub length: u32,
    pub name: String,
    pub is_system: bool,
}

/// A problem the parser recovered from.
#[derive(Debug, Clone)]
pub struct ProblemEvent {
    pub offset: u32,
    pub length: u32,
    pub message: String,
}

/// A use of an already-declared entity.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceEvent {
    pub offset: u32,
    pub name: Name,
}

/// The parser-event boundary. The parser calls these in strict source
/// order; a sink builds whatever it wants from them.
pub trait SourceElementSink {
    fn enter_compilation_unit(&mut self, event: CompilationUnitEvent);
    fn exit_compilation_unit(&mut self, close: ScopeClose);

    fn enter_namespace(&mut self, event: NamespaceEvent);
    fn exit_namespace(&mut self, close: ScopeClose);

    fn enter_linkage_specification(&mut self, event: LinkageEvent);
    fn exit_linkage_specification(&mut self, close: ScopeClose);

    fn enter_class_specifier(&mut self, event: ClassEvent);
    fn accept_base_specifier(&mut self, event: BaseSpecifierEvent);
    fn accept_access_visibility(&mut self, event: VisibilityEvent);
    fn exit_class_specifier(&mut self, close: ScopeClose);

    fn enter_template_declaration(&mut self, event: TemplateEvent);
    fn exit_template_declaration(&mut self, close: ScopeClose);
    fn enter_template_specialization(&mut self, event: ExplicitTemplateEvent);
    fn exit_template_specialization(&mut self, close: ScopeClose);
    fn enter_template_instantiation(&mut self, event: ExplicitTemplateEvent);
    fn exit_template_instantiation(&mut self, close: ScopeClose);
    fn enter_template_parameter_list(&mut self, event: TemplateParameterListEvent);
    fn accept_template_parameter(&mut self, event: TemplateParameterEvent);
    fn exit_template_parameter_list(&mut self, close: ScopeClose);

    fn accept_variable(&mut self, event: DeclarationEvent);
    fn accept_field(&mut self, event: DeclarationEvent);
    fn accept_function_declaration(&mut self, event: DeclarationEvent);
    fn accept_function_definition(&mut self, event: DeclarationEvent);
    fn accept_typedef(&mut self, event: DeclarationEvent);
    fn accept_enumeration(&mut self, event: EnumerationEvent);
    fn accept_elaborated_type(&mut self, event: ElaboratedTypeEvent);

    fn accept_using_directive(&mut self, event: UsingDirectiveEvent);
    fn accept_using_declaration(&mut self, event: UsingDeclarationEvent);
    fn accept_asm_definition(&mut self, event: AsmEvent);
    fn accept_macro(&mut self, event: MacroEvent);
    fn accept_inclusion(&mut self, event: InclusionEvent);

    fn accept_problem(&mut self, event: ProblemEvent);

    // Reference events, reserved for a symbol-resolution layer.
    fn accept_class_reference(&mut self, event: ReferenceEvent) {
        let _ = event;
    }
    fn accept_namespace_reference(&mut self, event: ReferenceEvent) {
        let _ = event;
    }
    fn accept_enumeration_reference(&mut self, event: ReferenceEvent) {
        let _ = event;
    }
    fn accept_enumerator_reference(&mut self, event: ReferenceEvent) {
        let _ = event;
    }
    fn accept_variable_reference(&mut self, event: ReferenceEvent) {
        let _ = event;
    }
    fn accept_function_reference(&mut self, event: ReferenceEvent) {
        let _ = event;
    }
    fn accept_field_reference(&mut self, event: ReferenceEvent) {
        let _ = event;
    }
    fn accept_typedef_reference(&mut self, event: ReferenceEvent) {
        let _ = event;
    }
}
