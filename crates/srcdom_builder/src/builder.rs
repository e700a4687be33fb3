//! The DOM builder: realizes parser events as nodes.
//!
//! Leaf accepts attach a fully-formed node to the current scope; enter
//! events attach and push; exit events pop and finalize length as
//! `close.offset + close.length - start`. Declaration events sharing a
//! starting offset fold into one `SimpleDeclaration` with several
//! declarators, which is how `int a, b;` and `class A { } a;` come out
//! with the right shape.

use crate::events::*;
use crate::scope::ScopeStack;
use srcdom_ast::nodes::*;
use srcdom_ast::types::*;
use srcdom_core::text::{LineMap, TextSpan};
use srcdom_core::token::TokenBuf;
use srcdom_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use thiserror::Error;

/// Offset-to-line capability supplied by the tokenizer. Lines are
/// 1-based.
pub trait LineLookup {
    fn line_at(&self, offset: u32) -> Option<u32>;
}

impl LineLookup for LineMap {
    fn line_at(&self, offset: u32) -> Option<u32> {
        self.line_of(offset).map(|line| line + 1)
    }
}

/// Construction ended without a complete, balanced tree.
#[derive(Debug, Error)]
pub enum IncompleteDomError {
    #[error("construction ended with {open} scopes still open")]
    UnbalancedScopes { open: usize },
    #[error("no compilation unit was entered")]
    MissingRoot,
}

/// The finished, logically immutable result of one construction.
pub struct SourceDom {
    pub dom: Dom,
    pub root: NodeId,
    pub tokens: TokenBuf,
    pub diagnostics: DiagnosticCollection,
}

/// Builds a source DOM from parser events.
pub struct DomBuilder {
    dom: Dom,
    tokens: TokenBuf,
    scopes: ScopeStack,
    root: Option<NodeId>,
    diagnostics: DiagnosticCollection,
    lines: Option<Box<dyn LineLookup>>,
}

impl DomBuilder {
    pub fn new() -> Self {
        Self {
            dom: Dom::new(),
            tokens: TokenBuf::new(),
            scopes: ScopeStack::new(),
            root: None,
            diagnostics: DiagnosticCollection::new(),
            lines: None,
        }
    }

    /// A builder that additionally decorates every node with 1-based
    /// first/last line numbers.
    pub fn with_line_lookup(lines: Box<dyn LineLookup>) -> Self {
        let mut builder = Self::new();
        builder.lines = Some(lines);
        builder
    }

    /// The token buffer the parser records captured tokens into.
    pub fn tokens_mut(&mut self) -> &mut TokenBuf {
        &mut self.tokens
    }

    pub fn tokens(&self) -> &TokenBuf {
        &self.tokens
    }

    /// The tree as built so far.
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Hand off the finished tree. Fails if the event stream stopped
    /// with scopes still open or never started.
    pub fn finish(self) -> Result<SourceDom, IncompleteDomError> {
        if !self.scopes.is_empty() {
            return Err(IncompleteDomError::UnbalancedScopes {
                open: self.scopes.depth(),
            });
        }
        let root = self.root.ok_or(IncompleteDomError::MissingRoot)?;
        Ok(SourceDom {
            dom: self.dom,
            root,
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn root_scope(&self) -> NodeId {
        match self.root {
            Some(root) => root,
            None => panic!("event arrived before the compilation unit was entered"),
        }
    }

    /// Resolve a line, reporting a diagnostic when the lookup cannot
    /// map the offset. `None` when no lookup is configured.
    fn line_at(&mut self, offset: u32) -> Option<u32> {
        let result = match &self.lines {
            Some(lookup) => lookup.line_at(offset),
            None => return None,
        };
        if result.is_none() {
            self.diagnostics.add(Diagnostic::with_span(
                TextSpan::new(offset, 0),
                &messages::OFFSET_HAS_NO_LINE,
                &[&offset.to_string()],
            ));
        }
        result
    }

    fn decorate_open(&mut self, id: NodeId) {
        let start = self.dom.data(id).start;
        if let Some(line) = self.line_at(start) {
            self.dom.data_mut(id).first_line = Some(line);
        }
    }

    fn decorate_close(&mut self, id: NodeId, last_offset: u32) {
        if let Some(line) = self.line_at(last_offset) {
            self.dom.data_mut(id).last_line = Some(line);
        }
    }

    /// Line decoration for a leaf node whose length is already known.
    fn decorate_leaf(&mut self, id: NodeId) {
        self.decorate_open(id);
        let data = self.dom.data(id);
        let last = match data.length() {
            Some(len) if len > 0 => data.start + len - 1,
            _ => data.start,
        };
        self.decorate_close(id, last);
    }

    /// Attach a declaration to the current scope, stamping member
    /// visibility when the scope is an open class body.
    fn attach(&mut self, decl: NodeId) {
        let scope = self.scopes.current();
        let visibility = match self.dom.node(scope) {
            Node::Class(class) => Some(class.visibility),
            _ => None,
        };
        if let Some(visibility) = visibility {
            if let Node::SimpleDeclaration(n) = self.dom.node_mut(decl) {
                n.access = Some(visibility);
            }
        }
        self.dom.add_declaration(scope, decl);
    }

    /// Pop the current scope and finalize its length from the close
    /// event.
    fn finalize(&mut self, id: NodeId, close: ScopeClose) {
        let start = self.dom.data(id).start;
        self.dom.data_mut(id).set_length(close.end() - start);
        self.decorate_close(id, close.offset);
    }

    /// Find an already-open declaration group in the current scope:
    /// the first `SimpleDeclaration` starting at exactly `offset`.
    fn find_group(&self, offset: u32) -> Option<NodeId> {
        let scope = self.scopes.current();
        self.dom
            .declarations(scope)
            .iter()
            .copied()
            .find(|&id| match self.dom.node(id) {
                Node::SimpleDeclaration(n) => n.data.start == offset,
                _ => false,
            })
    }

    fn realize_declarator(&mut self, desc: &DeclaratorDescription) -> NodeId {
        let inner = desc
            .inner
            .as_deref()
            .map(|nested| self.realize_declarator(nested));
        let parameters = desc
            .parameters
            .as_ref()
            .map(|clause| self.realize_clause(clause, false));
        let kr_parameters = desc
            .kr_parameters
            .as_ref()
            .map(|clause| self.realize_clause(clause, true));

        let mut data = NodeData::new(desc.offset);
        data.set_length(desc.length);
        let id = self.dom.alloc(Node::Declarator(Declarator {
            data,
            name: desc.name,
            inner,
            pointer_operators: desc.pointer_operators.clone(),
            array_qualifiers: desc.array_qualifiers.clone(),
            bit_field: desc.bit_field.clone(),
            parameters,
            kr_parameters,
            exception_specifier: desc.exception_specifier.clone(),
            constructor_chain: desc.constructor_chain.clone(),
            initializer: desc.initializer.clone(),
            is_const: desc.is_const,
            is_volatile: desc.is_volatile,
            is_pure_virtual: desc.is_pure_virtual,
        }));
        self.decorate_leaf(id);
        id
    }

    fn realize_parameter(&mut self, desc: &ParameterDescription) -> NodeId {
        let declarators = match &desc.declarator {
            Some(declarator) => vec![self.realize_declarator(declarator)],
            None => Vec::new(),
        };
        let mut data = NodeData::new(desc.offset);
        data.set_length(desc.length);
        let id = self.dom.alloc(Node::Parameter(ParameterDeclaration {
            data,
            specifier: desc.specifier.clone(),
            declarators,
        }));
        self.decorate_leaf(id);
        id
    }

    fn realize_clause(&mut self, desc: &ParameterClauseDescription, old_kr: bool) -> NodeId {
        let parameters: Vec<NodeId> = desc
            .parameters
            .iter()
            .map(|parameter| self.realize_parameter(parameter))
            .collect();
        let mut data = NodeData::new(desc.offset);
        data.set_length(desc.length);
        let id = if old_kr {
            self.dom
                .alloc(Node::KRParameterClause(OldKRParameterDeclarationClause {
                    data,
                    declarations: parameters,
                }))
        } else {
            self.dom
                .alloc(Node::ParameterClause(ParameterDeclarationClause {
                    data,
                    declarations: parameters,
                }))
        };
        self.decorate_leaf(id);
        id
    }

    fn realize_template_parameter(&mut self, event: &TemplateParameterEvent) -> NodeId {
        let parameter_list = if event.template_parameters.is_empty() {
            None
        } else {
            let list = self
                .dom
                .alloc(Node::TemplateParameterList(TemplateParameterList {
                    data: NodeData::new(event.offset),
                    parameters: Vec::new(),
                }));
            for nested in &event.template_parameters {
                let id = self.realize_template_parameter(nested);
                self.dom.add_declaration(list, id);
            }
            self.dom.data_mut(list).set_length(event.length);
            Some(list)
        };
        let mut data = NodeData::new(event.offset);
        data.set_length(event.length);
        let id = self.dom.alloc(Node::TemplateParameter(TemplateParameter {
            data,
            kind: event.kind,
            name: event.name,
            default_value: event.default_value,
            parameter_list,
        }));
        self.decorate_leaf(id);
        id
    }

    /// Common path for variable/field/function/elaborated leaf events.
    fn accept_declaration(&mut self, event: DeclarationEvent, is_definition: bool) {
        let scope = self.scopes.current();

        // Inside an open template parameter list a declaration event is
        // a value-typed template parameter (`int N`).
        if matches!(self.dom.node(scope), Node::TemplateParameterList(_)) {
            let declarators = match &event.declarator {
                Some(declarator) => vec![self.realize_declarator(declarator)],
                None => Vec::new(),
            };
            let mut data = NodeData::new(event.offset);
            data.set_length(event.length);
            let id = self.dom.alloc(Node::Parameter(ParameterDeclaration {
                data,
                specifier: event.specifier,
                declarators,
            }));
            self.decorate_leaf(id);
            self.dom.add_declaration(scope, id);
            return;
        }

        if let Some(existing) = self.find_group(event.offset) {
            if let Some(desc) = &event.declarator {
                let declarator = self.realize_declarator(desc);
                self.dom
                    .simple_declaration_mut(existing)
                    .declarators
                    .push(declarator);
            }
            let decl = self.dom.simple_declaration_mut(existing);
            if is_definition {
                decl.is_function_definition = true;
            }
            // The last declarator of the group carries the final length.
            decl.data.set_length(event.length);
            self.decorate_leaf(existing);
            return;
        }

        let declarators = match &event.declarator {
            Some(declarator) => vec![self.realize_declarator(declarator)],
            None => Vec::new(),
        };
        let mut data = NodeData::new(event.offset);
        data.set_length(event.length);
        let id = self.dom.alloc(Node::SimpleDeclaration(SimpleDeclaration {
            data,
            specifier: event.specifier,
            declarators,
            type_specifier: None,
            access: None,
            is_function_definition: is_definition,
        }));
        self.decorate_leaf(id);
        self.attach(id);
    }
}

impl Default for DomBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceElementSink for DomBuilder {
    fn enter_compilation_unit(&mut self, event: CompilationUnitEvent) {
        assert!(
            self.root.is_none(),
            "compilation unit entered twice"
        );
        let id = self.dom.alloc(Node::TranslationUnit(TranslationUnit {
            data: NodeData::new(event.offset),
            declarations: Vec::new(),
            macros: Vec::new(),
            inclusions: Vec::new(),
        }));
        self.decorate_open(id);
        self.root = Some(id);
        self.scopes.push(id);
    }

    fn exit_compilation_unit(&mut self, close: ScopeClose) {
        let id = self.scopes.pop();
        assert!(
            matches!(self.dom.node(id), Node::TranslationUnit(_)),
            "exit_compilation_unit does not match the open scope"
        );
        assert!(
            self.scopes.is_empty(),
            "compilation unit closed while nested scopes remain open"
        );
        self.finalize(id, close);
    }

    fn enter_namespace(&mut self, event: NamespaceEvent) {
        let id = self.dom.alloc(Node::Namespace(NamespaceDefinition {
            data: NodeData::new(event.offset),
            name: event.name,
            declarations: Vec::new(),
        }));
        self.decorate_open(id);
        self.attach(id);
        self.scopes.push(id);
    }

    fn exit_namespace(&mut self, close: ScopeClose) {
        let id = self.scopes.pop();
        assert!(
            matches!(self.dom.node(id), Node::Namespace(_)),
            "exit_namespace does not match the open scope"
        );
        self.finalize(id, close);
    }

    fn enter_linkage_specification(&mut self, event: LinkageEvent) {
        let id = self.dom.alloc(Node::Linkage(LinkageSpecification {
            data: NodeData::new(event.offset),
            language: event.language,
            declarations: Vec::new(),
        }));
        self.decorate_open(id);
        self.attach(id);
        self.scopes.push(id);
    }

    fn exit_linkage_specification(&mut self, close: ScopeClose) {
        let id = self.scopes.pop();
        assert!(
            matches!(self.dom.node(id), Node::Linkage(_)),
            "exit_linkage_specification does not match the open scope"
        );
        self.finalize(id, close);
    }

    fn enter_class_specifier(&mut self, event: ClassEvent) {
        // The class rides inside a wrapping declaration that is opened
        // here and may later collect declarators (`class A { } a;`).
        let owner = self.dom.alloc(Node::SimpleDeclaration(SimpleDeclaration {
            data: NodeData::new(event.offset),
            specifier: event.specifier,
            declarators: Vec::new(),
            type_specifier: None,
            access: None,
            is_function_definition: false,
        }));
        self.decorate_open(owner);
        self.attach(owner);

        let class = self.dom.alloc(Node::Class(ClassSpecifier {
            data: NodeData::new(event.offset),
            key: event.key,
            name: event.name,
            base_specifiers: Vec::new(),
            declarations: Vec::new(),
            visibility: event.key.default_visibility(),
            owner_declaration: owner,
        }));
        self.decorate_open(class);
        self.dom.simple_declaration_mut(owner).type_specifier = Some(class);
        self.scopes.push(class);
    }

    fn accept_base_specifier(&mut self, event: BaseSpecifierEvent) {
        let scope = self.scopes.current();
        let class = self.dom.class_specifier_mut(scope);
        // Absent access falls back to the class-key default, so a
        // bare base of a `class` is private and of a `struct` public.
        let access = event
            .access
            .unwrap_or_else(|| class.key.default_visibility());
        class.base_specifiers.push(BaseSpecifier {
            name: event.name,
            is_virtual: event.is_virtual,
            access,
        });
    }

    fn accept_access_visibility(&mut self, event: VisibilityEvent) {
        let scope = self.scopes.current();
        self.dom.class_specifier_mut(scope).visibility = event.visibility;
    }

    fn exit_class_specifier(&mut self, close: ScopeClose) {
        let id = self.scopes.pop();
        let owner = match self.dom.node(id) {
            Node::Class(class) => class.owner_declaration,
            _ => panic!("exit_class_specifier does not match the open scope"),
        };
        self.finalize(id, close);
        // Provisional close of the wrapping declaration; a following
        // declarator event at the same offset extends it through the
        // semicolon.
        let owner_start = self.dom.data(owner).start;
        self.dom.data_mut(owner).set_length(close.end() - owner_start);
        self.decorate_close(owner, close.offset);
    }

    fn enter_template_declaration(&mut self, event: TemplateEvent) {
        let id = self.dom.alloc(Node::TemplateDeclaration(TemplateDeclaration {
            data: NodeData::new(event.offset),
            exported: event.exported,
            parameter_list: None,
            declarations: Vec::new(),
        }));
        self.decorate_open(id);
        self.attach(id);
        self.scopes.push(id);
    }

    fn exit_template_declaration(&mut self, close: ScopeClose) {
        let id = self.scopes.pop();
        assert!(
            matches!(self.dom.node(id), Node::TemplateDeclaration(_)),
            "exit_template_declaration does not match the open scope"
        );
        let start = self.dom.data(id).start;
        self.dom.data_mut(id).set_length_once(close.end() - start);
        self.decorate_close(id, close.offset);
    }

    fn enter_template_specialization(&mut self, event: ExplicitTemplateEvent) {
        let id = self
            .dom
            .alloc(Node::ExplicitTemplate(ExplicitTemplateDeclaration {
                data: NodeData::new(event.offset),
                kind: ExplicitTemplateKind::Specialization,
                declarations: Vec::new(),
            }));
        self.decorate_open(id);
        self.attach(id);
        self.scopes.push(id);
    }

    fn exit_template_specialization(&mut self, close: ScopeClose) {
        let id = self.scopes.pop();
        assert!(
            matches!(
                self.dom.node(id),
                Node::ExplicitTemplate(ExplicitTemplateDeclaration {
                    kind: ExplicitTemplateKind::Specialization,
                    ..
                })
            ),
            "exit_template_specialization does not match the open scope"
        );
        self.finalize(id, close);
    }

    fn enter_template_instantiation(&mut self, event: ExplicitTemplateEvent) {
        let id = self
            .dom
            .alloc(Node::ExplicitTemplate(ExplicitTemplateDeclaration {
                data: NodeData::new(event.offset),
                kind: ExplicitTemplateKind::Instantiation,
                declarations: Vec::new(),
            }));
        self.decorate_open(id);
        self.attach(id);
        self.scopes.push(id);
    }

    fn exit_template_instantiation(&mut self, close: ScopeClose) {
        let id = self.scopes.pop();
        assert!(
            matches!(
                self.dom.node(id),
                Node::ExplicitTemplate(ExplicitTemplateDeclaration {
                    kind: ExplicitTemplateKind::Instantiation,
                    ..
                })
            ),
            "exit_template_instantiation does not match the open scope"
        );
        self.finalize(id, close);
    }

    fn enter_template_parameter_list(&mut self, event: TemplateParameterListEvent) {
        let scope = self.scopes.current();
        let id = self
            .dom
            .alloc(Node::TemplateParameterList(TemplateParameterList {
                data: NodeData::new(event.offset),
                parameters: Vec::new(),
            }));
        self.decorate_open(id);
        match self.dom.node_mut(scope) {
            Node::TemplateDeclaration(template) => template.parameter_list = Some(id),
            _ => panic!("template parameter list outside a template declaration"),
        }
        self.scopes.push(id);
    }

    fn accept_template_parameter(&mut self, event: TemplateParameterEvent) {
        let scope = self.scopes.current();
        assert!(
            matches!(self.dom.node(scope), Node::TemplateParameterList(_)),
            "template parameter outside a template parameter list"
        );
        let id = self.realize_template_parameter(&event);
        self.dom.add_declaration(scope, id);
    }

    fn exit_template_parameter_list(&mut self, close: ScopeClose) {
        let id = self.scopes.pop();
        assert!(
            matches!(self.dom.node(id), Node::TemplateParameterList(_)),
            "exit_template_parameter_list does not match the open scope"
        );
        self.finalize(id, close);
    }

    fn accept_variable(&mut self, event: DeclarationEvent) {
        self.accept_declaration(event, false);
    }

    fn accept_field(&mut self, event: DeclarationEvent) {
        self.accept_declaration(event, false);
    }

    fn accept_function_declaration(&mut self, event: DeclarationEvent) {
        self.accept_declaration(event, false);
    }

    fn accept_function_definition(&mut self, event: DeclarationEvent) {
        self.accept_declaration(event, true);
    }

    // Typedefs are reported but not modeled; the declaration already
    // reached the tree through its variable event.
    fn accept_typedef(&mut self, event: DeclarationEvent) {
        let _ = event;
    }

    fn accept_enumeration(&mut self, event: EnumerationEvent) {
        let mut data = NodeData::new(event.offset);
        data.set_length(event.length);
        let decl = self.dom.alloc(Node::SimpleDeclaration(SimpleDeclaration {
            data,
            specifier: event.specifier,
            declarators: Vec::new(),
            type_specifier: None,
            access: None,
            is_function_definition: false,
        }));

        let enumerators: Vec<NodeId> = event
            .enumerators
            .iter()
            .map(|e| {
                let mut data = NodeData::new(e.offset);
                data.set_length(e.length);
                let id = self.dom.alloc(Node::Enumerator(EnumeratorDefinition {
                    data,
                    name: e.name,
                    initial_value: e.value.clone(),
                }));
                self.decorate_leaf(id);
                id
            })
            .collect();

        let mut spec_data = NodeData::new(event.offset);
        spec_data.set_length(event.length);
        let spec = self.dom.alloc(Node::Enumeration(EnumerationSpecifier {
            data: spec_data,
            name: event.name,
            enumerators,
            owner_declaration: decl,
        }));
        self.decorate_leaf(spec);

        self.dom.simple_declaration_mut(decl).type_specifier = Some(spec);
        self.decorate_leaf(decl);
        self.attach(decl);
    }

    fn accept_elaborated_type(&mut self, event: ElaboratedTypeEvent) {
        let declarators = match &event.declarator {
            Some(declarator) => vec![self.realize_declarator(declarator)],
            None => Vec::new(),
        };
        let mut data = NodeData::new(event.offset);
        data.set_length(event.length);
        let decl = self.dom.alloc(Node::SimpleDeclaration(SimpleDeclaration {
            data,
            specifier: event.specifier,
            declarators,
            type_specifier: None,
            access: None,
            is_function_definition: false,
        }));

        let name_end = self.tokens.name_span(event.name).end();
        let mut spec_data = NodeData::new(event.offset);
        spec_data.set_length(name_end.saturating_sub(event.offset));
        let spec = self.dom.alloc(Node::ElaboratedType(ElaboratedTypeSpecifier {
            data: spec_data,
            key: event.key,
            name: event.name,
            owner_declaration: decl,
        }));
        self.decorate_leaf(spec);

        self.dom.simple_declaration_mut(decl).type_specifier = Some(spec);
        self.decorate_leaf(decl);
        self.attach(decl);
    }

    fn accept_using_directive(&mut self, event: UsingDirectiveEvent) {
        let mut data = NodeData::new(event.offset);
        data.set_length(event.length);
        let id = self.dom.alloc(Node::UsingDirective(UsingDirective {
            data,
            namespace_name: event.namespace_name,
        }));
        self.decorate_leaf(id);
        self.attach(id);
    }

    fn accept_using_declaration(&mut self, event: UsingDeclarationEvent) {
        let mut data = NodeData::new(event.offset);
        data.set_length(event.length);
        let id = self.dom.alloc(Node::UsingDeclaration(UsingDeclaration {
            data,
            name: event.name,
            is_typename: event.is_typename,
        }));
        self.decorate_leaf(id);
        self.attach(id);
    }

    fn accept_asm_definition(&mut self, event: AsmEvent) {
        let mut data = NodeData::new(event.offset);
        data.set_length(event.length);
        let id = self.dom.alloc(Node::Asm(AsmDefinition {
            data,
            body: event.body,
        }));
        self.decorate_leaf(id);
        self.attach(id);
    }

    fn accept_macro(&mut self, event: MacroEvent) {
        let root = self.root_scope();
        let mut data = NodeData::new(event.offset);
        data.set_length(event.length);
        let id = self.dom.alloc(Node::Macro(Macro {
            data,
            name: event.name,
        }));
        self.decorate_leaf(id);
        self.dom.translation_unit_mut(root).macros.push(id);
    }

    fn accept_inclusion(&mut self, event: InclusionEvent) {
        let root = self.root_scope();
        let mut data = NodeData::new(event.offset);
        data.set_length(event.length);
        let id = self.dom.alloc(Node::Inclusion(Inclusion {
            data,
            name: event.name,
            is_system: event.is_system,
        }));
        self.decorate_leaf(id);
        self.dom.translation_unit_mut(root).inclusions.push(id);
    }

    fn accept_problem(&mut self, event: ProblemEvent) {
        // Recorded for the consumer; the tree itself is untouched.
        self.diagnostics.add(Diagnostic::with_span(
            TextSpan::new(event.offset, event.length),
            &messages::SYNTAX_PROBLEM,
            &[&event.message],
        ));
    }
}
