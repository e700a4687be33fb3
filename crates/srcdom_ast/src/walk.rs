//! Depth-first iteration over offset-carrying DOM elements.
//!
//! Clients that map editor positions back to elements want to touch
//! every node that knows where it lives, including declarators and
//! clause nodes nested inside declarations.

use crate::nodes::{Dom, Node, NodeId};

/// Pre-order depth-first iterator over all nodes reachable from a
/// root, children in source order.
pub struct OffsetableNodes<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl<'a> OffsetableNodes<'a> {
    pub fn new(dom: &'a Dom, root: NodeId) -> Self {
        Self {
            dom,
            stack: vec![root],
        }
    }
}

impl<'a> Iterator for OffsetableNodes<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Children pushed in reverse so the leftmost pops first.
        let mut children = Vec::new();
        collect_children(self.dom, id, &mut children);
        for child in children.into_iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

impl Dom {
    /// Walk every offset-carrying element under `root`, pre-order.
    pub fn iter_offsetable(&self, root: NodeId) -> OffsetableNodes<'_> {
        OffsetableNodes::new(self, root)
    }
}

fn collect_children(dom: &Dom, id: NodeId, out: &mut Vec<NodeId>) {
    match dom.node(id) {
        Node::TranslationUnit(n) => {
            out.extend_from_slice(&n.inclusions);
            out.extend_from_slice(&n.macros);
            out.extend_from_slice(&n.declarations);
        }
        Node::Namespace(n) => out.extend_from_slice(&n.declarations),
        Node::Linkage(n) => out.extend_from_slice(&n.declarations),
        Node::TemplateDeclaration(n) => {
            if let Some(list) = n.parameter_list {
                out.push(list);
            }
            out.extend_from_slice(&n.declarations);
        }
        Node::ExplicitTemplate(n) => out.extend_from_slice(&n.declarations),
        Node::TemplateParameterList(n) => out.extend_from_slice(&n.parameters),
        Node::TemplateParameter(n) => {
            if let Some(list) = n.parameter_list {
                out.push(list);
            }
        }
        Node::SimpleDeclaration(n) => {
            if let Some(spec) = n.type_specifier {
                out.push(spec);
            }
            out.extend_from_slice(&n.declarators);
        }
        Node::Parameter(n) => out.extend_from_slice(&n.declarators),
        Node::Declarator(n) => {
            if let Some(inner) = n.inner {
                out.push(inner);
            }
            if let Some(params) = n.parameters {
                out.push(params);
            }
            if let Some(params) = n.kr_parameters {
                out.push(params);
            }
        }
        Node::ParameterClause(n) => out.extend_from_slice(&n.declarations),
        Node::KRParameterClause(n) => out.extend_from_slice(&n.declarations),
        Node::Class(n) => out.extend_from_slice(&n.declarations),
        Node::Enumeration(n) => out.extend_from_slice(&n.enumerators),
        Node::ElaboratedType(_)
        | Node::Enumerator(_)
        | Node::UsingDirective(_)
        | Node::UsingDeclaration(_)
        | Node::Asm(_)
        | Node::Macro(_)
        | Node::Inclusion(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::*;
    use crate::types::*;

    fn tu(dom: &mut Dom) -> NodeId {
        dom.alloc(Node::TranslationUnit(TranslationUnit {
            data: NodeData::new(0),
            declarations: Vec::new(),
            macros: Vec::new(),
            inclusions: Vec::new(),
        }))
    }

    fn decl(dom: &mut Dom, start: u32) -> NodeId {
        dom.alloc(Node::SimpleDeclaration(SimpleDeclaration {
            data: NodeData::new(start),
            specifier: DeclSpecifier::default(),
            declarators: Vec::new(),
            type_specifier: None,
            access: None,
            is_function_definition: false,
        }))
    }

    #[test]
    fn test_walk_preorder_source_order() {
        let mut dom = Dom::new();
        let root = tu(&mut dom);
        let a = decl(&mut dom, 0);
        let b = decl(&mut dom, 10);
        let d = dom.alloc(Node::Declarator(Declarator {
            data: NodeData::new(4),
            name: None,
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
        }));
        dom.simple_declaration_mut(a).declarators.push(d);
        dom.add_declaration(root, a);
        dom.add_declaration(root, b);

        let order: Vec<NodeId> = dom.iter_offsetable(root).collect();
        assert_eq!(order, vec![root, a, d, b]);
    }

    #[test]
    fn test_walk_visits_every_node_once() {
        let mut dom = Dom::new();
        let root = tu(&mut dom);
        for i in 0..5 {
            let d = decl(&mut dom, i * 8);
            dom.add_declaration(root, d);
        }
        assert_eq!(dom.iter_offsetable(root).count(), dom.len());
    }
}
