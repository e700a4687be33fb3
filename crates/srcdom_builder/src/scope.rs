//! The scope stack tracking nesting during construction.
//!
//! Depth strictly follows enter/exit pairing: the translation unit is
//! pushed first and popped only by the compilation unit's exit event.
//! Underflow means the driving parser broke the pairing contract, and
//! the stack panics rather than guessing.

use srcdom_ast::nodes::NodeId;

#[derive(Debug, Default)]
pub struct ScopeStack {
    stack: Vec<NodeId>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, scope: NodeId) {
        self.stack.push(scope);
    }

    /// Pop the current scope. Panics if the stack is empty.
    pub fn pop(&mut self) -> NodeId {
        match self.stack.pop() {
            Some(scope) => scope,
            None => panic!("scope stack underflow: exit event with no matching enter"),
        }
    }

    /// The current attachment point. Panics if no scope is open.
    pub fn current(&self) -> NodeId {
        match self.stack.last() {
            Some(scope) => *scope,
            None => panic!("no open scope: event arrived before the compilation unit was entered"),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
