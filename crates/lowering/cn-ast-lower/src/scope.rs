//! Enclosing-context value threaded through dispatch

use cn_span::NodeId;

/// The already-constructed nodes enclosing the production being dispatched
///
/// Passed by value down the recursion; each level narrows or extends it.
#[derive(Copy, Clone, Debug, Default)]
pub struct Scope {
    /// Enclosing source unit
    pub unit: Option<NodeId>,
    /// Enclosing contract, none for unit-level declarations
    pub contract: Option<NodeId>,
    /// Enclosing function
    pub function: Option<NodeId>,
    /// Enclosing statement body
    pub body: Option<NodeId>,
    /// Variable this expression initializes, if any
    pub declared_variable: Option<NodeId>,
    /// Parent expression node
    pub parent_expression: Option<NodeId>,
}

impl Scope {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parent for a new node's span: the declared variable, else the parent
    /// expression, else the statement body, else the nearest declaration.
    /// Only the root source unit ends up with no parent.
    pub fn span_parent(&self) -> Option<NodeId> {
        self.declared_variable
            .or(self.parent_expression)
            .or(self.body)
            .or(self.function)
            .or(self.contract)
            .or(self.unit)
    }

    pub fn inside_contract(mut self, contract: NodeId) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn inside_function(mut self, function: NodeId) -> Self {
        self.function = Some(function);
        self
    }

    pub fn inside_body(mut self, body: NodeId) -> Self {
        self.body = Some(body);
        // A new statement body resets expression-level context.
        self.declared_variable = None;
        self.parent_expression = None;
        self
    }

    pub fn initializing(mut self, variable: NodeId) -> Self {
        self.declared_variable = Some(variable);
        self
    }

    pub fn inside_expression(mut self, expression: NodeId) -> Self {
        self.parent_expression = Some(expression);
        self.declared_variable = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cn_span::NodeId;

    #[test]
    fn span_parent_prefers_declared_variable() {
        let scope = Scope {
            unit: Some(NodeId(0)),
            contract: Some(NodeId(1)),
            function: Some(NodeId(2)),
            body: Some(NodeId(3)),
            declared_variable: Some(NodeId(4)),
            parent_expression: Some(NodeId(5)),
        };
        assert_eq!(scope.span_parent(), Some(NodeId(4)));
    }

    #[test]
    fn span_parent_falls_back_expression_then_body() {
        let mut scope = Scope::root();
        scope.body = Some(NodeId(3));
        scope.parent_expression = Some(NodeId(5));
        assert_eq!(scope.span_parent(), Some(NodeId(5)));

        scope.parent_expression = None;
        assert_eq!(scope.span_parent(), Some(NodeId(3)));
    }

    #[test]
    fn entering_expression_clears_declared_variable() {
        let scope = Scope::root()
            .initializing(NodeId(9))
            .inside_expression(NodeId(10));
        assert_eq!(scope.span_parent(), Some(NodeId(10)));
    }
}
