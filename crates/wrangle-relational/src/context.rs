//! Relational transform context.

use std::fmt;
use std::sync::Arc;

use crate::expression::ExpressionFactory;

/// What the active engine offers to directives that compile themselves.
///
/// An engine that cannot take pushdown provides a context without an
/// expression factory.
#[derive(Clone, Default)]
pub struct RelationalContext {
    expression_factory: Option<Arc<dyn ExpressionFactory>>,
}

impl RelationalContext {
    /// Context without an expression factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expression factory.
    #[must_use]
    pub fn with_expression_factory(mut self, factory: Arc<dyn ExpressionFactory>) -> Self {
        self.expression_factory = Some(factory);
        self
    }

    /// The expression factory, if the engine provides one.
    pub fn expression_factory(&self) -> Option<&dyn ExpressionFactory> {
        self.expression_factory.as_deref()
    }

    /// True when directives can be folded into relations.
    pub fn supports_pushdown(&self) -> bool {
        self.expression_factory.is_some()
    }
}

impl fmt::Debug for RelationalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationalContext")
            .field(
                "expression_factory",
                &self.expression_factory.as_ref().map(|factory| factory.dialect()),
            )
            .finish()
    }
}
