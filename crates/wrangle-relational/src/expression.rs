//! Compiled expressions and the factories that produce them.

use std::fmt;

use polars::prelude::{Expr, PlSmallStr, lit};

use crate::error::ExpressionError;

/// A scalar computation over relation columns, compiled for polars.
#[derive(Clone)]
pub struct Expression {
    source: String,
    expr: Expr,
}

impl Expression {
    pub fn new(source: impl Into<String>, expr: Expr) -> Self {
        Self {
            source: source.into(),
            expr,
        }
    }

    /// The text this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The engine expression.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Compiles textual expressions into engine [`Expression`]s.
///
/// Resolved from a [`RelationalContext`](crate::RelationalContext); engines
/// without one cannot take pushdown.
pub trait ExpressionFactory: Send + Sync {
    /// Name of the expression dialect accepted by [`ExpressionFactory::compile`].
    fn dialect(&self) -> &'static str;

    /// Compile `source` into an expression.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is empty or not understood by the dialect.
    fn compile(&self, source: &str) -> Result<Expression, ExpressionError>;

    /// Compile a reference to the column `name`, whatever characters it holds.
    fn column(&self, name: &str) -> Result<Expression, ExpressionError> {
        self.compile(&quote_identifier(name))
    }
}

/// Quote a column name as a SQL-style delimited identifier.
///
/// ```
/// use wrangle_relational::quote_identifier;
///
/// assert_eq!(quote_identifier("first name"), "\"first name\"");
/// assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Reference to the column named exactly `name`.
///
/// Unlike polars' `col`, a `*` or `^...$` name is never read as a selector.
pub fn column_ref(name: &str) -> Expr {
    Expr::Column(PlSmallStr::from(name))
}

/// SQL-flavoured factory for single-term expressions.
///
/// Accepts bare identifiers, `"delimited identifiers"`, `'text'` literals and
/// numeric literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnExpressionFactory;

impl ExpressionFactory for ColumnExpressionFactory {
    fn dialect(&self) -> &'static str {
        "sql-column"
    }

    fn compile(&self, source: &str) -> Result<Expression, ExpressionError> {
        let text = source.trim();
        if text.is_empty() {
            return Err(ExpressionError::Empty);
        }

        if let Some(quoted) = text.strip_prefix('"') {
            let name = unquote(quoted, '"').ok_or_else(|| {
                ExpressionError::UnterminatedQuote(text.to_string())
            })?;
            return Ok(Expression::new(source, column_ref(&name)));
        }

        if let Some(quoted) = text.strip_prefix('\'') {
            let value = unquote(quoted, '\'').ok_or_else(|| {
                ExpressionError::UnterminatedQuote(text.to_string())
            })?;
            return Ok(Expression::new(source, lit(value)));
        }

        if let Ok(value) = text.parse::<i64>() {
            return Ok(Expression::new(source, lit(value)));
        }
        if let Ok(value) = text.parse::<f64>() {
            return Ok(Expression::new(source, lit(value)));
        }

        if is_bare_identifier(text) {
            return Ok(Expression::new(source, column_ref(text)));
        }

        Err(ExpressionError::Unsupported(text.to_string()))
    }
}

/// Strip the closing quote from `rest`, collapsing doubled quotes.
///
/// Returns `None` when the quote is unterminated or followed by more text.
fn unquote(rest: &str, quote: char) -> Option<String> {
    let mut out = String::with_capacity(rest.len());
    let mut chars = rest.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == quote {
            if chars.peek() == Some(&quote) {
                chars.next();
                out.push(quote);
                continue;
            }
            return chars.next().is_none().then_some(out);
        }
        out.push(ch);
    }
    None
}

fn is_bare_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_alphanumeric() || ch == '_')
}
