use super::order::Order;

/// The output of a single emitter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFragment {
    /// Value code spliced into the parent's slot.
    Expression { code: String, order: Order },
    /// Newline terminated statement text concatenated into the enclosing body.
    Statement(String),
}

impl CodeFragment {
    pub fn expression(code: impl Into<String>, order: Order) -> Self {
        CodeFragment::Expression {
            code: code.into(),
            order,
        }
    }

    pub fn statement(code: impl Into<String>) -> Self {
        CodeFragment::Statement(code.into())
    }

    pub fn code(&self) -> &str {
        match self {
            CodeFragment::Expression { code, .. } | CodeFragment::Statement(code) => code,
        }
    }
}
