/// Operator precedence of a generated Python expression, tightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Atomic,
    Collection,
    Member,
    FunctionCall,
    Await,
    Exponentiation,
    UnarySign,
    Multiplicative,
    Additive,
    Relational,
    LogicalNot,
    LogicalAnd,
    LogicalOr,
    Conditional,
    Lambda,
    None,
}

/// `(outer, inner)` pairs of the same class that chain without parentheses.
const OVERRIDES: &[(Order, Order)] = &[
    (Order::FunctionCall, Order::Member),
    (Order::FunctionCall, Order::FunctionCall),
    (Order::Member, Order::Member),
    (Order::Member, Order::FunctionCall),
    (Order::LogicalNot, Order::LogicalNot),
    (Order::Multiplicative, Order::Multiplicative),
    (Order::Additive, Order::Additive),
    (Order::LogicalAnd, Order::LogicalAnd),
    (Order::LogicalOr, Order::LogicalOr),
];

impl Order {
    /// Precedence class. Lower binds tighter.
    pub fn class(self) -> u8 {
        match self {
            Order::Atomic => 0,
            Order::Collection => 1,
            Order::Member | Order::FunctionCall => 2,
            Order::Await => 3,
            Order::Exponentiation => 4,
            Order::UnarySign => 5,
            Order::Multiplicative => 6,
            Order::Additive => 7,
            Order::Relational => 8,
            Order::LogicalNot => 9,
            Order::LogicalAnd => 10,
            Order::LogicalOr => 11,
            Order::Conditional => 12,
            Order::Lambda => 13,
            Order::None => 99,
        }
    }

    /// Whether an expression of order `inner` must be parenthesised when
    /// spliced into a slot that requires `outer`.
    pub fn needs_parens(inner: Order, outer: Order) -> bool {
        let (inner_class, outer_class) = (inner.class(), outer.class());
        if outer_class > inner_class {
            return false;
        }
        if outer_class == inner_class && (outer_class == 0 || outer_class == 99) {
            return false;
        }
        !OVERRIDES.contains(&(outer, inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn await_needs_parens_under_member_access() {
        assert!(Order::needs_parens(Order::Await, Order::Member));
        assert!(!Order::needs_parens(Order::Await, Order::None));
    }

    #[test]
    fn call_chains_stay_flat() {
        assert!(!Order::needs_parens(Order::FunctionCall, Order::Member));
        assert!(!Order::needs_parens(Order::Atomic, Order::Atomic));
        assert!(Order::needs_parens(Order::Additive, Order::Multiplicative));
    }
}
