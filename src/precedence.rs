//! Operator precedence, transcribed from PostgreSQL 17's `gram.y`
//!
//! Higher levels bind tighter. The formatter asks [`needs_parens`] before emitting a
//! child expression so that output re-parses to the same tree with as few
//! parentheses as possible.

use crate::ir::{Node, NodeKind};

pub const UNION: u16 = 1;
pub const INTERSECT: u16 = 2;
pub const OR: u16 = 3;
pub const AND: u16 = 4;
pub const NOT: u16 = 5;
pub const IS: u16 = 6;
pub const COMPARISON: u16 = 7;
pub const PATTERN: u16 = 8;
pub const ESCAPE: u16 = 9;
pub const OP: u16 = 10;
pub const ADD_SUB: u16 = 11;
pub const MUL_DIV: u16 = 12;
pub const EXP: u16 = 13;
pub const AT: u16 = 14;
pub const COLLATE: u16 = 15;
pub const UMINUS: u16 = 16;
pub const SUBSCRIPT: u16 = 17;
pub const PAREN: u16 = 18;
pub const TYPECAST: u16 = 19;
pub const DOT: u16 = 20;

/// Operator associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assoc {
    Left,
    Right,
    None,
}

/// Which operand of a binary parent a child sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precedence {
    pub level: u16,
    pub assoc: Assoc,
}

impl Precedence {
    pub const fn new(level: u16, assoc: Assoc) -> Self {
        Self { level, assoc }
    }
}

/// Column refs, constants, function calls, scalar subqueries: never parenthesized
pub const ATOMIC: Precedence = Precedence::new(999, Assoc::None);

/// Binary operator symbols with a dedicated grammar level
pub const OPERATORS: &[(&str, Precedence)] = &[
    ("<", Precedence::new(COMPARISON, Assoc::None)),
    (">", Precedence::new(COMPARISON, Assoc::None)),
    ("=", Precedence::new(COMPARISON, Assoc::None)),
    ("<=", Precedence::new(COMPARISON, Assoc::None)),
    (">=", Precedence::new(COMPARISON, Assoc::None)),
    ("<>", Precedence::new(COMPARISON, Assoc::None)),
    ("!=", Precedence::new(COMPARISON, Assoc::None)),
    ("+", Precedence::new(ADD_SUB, Assoc::Left)),
    ("-", Precedence::new(ADD_SUB, Assoc::Left)),
    ("*", Precedence::new(MUL_DIV, Assoc::Left)),
    ("/", Precedence::new(MUL_DIV, Assoc::Left)),
    ("%", Precedence::new(MUL_DIV, Assoc::Left)),
    ("^", Precedence::new(EXP, Assoc::Left)),
    ("||", Precedence::new(OP, Assoc::Left)),
    ("&", Precedence::new(OP, Assoc::Left)),
    ("|", Precedence::new(OP, Assoc::Left)),
    ("#", Precedence::new(OP, Assoc::Left)),
    ("~", Precedence::new(OP, Assoc::Left)),
    ("<<", Precedence::new(OP, Assoc::Left)),
    (">>", Precedence::new(OP, Assoc::Left)),
];

/// Precedence of a binary operator symbol; unknown operators get the generic `Op` level
pub fn operator_precedence(symbol: &str) -> Precedence {
    OPERATORS
        .iter()
        .find(|(sym, _)| *sym == symbol)
        .map(|(_, prec)| *prec)
        .unwrap_or(Precedence::new(OP, Assoc::Left))
}

/// The operator symbol of an `A_Expr` (its first name component)
pub(crate) fn operator_symbol(node: &Node) -> Option<&str> {
    node.slots("name").iter().flatten().next().and_then(Node::as_string)
}

/// How tightly `node` binds
pub fn precedence_of(node: &Node) -> Precedence {
    match node.kind() {
        NodeKind::BoolExpr => match node.tag("boolop") {
            "NOT_EXPR" => Precedence::new(NOT, Assoc::Right),
            "AND_EXPR" => Precedence::new(AND, Assoc::Left),
            _ => Precedence::new(OR, Assoc::Left),
        },
        NodeKind::AExpr => a_expr_precedence(node),
        NodeKind::NullTest | NodeKind::BooleanTest => Precedence::new(IS, Assoc::None),
        NodeKind::TypeCast => Precedence::new(TYPECAST, Assoc::Left),
        NodeKind::SubLink => sub_link_precedence(node),
        _ => ATOMIC,
    }
}

/// `x IN (...)` and `x op ANY (...)` bind like their operator; other sublinks are bracketed
fn sub_link_precedence(node: &Node) -> Precedence {
    let kind = node.tag("sub_link_type");
    if kind != "ANY_SUBLINK" && kind != "ALL_SUBLINK" {
        return ATOMIC;
    }
    match node.list("oper_name").last().copied().and_then(Node::as_string) {
        None if kind == "ANY_SUBLINK" => Precedence::new(PATTERN, Assoc::None),
        operator => Precedence::new(operator_precedence(operator.unwrap_or("=")).level, Assoc::None),
    }
}

fn a_expr_precedence(node: &Node) -> Precedence {
    match node.tag("kind") {
        "AEXPR_OP" => {
            let symbol = operator_symbol(node);
            if node.child("lexpr").is_none() && symbol == Some("-") {
                return Precedence::new(UMINUS, Assoc::Right);
            }
            symbol.map_or(Precedence::new(OP, Assoc::Left), operator_precedence)
        }
        "AEXPR_LIKE" | "AEXPR_ILIKE" | "AEXPR_SIMILAR" | "AEXPR_BETWEEN" | "AEXPR_NOT_BETWEEN"
        | "AEXPR_BETWEEN_SYM" | "AEXPR_NOT_BETWEEN_SYM" | "AEXPR_IN" | "AEXPR_OP_ANY"
        | "AEXPR_OP_ALL" => Precedence::new(PATTERN, Assoc::None),
        "AEXPR_DISTINCT" | "AEXPR_NOT_DISTINCT" => Precedence::new(IS, Assoc::None),
        "AEXPR_NULLIF" => ATOMIC,
        _ => Precedence::new(OP, Assoc::Left),
    }
}

/// Whether `child` must be parenthesized when emitted as an operand of `parent`
///
/// Without `side`, equal-level children of an associative parent are left bare.
pub fn needs_parens(parent: &Node, child: &Node, side: Option<Side>) -> bool {
    precedence_needs_parens(precedence_of(parent), precedence_of(child), side)
}

/// [`needs_parens`] on precomputed precedences
pub fn precedence_needs_parens(parent: Precedence, child: Precedence, side: Option<Side>) -> bool {
    if child.level < parent.level {
        return true;
    }
    if child.level > parent.level {
        return false;
    }
    match (parent.assoc, side) {
        (Assoc::None, _) => true,
        (_, None) => false,
        (Assoc::Left, Some(side)) => side == Side::Right,
        (Assoc::Right, Some(side)) => side == Side::Left,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_table() {
        assert_eq!(operator_precedence("=").level, COMPARISON);
        assert_eq!(operator_precedence("*").assoc, Assoc::Left);
        assert_eq!(operator_precedence("@>"), Precedence::new(OP, Assoc::Left));
    }

    #[test]
    fn test_equal_level_rules() {
        let left = Precedence::new(ADD_SUB, Assoc::Left);
        assert!(!precedence_needs_parens(left, left, Some(Side::Left)));
        assert!(precedence_needs_parens(left, left, Some(Side::Right)));
        assert!(!precedence_needs_parens(left, left, None));

        let none = Precedence::new(COMPARISON, Assoc::None);
        assert!(precedence_needs_parens(none, none, None));
    }
}
