//! Shared fixtures: a canned grammar engine and IR builders

#![allow(dead_code)]

use std::collections::HashMap;

use pgpretty::{Engine, EngineError, KeywordKind, Node, NodeKind, ParseTree, ScanToken};

/// Keywords the fixture scanner reports as reserved (a subset of PostgreSQL's list)
pub const RESERVED: &[&str] = &[
    "all", "and", "any", "array", "as", "asc", "case", "cast", "check", "collate", "column",
    "constraint", "create", "default", "desc", "distinct", "do", "else", "end", "except",
    "false", "fetch", "for", "foreign", "from", "grant", "group", "having", "in", "intersect",
    "into", "lateral", "limit", "not", "null", "offset", "on", "only", "or", "order", "primary",
    "references", "returning", "select", "some", "table", "then", "to", "true", "union",
    "unique", "user", "using", "when", "where", "window", "with",
];

/// Engine answering from registered fixtures
///
/// `parse` looks SQL up after whitespace normalization, so formatted output parses back
/// to the tree its input was registered with.
#[derive(Default)]
pub struct FixtureEngine {
    trees: HashMap<String, ParseTree>,
    parse_errors: HashMap<String, EngineError>,
    deparsed: Vec<(Node, String)>,
    scan_error: Option<EngineError>,
}

impl FixtureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(mut self, sql: &str, tree: ParseTree) -> Self {
        self.trees.insert(normalize(sql), tree);
        self
    }

    pub fn with_statement(self, sql: &str, stmt: Node) -> Self {
        self.with_tree(sql, ParseTree::single(stmt))
    }

    pub fn with_parse_error(mut self, sql: &str, error: EngineError) -> Self {
        self.parse_errors.insert(normalize(sql), error);
        self
    }

    /// Canonical text for a node wrapped as a one-statement tree
    pub fn with_deparse(mut self, node: Node, text: &str) -> Self {
        self.deparsed.push((node, text.to_string()));
        self
    }

    pub fn with_scan_error(mut self, error: EngineError) -> Self {
        self.scan_error = Some(error);
        self
    }
}

impl Engine for FixtureEngine {
    fn parse(&self, sql: &str) -> Result<ParseTree, EngineError> {
        let key = normalize(sql);
        if let Some(error) = self.parse_errors.get(&key) {
            return Err(error.clone());
        }
        self.trees
            .get(&key)
            .cloned()
            .ok_or_else(|| EngineError::new(format!("no fixture for {key:?}")))
    }

    fn deparse(&self, tree: &ParseTree) -> Result<String, EngineError> {
        let stmts: Vec<&Node> = tree.statements().collect();
        let [stmt] = stmts.as_slice() else {
            return Err(EngineError::new("fixture deparse takes one statement"));
        };
        self.deparsed
            .iter()
            .find(|(node, _)| node == *stmt)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| EngineError::new(format!("cannot deparse {}", stmt.kind())))
    }

    fn scan(&self, sql: &str) -> Result<Vec<ScanToken>, EngineError> {
        if let Some(error) = &self.scan_error {
            return Err(error.clone());
        }
        let mut tokens = Vec::new();
        let mut offset = 0;
        for word in sql.split(' ') {
            let keyword = if RESERVED.contains(&word.to_ascii_lowercase().as_str()) {
                KeywordKind::Reserved
            } else {
                KeywordKind::NoKeyword
            };
            if !word.is_empty() {
                tokens.push(ScanToken {
                    start: offset,
                    end: offset + word.len(),
                    keyword,
                });
            }
            offset += word.len() + 1;
        }
        Ok(tokens)
    }
}

/// Collapse whitespace, drop padding inside parentheses and a trailing `;`
pub fn normalize(sql: &str) -> String {
    let collapsed = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    let collapsed = collapsed.replace("( ", "(").replace(" )", ")");
    collapsed.trim_end_matches(';').trim_end().to_string()
}

// =============================================================================
// IR builders
// =============================================================================

pub fn string(value: &str) -> Node {
    Node::new(NodeKind::String).with("sval", value)
}

pub fn strings(values: &[&str]) -> Vec<Node> {
    values.iter().map(|v| string(v)).collect()
}

pub fn list(items: Vec<Node>) -> Node {
    Node::new(NodeKind::List).with("items", items)
}

pub fn col(name: &str) -> Node {
    Node::new(NodeKind::ColumnRef).with("fields", strings(&name.split('.').collect::<Vec<_>>()))
}

pub fn star() -> Node {
    Node::new(NodeKind::ColumnRef).with("fields", vec![Node::new(NodeKind::AStar)])
}

pub fn int(value: i64) -> Node {
    Node::new(NodeKind::AConst).with("ival", Node::new(NodeKind::Integer).with("ival", value))
}

pub fn float(value: &str) -> Node {
    Node::new(NodeKind::AConst).with("fval", Node::new(NodeKind::Float).with("fval", value))
}

pub fn text(value: &str) -> Node {
    Node::new(NodeKind::AConst).with("sval", string(value))
}

pub fn boolean(value: bool) -> Node {
    Node::new(NodeKind::AConst).with("boolval", Node::new(NodeKind::Boolean).with("boolval", value))
}

pub fn null() -> Node {
    Node::new(NodeKind::AConst).with("isnull", true)
}

pub fn param(number: i64) -> Node {
    Node::new(NodeKind::ParamRef).with("number", number)
}

pub fn a_expr(kind: &str, op: &str, lexpr: Option<Node>, rexpr: Node) -> Node {
    let mut node = Node::new(NodeKind::AExpr)
        .with("kind", kind)
        .with("name", vec![string(op)]);
    if let Some(lexpr) = lexpr {
        node.set("lexpr", lexpr);
    }
    node.with("rexpr", rexpr)
}

pub fn op(symbol: &str, lexpr: Node, rexpr: Node) -> Node {
    a_expr("AEXPR_OP", symbol, Some(lexpr), rexpr)
}

pub fn eq(lexpr: Node, rexpr: Node) -> Node {
    op("=", lexpr, rexpr)
}

pub fn bool_expr(boolop: &str, args: Vec<Node>) -> Node {
    Node::new(NodeKind::BoolExpr)
        .with("boolop", boolop)
        .with("args", args)
}

pub fn and(args: Vec<Node>) -> Node {
    bool_expr("AND_EXPR", args)
}

pub fn or(args: Vec<Node>) -> Node {
    bool_expr("OR_EXPR", args)
}

pub fn not(arg: Node) -> Node {
    bool_expr("NOT_EXPR", vec![arg])
}

pub fn func(name: &str, args: Vec<Node>) -> Node {
    let mut node = Node::new(NodeKind::FuncCall)
        .with("funcname", strings(&name.split('.').collect::<Vec<_>>()))
        .with("funcformat", "COERCE_EXPLICIT_CALL");
    if !args.is_empty() {
        node.set("args", args);
    }
    node
}

pub fn type_name(parts: &[&str]) -> Node {
    Node::new(NodeKind::TypeName)
        .with("names", strings(parts))
        .with("typemod", -1i64)
}

pub fn cast(arg: Node, type_name: Node) -> Node {
    Node::new(NodeKind::TypeCast)
        .with("arg", arg)
        .with("type_name", type_name)
}

pub fn target(val: Node) -> Node {
    Node::new(NodeKind::ResTarget).with("val", val)
}

pub fn target_as(val: Node, name: &str) -> Node {
    target(val).with("name", name)
}

pub fn column_target(name: &str) -> Node {
    Node::new(NodeKind::ResTarget).with("name", name)
}

pub fn assign(name: &str, val: Node) -> Node {
    column_target(name).with("val", val)
}

pub fn range_var(name: &str) -> Node {
    let mut node = Node::new(NodeKind::RangeVar);
    match name.split_once('.') {
        Some((schema, rel)) => {
            node.set("schemaname", schema);
            node.set("relname", rel);
        }
        None => node.set("relname", name),
    }
    node.with("inh", true).with("relpersistence", "p")
}

pub fn alias(name: &str) -> Node {
    Node::new(NodeKind::Alias).with("aliasname", name)
}

pub fn aliased(rel: &str, name: &str) -> Node {
    range_var(rel).with("alias", alias(name))
}

/// SELECT of `targets`; clauses are added with [`Node::with`]
pub fn select(targets: Vec<Node>) -> Node {
    Node::new(NodeKind::SelectStmt)
        .with("target_list", targets)
        .with("limit_option", "LIMIT_OPTION_DEFAULT")
        .with("op", "SETOP_NONE")
}

pub fn select_from(targets: Vec<Node>, from: Vec<Node>) -> Node {
    select(targets).with("from_clause", from)
}

pub fn set_op(op: &str, all: bool, larg: Node, rarg: Node) -> Node {
    Node::new(NodeKind::SelectStmt)
        .with("limit_option", "LIMIT_OPTION_DEFAULT")
        .with("op", op)
        .with("all", all)
        .with("larg", larg)
        .with("rarg", rarg)
}

pub fn values(rows: Vec<Vec<Node>>) -> Node {
    Node::new(NodeKind::SelectStmt)
        .with("values_lists", rows.into_iter().map(list).collect::<Vec<_>>())
        .with("limit_option", "LIMIT_OPTION_DEFAULT")
        .with("op", "SETOP_NONE")
}

pub fn sub_link(kind: &str, subselect: Node) -> Node {
    Node::new(NodeKind::SubLink)
        .with("sub_link_type", kind)
        .with("subselect", subselect)
}

pub fn sort_by(node: Node, dir: &str) -> Node {
    Node::new(NodeKind::SortBy)
        .with("node", node)
        .with("sortby_dir", dir)
        .with("sortby_nulls", "SORTBY_NULLS_DEFAULT")
}

pub fn join(jointype: &str, larg: Node, rarg: Node, quals: Option<Node>) -> Node {
    let mut node = Node::new(NodeKind::JoinExpr)
        .with("jointype", jointype)
        .with("larg", larg)
        .with("rarg", rarg);
    if let Some(quals) = quals {
        node.set("quals", quals);
    }
    node
}

pub fn window(partition: Vec<Node>, order: Vec<Node>, frame_options: i64) -> Node {
    let mut node = Node::new(NodeKind::WindowDef).with("frame_options", frame_options);
    if !partition.is_empty() {
        node.set("partition_clause", partition);
    }
    if !order.is_empty() {
        node.set("order_clause", order);
    }
    node
}

pub fn constraint(contype: &str) -> Node {
    Node::new(NodeKind::Constraint).with("contype", contype)
}

pub fn column_def(name: &str, type_name: Node, constraints: Vec<Node>) -> Node {
    let mut node = Node::new(NodeKind::ColumnDef)
        .with("colname", name)
        .with("type_name", type_name)
        .with("is_local", true);
    if !constraints.is_empty() {
        node.set("constraints", constraints);
    }
    node
}

/// Node carrying only a statement-level `VariableSetStmt`, which has no handler
pub fn set_search_path(schema: &str) -> Node {
    Node::new(NodeKind::VariableSetStmt)
        .with("kind", "VAR_SET_VALUE")
        .with("name", "search_path")
        .with("args", vec![text(schema)])
}
