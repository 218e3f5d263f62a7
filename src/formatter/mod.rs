//! SQL formatting / pretty-printing logic
//!
//! [`Formatter`] is a [`Visitor`] over the engine's tree. Kinds with a handler are
//! laid out here (expressions in `expr`, queries in `select`, DML in `dml`, DDL in
//! `ddl`); every other kind goes through the engine's canonical deparse.

mod ddl;
mod dml;
mod expr;
pub mod printer;
pub mod rules;
mod select;
mod utils;

use std::collections::HashMap;
use std::mem;

use tracing::{debug, trace, warn};

use crate::engine::{deparse_node, Engine};
use crate::error::{Error, Result};
use crate::ir::{Node, NodeKind, ParseTree};
use crate::precedence::{precedence_needs_parens, precedence_of, Precedence, Side};
use crate::walk::{self, Dispatch, Visitor};
use printer::Printer;
use rules::{STATEMENT_SEPARATOR, STATEMENT_TERMINATOR};
use utils::{is_reserved_keyword, is_simple_ident, quote_ident};

/// Parse `sql` with `engine` and format every statement
pub fn format_sql<E: Engine>(engine: E, sql: &str) -> Result<String> {
    let tree = engine.parse(sql).map_err(Error::parse)?;
    format_tree(engine, &tree)
}

/// Format an already parsed tree
pub fn format_tree<E: Engine>(engine: E, tree: &ParseTree) -> Result<String> {
    Formatter::new(engine).format(tree)
}

/// Tree formatter
///
/// Holds the emitter for the statement being formatted and a cache of identifier
/// quoting decisions, so one formatter can be reused across many trees.
pub struct Formatter<E> {
    engine: E,
    printer: Printer,
    /// Set for the top-level expression of a WHERE/HAVING body; the first AND/OR
    /// node consumes it and puts its operands on separate lines
    in_filter: bool,
    quoting: HashMap<String, bool>,
}

impl<E: Engine> Formatter<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            printer: Printer::new(),
            in_filter: false,
            quoting: HashMap::new(),
        }
    }

    /// Format every statement of `tree`, each terminated, separated by a blank line
    pub fn format(&mut self, tree: &ParseTree) -> Result<String> {
        let statements = tree
            .statements()
            .map(|stmt| self.format_statement(stmt))
            .collect::<Result<Vec<_>>>()?;
        if statements.is_empty() {
            return Ok(String::new());
        }
        let separator = format!("{STATEMENT_TERMINATOR}{STATEMENT_SEPARATOR}");
        Ok(statements.join(&separator) + STATEMENT_TERMINATOR)
    }

    /// Format one statement with a fresh emitter, without the terminator
    pub fn format_statement(&mut self, stmt: &Node) -> Result<String> {
        self.printer = Printer::new();
        self.in_filter = false;
        self.visit(stmt)?;
        Ok(mem::take(&mut self.printer).finish())
    }

    /// Format a subtree on its own and return the text, leaving the enclosing
    /// output untouched
    pub fn render(&mut self, node: &Node) -> Result<String> {
        let saved = mem::take(&mut self.printer);
        let saved_filter = mem::replace(&mut self.in_filter, false);
        let result = self.visit(node);
        let rendered = mem::replace(&mut self.printer, saved).finish();
        self.in_filter = saved_filter;
        result.map(|()| rendered)
    }

    /// Identifier text, double-quoted when it is not a plain lowercase name or is
    /// reserved
    fn ident(&mut self, name: &str) -> Result<String> {
        if !is_simple_ident(name) {
            return Ok(quote_ident(name));
        }
        let reserved = match self.quoting.get(name) {
            Some(reserved) => *reserved,
            None => {
                trace!(ident = name, "classifying identifier");
                let reserved = is_reserved_keyword(&self.engine, name).map_err(|source| {
                    Error::QuotingOracle {
                        ident: name.to_string(),
                        source,
                    }
                })?;
                self.quoting.insert(name.to_string(), reserved);
                reserved
            }
        };
        Ok(if reserved {
            quote_ident(name)
        } else {
            name.to_string()
        })
    }

    fn write_ident(&mut self, name: &str) -> Result<()> {
        let ident = self.ident(name)?;
        self.printer.write(&ident);
        Ok(())
    }

    /// Dotted name from a list of `String` nodes, each part quoted as needed
    fn qualified_name(&mut self, parts: &[&Node]) -> Result<String> {
        let mut names = Vec::with_capacity(parts.len());
        for part in parts {
            match part.as_string() {
                Some(name) => names.push(self.ident(name)?),
                None if part.is(NodeKind::AStar) => names.push("*".to_string()),
                None => return Err(Error::invalid_tree(format!("{} in a name list", part.kind()))),
            }
        }
        Ok(names.join("."))
    }

    /// Emit a `String` node as an identifier, anything else by visiting it
    fn ident_or_visit(&mut self, node: &Node) -> Result<()> {
        match node.as_string() {
            Some(name) => self.write_ident(name),
            None => self.visit(node),
        }
    }

    /// Emit `child` as an operand of `parent`, parenthesized when precedence requires
    fn operand(&mut self, parent: &Node, child: &Node, side: Option<Side>) -> Result<()> {
        self.operand_at(precedence_of(parent), child, side)
    }

    fn operand_at(&mut self, parent: Precedence, child: &Node, side: Option<Side>) -> Result<()> {
        if precedence_needs_parens(parent, precedence_of(child), side) {
            self.printer.write("(");
            self.visit(child)?;
            self.printer.write(")");
            Ok(())
        } else {
            self.visit(child)
        }
    }

    fn inline_list(&mut self, items: &[&Node]) -> Result<()> {
        self.inline_list_with(items, |f, item| f.visit(item))
    }

    fn inline_list_with<F>(&mut self, items: &[&Node], mut each: F) -> Result<()>
    where
        F: FnMut(&mut Self, &Node) -> Result<()>,
    {
        for (i, item) in items.iter().copied().enumerate() {
            if i > 0 {
                self.printer.write(", ");
            }
            each(self, item)?;
        }
        Ok(())
    }

    fn multiline_list_with<F>(&mut self, items: &[&Node], mut each: F) -> Result<()>
    where
        F: FnMut(&mut Self, &Node) -> Result<()>,
    {
        for (i, item) in items.iter().copied().enumerate() {
            if i > 0 {
                self.printer.write(",");
                self.printer.newline();
            }
            each(self, item)?;
        }
        Ok(())
    }

    /// `keyword` on its own line, then the items one per line, indented
    fn list_clause(&mut self, keyword: &str, items: &[&Node]) -> Result<()> {
        self.list_clause_with(keyword, items, |f, item| f.visit(item))
    }

    fn list_clause_with<F>(&mut self, keyword: &str, items: &[&Node], each: F) -> Result<()>
    where
        F: FnMut(&mut Self, &Node) -> Result<()>,
    {
        self.printer.newline();
        self.printer.write(keyword);
        self.printer.newline();
        self.printer.indent();
        self.multiline_list_with(items, each)?;
        self.printer.dedent();
        Ok(())
    }

    /// WHERE/HAVING-style clause; a top-level AND/OR puts one operand per line
    fn filter_clause(&mut self, keyword: &str, expr: &Node) -> Result<()> {
        self.printer.newline();
        self.printer.write(keyword);
        self.printer.newline();
        self.printer.indent();
        self.in_filter = is_and_or(expr);
        let result = self.visit(expr);
        self.in_filter = false;
        result?;
        self.printer.dedent();
        Ok(())
    }

    /// `open`, then `query` indented on its own lines, then `)`
    fn nested_query(&mut self, open: &str, query: &Node) -> Result<()> {
        self.printer.write(open);
        self.printer.newline();
        self.printer.indent();
        self.visit(query)?;
        self.printer.newline();
        self.printer.dedent();
        self.printer.write(")");
        Ok(())
    }

    /// Emit the engine's canonical text for `node`; failure is an error
    fn deparse_fallback(&mut self, node: &Node) -> Result<()> {
        let text = deparse_node(&self.engine, node).map_err(|source| Error::Unsupported {
            kind: node.kind(),
            source,
        })?;
        debug!(kind = %node.kind(), "formatted through engine deparse");
        self.printer.write(&text);
        Ok(())
    }
}

impl<'ast, E: Engine> Visitor<'ast> for Formatter<E> {
    type Error = Error;

    fn handle(&mut self, node: &'ast Node) -> Result<Dispatch> {
        match node.kind() {
            // Statements
            NodeKind::RawStmt => self.visit(required(node, "stmt")?)?,
            NodeKind::SelectStmt => self.format_select(node)?,
            NodeKind::InsertStmt => self.format_insert(node)?,
            NodeKind::UpdateStmt => self.format_update(node)?,
            NodeKind::DeleteStmt => self.format_delete(node)?,
            NodeKind::CreateStmt => self.format_create_table(node)?,
            NodeKind::IndexStmt => self.format_create_index(node)?,
            NodeKind::ViewStmt => self.format_create_view(node)?,
            NodeKind::AlterTableStmt => self.format_alter_table(node)?,
            NodeKind::DropStmt => self.format_drop(node)?,

            // Clauses
            NodeKind::ResTarget => self.format_res_target(node)?,
            NodeKind::RangeVar => self.format_range_var(node)?,
            NodeKind::RangeSubselect => self.format_range_subselect(node)?,
            NodeKind::RangeFunction => self.format_range_function(node)?,
            NodeKind::RangeTableSample => self.format_table_sample(node)?,
            NodeKind::JoinExpr => self.format_join(node)?,
            NodeKind::SortBy => self.format_sort_by(node)?,
            NodeKind::GroupingSet => self.format_grouping_set(node)?,
            NodeKind::LockingClause => self.format_locking_clause(node)?,
            NodeKind::WithClause => self.format_with_clause(node)?,
            NodeKind::CommonTableExpr => self.format_cte(node)?,
            NodeKind::WindowDef => self.format_window_def(node)?,
            NodeKind::TypeName => self.format_type_name(node)?,
            NodeKind::ColumnDef => self.format_column_def(node)?,
            NodeKind::Constraint => self.format_table_constraint(node)?,
            NodeKind::IndexElem => self.format_index_elem(node)?,
            NodeKind::ObjectWithArgs => self.format_object_with_args(node)?,
            NodeKind::RoleSpec => self.format_role_spec(node)?,

            // Expressions
            NodeKind::AConst => self.format_const(node)?,
            NodeKind::ColumnRef => self.format_column_ref(node)?,
            NodeKind::ParamRef => self.format_param_ref(node),
            NodeKind::AExpr => self.format_a_expr(node)?,
            NodeKind::BoolExpr => self.format_bool_expr(node)?,
            NodeKind::FuncCall => self.format_func_call(node)?,
            NodeKind::NamedArgExpr => self.format_named_arg(node)?,
            NodeKind::TypeCast => self.format_type_cast(node)?,
            NodeKind::CollateClause => self.format_collate(node)?,
            NodeKind::CaseExpr => self.format_case(node)?,
            NodeKind::CaseWhen => self.format_case_when(node)?,
            NodeKind::SubLink => self.format_sub_link(node)?,
            NodeKind::NullTest => self.format_null_test(node)?,
            NodeKind::BooleanTest => self.format_boolean_test(node)?,
            NodeKind::CoalesceExpr => self.format_coalesce(node)?,
            NodeKind::MinMaxExpr => self.format_min_max(node)?,
            NodeKind::SqlValueFunction => self.format_sql_value_function(node)?,
            NodeKind::AStar => self.printer.write("*"),
            NodeKind::AIndirection => self.format_indirection(node)?,
            NodeKind::AArrayExpr => self.format_array_expr(node)?,
            NodeKind::RowExpr => self.format_row_expr(node)?,
            NodeKind::SetToDefault => self.printer.write("DEFAULT"),
            NodeKind::CurrentOfExpr => self.format_current_of(node)?,

            // Values
            NodeKind::String => self.printer.write(node.tag("sval")),
            NodeKind::Integer => self.printer.write(&node.int("ival").to_string()),
            NodeKind::Float => self.printer.write(node.tag("fval")),
            NodeKind::Boolean => self.printer.write(bool_keyword(node.flag("boolval"))),
            NodeKind::BitString => self.printer.write(&utils::bit_string_literal(node.tag("bsval"))),
            NodeKind::List => self.inline_list(&node.list("items"))?,

            _ => return Ok(Dispatch::Unhandled),
        }
        Ok(Dispatch::Handled)
    }

    /// Kinds without a handler: the engine's canonical text, or the children when
    /// the engine cannot deparse the node on its own
    fn generic_visit(&mut self, node: &'ast Node) -> Result<()> {
        match deparse_node(&self.engine, node) {
            Ok(text) => {
                debug!(kind = %node.kind(), "formatted through engine deparse");
                self.printer.write(&text);
                Ok(())
            }
            Err(error) => {
                warn!(kind = %node.kind(), %error, "engine deparse failed, visiting children");
                walk::generic_visit(self, node)
            }
        }
    }
}

/// A child slot the layout cannot do without
fn required<'n>(node: &'n Node, field: &str) -> Result<&'n Node> {
    node.child(field)
        .ok_or_else(|| Error::invalid_tree(format!("{} without `{field}`", node.kind())))
}

fn is_and_or(node: &Node) -> bool {
    node.is(NodeKind::BoolExpr) && matches!(node.tag("boolop"), "AND_EXPR" | "OR_EXPR")
}

fn bool_keyword(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}
