//! Query handlers: SELECT, set operations, FROM items, CTEs

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::ir::{Node, NodeKind};
use crate::precedence::{self, Side};
use crate::walk::Visitor;

use super::rules;
use super::{required, Formatter};

impl<E: Engine> Formatter<E> {
    pub(super) fn format_select(&mut self, node: &Node) -> Result<()> {
        self.with_prefix(node)?;
        if let Some(level) = set_op_level(node.tag("op")) {
            self.set_operand(level, required(node, "larg")?, Side::Left)?;
            self.printer.newline();
            let keyword = match node.tag("op") {
                "SETOP_INTERSECT" => "INTERSECT",
                "SETOP_EXCEPT" => "EXCEPT",
                _ => "UNION",
            };
            self.printer.write(keyword);
            if node.flag("all") {
                self.printer.write(" ALL");
            }
            self.printer.newline();
            self.set_operand(level, required(node, "rarg")?, Side::Right)?;
        } else if !node.slots("values_lists").is_empty() {
            self.printer.write("VALUES");
            self.values_rows(&node.list("values_lists"))?;
        } else {
            self.select_core(node)?;
        }
        self.trailing_clauses(node)
    }

    /// Indented `(row)` lines of a VALUES body
    pub(super) fn values_rows(&mut self, rows: &[&Node]) -> Result<()> {
        self.printer.newline();
        self.printer.indent();
        self.multiline_list_with(rows, |f, row| {
            f.printer.write("(");
            f.inline_list(&row.list("items"))?;
            f.printer.write(")");
            Ok(())
        })?;
        self.printer.dedent();
        Ok(())
    }

    fn select_core(&mut self, node: &Node) -> Result<()> {
        self.printer.write("SELECT");
        if !node.slots("distinct_clause").is_empty() {
            self.printer.write(" DISTINCT");
            let on = node.list("distinct_clause");
            if !on.is_empty() {
                self.printer.write(" ON (");
                self.inline_list(&on)?;
                self.printer.write(")");
            }
        }
        let targets = node.list("target_list");
        if !targets.is_empty() {
            self.printer.newline();
            self.printer.indent();
            self.multiline_list_with(&targets, |f, target| f.visit(target))?;
            self.printer.dedent();
        }
        if let Some(into) = node.child("into_clause") {
            self.printer.newline();
            self.printer.write("INTO");
            self.printer.newline();
            self.printer.indent();
            let rel = required(into, "rel")?;
            match rel.tag("relpersistence") {
                "t" => self.printer.write("TEMPORARY "),
                "u" => self.printer.write("UNLOGGED "),
                _ => {}
            }
            self.visit(rel)?;
            self.printer.dedent();
        }
        let from = node.list("from_clause");
        if !from.is_empty() {
            self.list_clause("FROM", &from)?;
        }
        if let Some(filter) = node.child("where_clause") {
            self.filter_clause("WHERE", filter)?;
        }
        let group = node.list("group_clause");
        if !group.is_empty() {
            let keyword = if node.flag("group_distinct") {
                "GROUP BY DISTINCT"
            } else {
                "GROUP BY"
            };
            self.list_clause(keyword, &group)?;
        }
        if let Some(having) = node.child("having_clause") {
            self.filter_clause("HAVING", having)?;
        }
        let windows = node.list("window_clause");
        if !windows.is_empty() {
            self.list_clause_with("WINDOW", &windows, |f, window| {
                let name = window
                    .str("name")
                    .ok_or_else(|| Error::invalid_tree("WINDOW clause entry without a name"))?;
                f.write_ident(name)?;
                f.printer.write(" AS ");
                f.window_spec(window)
            })?;
        }
        Ok(())
    }

    /// ORDER BY, LIMIT/FETCH, OFFSET and locking, shared by plain selects, VALUES and
    /// set operations
    fn trailing_clauses(&mut self, node: &Node) -> Result<()> {
        let sort = node.list("sort_clause");
        if !sort.is_empty() {
            self.list_clause("ORDER BY", &sort)?;
        }
        if let Some(count) = node.child("limit_count") {
            if node.tag("limit_option") == "LIMIT_OPTION_WITH_TIES" {
                self.printer.newline();
                self.printer.write("FETCH FIRST");
                self.printer.newline();
                self.printer.indent();
                // FETCH FIRST takes a bare c_expr only
                if matches!(
                    count.kind(),
                    NodeKind::AConst | NodeKind::ParamRef | NodeKind::ColumnRef | NodeKind::FuncCall
                ) {
                    self.visit(count)?;
                } else {
                    self.printer.write("(");
                    self.visit(count)?;
                    self.printer.write(")");
                }
                self.printer.write(" ROWS WITH TIES");
                self.printer.dedent();
            } else {
                self.list_clause("LIMIT", &[count])?;
            }
        }
        if let Some(offset) = node.child("limit_offset") {
            self.list_clause("OFFSET", &[offset])?;
        }
        for lock in node.list("locking_clause") {
            self.printer.newline();
            self.visit(lock)?;
        }
        Ok(())
    }

    /// `WITH ...` followed by a line break, when `node` carries a WITH clause
    pub(super) fn with_prefix(&mut self, node: &Node) -> Result<()> {
        if let Some(with) = node.child("with_clause") {
            self.visit(with)?;
            self.printer.newline();
        }
        Ok(())
    }

    fn set_operand(&mut self, parent: u16, child: &Node, side: Side) -> Result<()> {
        let grouped = match set_op_level(child.tag("op")) {
            Some(level) => level < parent || (level == parent && side == Side::Right),
            None => false,
        };
        if grouped || has_own_clauses(child) {
            self.nested_query("(", child)
        } else {
            self.visit(child)
        }
    }

    pub(super) fn format_locking_clause(&mut self, node: &Node) -> Result<()> {
        let strength = node.tag("strength");
        let keyword = rules::lock_strength(strength)
            .ok_or_else(|| Error::invalid_tree(format!("unknown lock strength {strength:?}")))?;
        self.printer.write(keyword);
        let rels = node.list("locked_rels");
        if !rels.is_empty() {
            self.printer.write(" OF ");
            self.inline_list(&rels)?;
        }
        match node.tag("wait_policy") {
            "LockWaitSkip" => self.printer.write(" SKIP LOCKED"),
            "LockWaitError" => self.printer.write(" NOWAIT"),
            _ => {}
        }
        Ok(())
    }

    pub(super) fn format_range_var(&mut self, node: &Node) -> Result<()> {
        if !node.flag("inh") {
            self.printer.write("ONLY ");
        }
        self.relation_name(node)?;
        if let Some(alias) = node.child("alias") {
            self.printer.write(" ");
            self.alias(alias)?;
        }
        Ok(())
    }

    /// `[catalog.][schema.]relname`, without ONLY or alias
    pub(super) fn relation_name(&mut self, node: &Node) -> Result<()> {
        let relname = node
            .str("relname")
            .ok_or_else(|| Error::invalid_tree("RangeVar without a relname"))?;
        for qualifier in [node.str("catalogname"), node.str("schemaname")].into_iter().flatten() {
            self.write_ident(qualifier)?;
            self.printer.write(".");
        }
        self.write_ident(relname)
    }

    /// `name[(col, ...)]`
    pub(super) fn alias(&mut self, alias: &Node) -> Result<()> {
        let name = alias
            .str("aliasname")
            .ok_or_else(|| Error::invalid_tree("Alias without a name"))?;
        self.write_ident(name)?;
        self.ident_list(&alias.list("colnames"))
    }

    /// `(a, b)` from `String` nodes, nothing when empty
    pub(super) fn ident_list(&mut self, names: &[&Node]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        self.printer.write("(");
        self.inline_list_with(names, |f, name| f.ident_or_visit(name))?;
        self.printer.write(")");
        Ok(())
    }

    pub(super) fn format_range_subselect(&mut self, node: &Node) -> Result<()> {
        if node.flag("lateral") {
            self.printer.write("LATERAL ");
        }
        self.nested_query("(", required(node, "subquery")?)?;
        if let Some(alias) = node.child("alias") {
            self.printer.write(" AS ");
            self.alias(alias)?;
        }
        Ok(())
    }

    pub(super) fn format_range_function(&mut self, node: &Node) -> Result<()> {
        if node.flag("lateral") {
            self.printer.write("LATERAL ");
        }
        let functions = node.list("functions");
        let rows_from = node.flag("is_rowsfrom");
        if rows_from {
            self.printer.write("ROWS FROM (");
        }
        for (i, item) in functions.iter().copied().enumerate() {
            if i > 0 {
                self.printer.write(", ");
            }
            // each entry is a (call, column definitions) pair
            let mut parts = item.slots("items").iter();
            let call = parts
                .next()
                .and_then(Option::as_ref)
                .ok_or_else(|| Error::invalid_tree("RangeFunction entry without a call"))?;
            self.visit(call)?;
            if let Some(Some(coldefs)) = parts.next() {
                self.printer.write(" AS (");
                self.inline_list(&coldefs.list("items"))?;
                self.printer.write(")");
            }
        }
        if rows_from {
            self.printer.write(")");
        }
        if node.flag("ordinality") {
            self.printer.write(" WITH ORDINALITY");
        }
        let coldefs = node.list("coldeflist");
        match node.child("alias") {
            Some(alias) => {
                self.printer.write(" AS ");
                if coldefs.is_empty() {
                    self.alias(alias)?;
                } else {
                    self.write_ident(alias.str("aliasname").unwrap_or_default())?;
                    self.printer.write("(");
                    self.inline_list(&coldefs)?;
                    self.printer.write(")");
                }
            }
            None if !coldefs.is_empty() => {
                self.printer.write(" AS (");
                self.inline_list(&coldefs)?;
                self.printer.write(")");
            }
            None => {}
        }
        Ok(())
    }

    pub(super) fn format_table_sample(&mut self, node: &Node) -> Result<()> {
        self.visit(required(node, "relation")?)?;
        let method = self.qualified_name(&node.list("method"))?;
        self.printer.write(&format!(" TABLESAMPLE {method}("));
        self.inline_list(&node.list("args"))?;
        self.printer.write(")");
        if let Some(repeatable) = node.child("repeatable") {
            self.printer.write(" REPEATABLE(");
            self.visit(repeatable)?;
            self.printer.write(")");
        }
        Ok(())
    }

    pub(super) fn format_join(&mut self, node: &Node) -> Result<()> {
        let alias = node.child("alias");
        if alias.is_some() {
            self.printer.write("(");
        }
        self.visit(required(node, "larg")?)?;
        self.printer.newline();

        let quals = node.child("quals");
        let using = node.list("using_clause");
        let natural = node.flag("is_natural");
        let keyword = rules::join_keyword(node.tag("jointype"));
        if natural {
            self.printer.write(&format!("NATURAL {keyword} "));
        } else if quals.is_none() && using.is_empty() && keyword == "JOIN" {
            self.printer.write("CROSS JOIN ");
        } else {
            self.printer.write(&format!("{keyword} "));
        }

        let rarg = required(node, "rarg")?;
        if rarg.is(NodeKind::JoinExpr) && rarg.child("alias").is_none() {
            self.printer.write("(");
            self.visit(rarg)?;
            self.printer.write(")");
        } else {
            self.visit(rarg)?;
        }

        if let Some(quals) = quals {
            self.printer.write(" ON ");
            self.visit(quals)?;
        } else if !using.is_empty() {
            self.printer.write(" USING ");
            self.ident_list(&using)?;
            if let Some(using_alias) = node.child("join_using_alias") {
                self.printer.write(" AS ");
                self.alias(using_alias)?;
            }
        }
        if let Some(alias) = alias {
            self.printer.write(") AS ");
            self.alias(alias)?;
        }
        Ok(())
    }

    pub(super) fn format_grouping_set(&mut self, node: &Node) -> Result<()> {
        let open = match node.tag("kind") {
            "GROUPING_SET_EMPTY" => {
                self.printer.write("()");
                return Ok(());
            }
            "GROUPING_SET_ROLLUP" => "ROLLUP(",
            "GROUPING_SET_CUBE" => "CUBE(",
            "GROUPING_SET_SETS" => "GROUPING SETS (",
            _ => "(",
        };
        self.printer.write(open);
        self.inline_list(&node.list("content"))?;
        self.printer.write(")");
        Ok(())
    }

    pub(super) fn format_with_clause(&mut self, node: &Node) -> Result<()> {
        self.printer.write("WITH");
        if node.flag("recursive") {
            self.printer.write(" RECURSIVE");
        }
        self.printer.newline();
        self.printer.indent();
        self.multiline_list_with(&node.list("ctes"), |f, cte| f.visit(cte))?;
        self.printer.dedent();
        Ok(())
    }

    pub(super) fn format_cte(&mut self, node: &Node) -> Result<()> {
        let name = node
            .str("ctename")
            .ok_or_else(|| Error::invalid_tree("CommonTableExpr without a name"))?;
        self.write_ident(name)?;
        self.ident_list(&node.list("aliascolnames"))?;
        self.printer.write(" AS ");
        match node.tag("ctematerialized") {
            "CTEMaterializeAlways" => self.printer.write("MATERIALIZED "),
            "CTEMaterializeNever" => self.printer.write("NOT MATERIALIZED "),
            _ => {}
        }
        self.nested_query("(", required(node, "ctequery")?)?;
        if let Some(search) = node.child("search_clause") {
            let order = if search.flag("search_breadth_first") {
                "BREADTH"
            } else {
                "DEPTH"
            };
            self.printer.write(&format!(" SEARCH {order} FIRST BY "));
            self.inline_list_with(&search.list("search_col_list"), |f, col| f.ident_or_visit(col))?;
            self.printer.write(" SET ");
            self.write_ident(search.str("search_seq_column").unwrap_or_default())?;
        }
        if let Some(cycle) = node.child("cycle_clause") {
            self.printer.write(" CYCLE ");
            self.inline_list_with(&cycle.list("cycle_col_list"), |f, col| f.ident_or_visit(col))?;
            self.printer.write(" SET ");
            self.write_ident(cycle.str("cycle_mark_column").unwrap_or_default())?;
            if let Some(value) = cycle.child("cycle_mark_value") {
                self.printer.write(" TO ");
                self.visit(value)?;
            }
            if let Some(default) = cycle.child("cycle_mark_default") {
                self.printer.write(" DEFAULT ");
                self.visit(default)?;
            }
            self.printer.write(" USING ");
            self.write_ident(cycle.str("cycle_path_column").unwrap_or_default())?;
        }
        Ok(())
    }
}

/// Binding level of a set operation, `None` for a plain select
fn set_op_level(op: &str) -> Option<u16> {
    match op {
        "SETOP_UNION" | "SETOP_EXCEPT" => Some(precedence::UNION),
        "SETOP_INTERSECT" => Some(precedence::INTERSECT),
        _ => None,
    }
}

/// Clauses that bind to a set operand only when it is parenthesized
fn has_own_clauses(node: &Node) -> bool {
    ["sort_clause", "locking_clause"]
        .iter()
        .any(|field| !node.slots(field).is_empty())
        || ["limit_count", "limit_offset", "with_clause"]
            .iter()
            .any(|field| node.child(field).is_some())
}
