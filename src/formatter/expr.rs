//! Expression handlers

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::ir::{Node, NodeKind};
use crate::precedence::{self, operator_symbol, Assoc, Precedence, Side};
use crate::walk::Visitor;

use super::rules::{
    self, FRAMEOPTION_BETWEEN, FRAMEOPTION_END_CURRENT_ROW, FRAMEOPTION_END_OFFSET_FOLLOWING,
    FRAMEOPTION_END_OFFSET_PRECEDING, FRAMEOPTION_END_UNBOUNDED_FOLLOWING,
    FRAMEOPTION_END_UNBOUNDED_PRECEDING, FRAMEOPTION_EXCLUDE_CURRENT_ROW,
    FRAMEOPTION_EXCLUDE_GROUP, FRAMEOPTION_EXCLUDE_TIES, FRAMEOPTION_GROUPS,
    FRAMEOPTION_NONDEFAULT, FRAMEOPTION_ROWS, FRAMEOPTION_START_CURRENT_ROW,
    FRAMEOPTION_START_OFFSET_FOLLOWING, FRAMEOPTION_START_OFFSET_PRECEDING,
    FRAMEOPTION_START_UNBOUNDED_FOLLOWING, FRAMEOPTION_START_UNBOUNDED_PRECEDING,
};
use super::utils::{bit_string_literal, quote_literal};
use super::{bool_keyword, required, Formatter};

const PATTERN: Precedence = Precedence::new(precedence::PATTERN, Assoc::None);
const IS: Precedence = Precedence::new(precedence::IS, Assoc::None);
const COLLATE: Precedence = Precedence::new(precedence::COLLATE, Assoc::Left);

impl<E: Engine> Formatter<E> {
    pub(super) fn format_const(&mut self, node: &Node) -> Result<()> {
        if node.flag("isnull") {
            self.printer.write("NULL");
        } else if let Some(ival) = node.child("ival") {
            self.printer.write(&ival.int("ival").to_string());
        } else if let Some(fval) = node.child("fval") {
            self.printer.write(fval.tag("fval"));
        } else if let Some(boolval) = node.child("boolval") {
            self.printer.write(bool_keyword(boolval.flag("boolval")));
        } else if let Some(sval) = node.child("sval") {
            self.printer.write(&quote_literal(sval.tag("sval")));
        } else if let Some(bsval) = node.child("bsval") {
            self.printer.write(&bit_string_literal(bsval.tag("bsval")));
        } else {
            return Err(Error::invalid_tree("A_Const without a value"));
        }
        Ok(())
    }

    pub(super) fn format_column_ref(&mut self, node: &Node) -> Result<()> {
        let name = self.qualified_name(&node.list("fields"))?;
        self.printer.write(&name);
        Ok(())
    }

    pub(super) fn format_param_ref(&mut self, node: &Node) {
        self.printer.write(&format!("${}", node.int("number")));
    }

    pub(super) fn format_a_expr(&mut self, node: &Node) -> Result<()> {
        let symbol = operator_symbol(node).unwrap_or_default();
        match node.tag("kind") {
            "AEXPR_OP" => self.format_operator(node),
            "AEXPR_IN" => {
                self.operand(node, required(node, "lexpr")?, Some(Side::Left))?;
                // NOT IN is stored as `<>` over the list
                self.printer.write(if symbol == "<>" { " NOT IN (" } else { " IN (" });
                let rexpr = required(node, "rexpr")?;
                if rexpr.is(NodeKind::List) {
                    self.inline_list(&rexpr.list("items"))?;
                } else {
                    self.visit(rexpr)?;
                }
                self.printer.write(")");
                Ok(())
            }
            "AEXPR_LIKE" | "AEXPR_ILIKE" => {
                let keyword = if node.tag("kind") == "AEXPR_LIKE" { "LIKE" } else { "ILIKE" };
                self.format_pattern_match(node, keyword, symbol.starts_with('!'), "like_escape")
            }
            "AEXPR_SIMILAR" => {
                let rexpr = required(node, "rexpr")?;
                if !is_system_call(rexpr, "similar_to_escape") {
                    return self.deparse_fallback(node);
                }
                self.format_pattern_match(node, "SIMILAR TO", symbol.starts_with('!'), "similar_to_escape")
            }
            kind @ ("AEXPR_BETWEEN" | "AEXPR_NOT_BETWEEN" | "AEXPR_BETWEEN_SYM"
            | "AEXPR_NOT_BETWEEN_SYM") => {
                let keyword = match kind {
                    "AEXPR_BETWEEN" => "BETWEEN",
                    "AEXPR_NOT_BETWEEN" => "NOT BETWEEN",
                    "AEXPR_BETWEEN_SYM" => "BETWEEN SYMMETRIC",
                    _ => "NOT BETWEEN SYMMETRIC",
                };
                self.operand(node, required(node, "lexpr")?, Some(Side::Left))?;
                self.printer.write(&format!(" {keyword} "));
                let bounds = required(node, "rexpr")?.list("items");
                let [low, high] = bounds.as_slice() else {
                    return Err(Error::invalid_tree(format!("{keyword} needs two bounds")));
                };
                self.restricted_operand(low)?;
                self.printer.write(" AND ");
                self.restricted_operand(high)
            }
            kind @ ("AEXPR_DISTINCT" | "AEXPR_NOT_DISTINCT") => {
                self.operand_at(IS, required(node, "lexpr")?, Some(Side::Left))?;
                self.printer.write(if kind == "AEXPR_DISTINCT" {
                    " IS DISTINCT FROM "
                } else {
                    " IS NOT DISTINCT FROM "
                });
                self.operand_at(IS, required(node, "rexpr")?, Some(Side::Right))
            }
            "AEXPR_NULLIF" => {
                self.printer.write("NULLIF(");
                self.visit(required(node, "lexpr")?)?;
                self.printer.write(", ");
                self.visit(required(node, "rexpr")?)?;
                self.printer.write(")");
                Ok(())
            }
            kind @ ("AEXPR_OP_ANY" | "AEXPR_OP_ALL") => {
                let quantifier = if kind == "AEXPR_OP_ANY" { "ANY" } else { "ALL" };
                self.operand(node, required(node, "lexpr")?, Some(Side::Left))?;
                self.printer.write(&format!(" {symbol} {quantifier}("));
                self.visit(required(node, "rexpr")?)?;
                self.printer.write(")");
                Ok(())
            }
            _ => self.deparse_fallback(node),
        }
    }

    /// Operand of a slot the grammar restricts to `b_expr`: no boolean, IS, LIKE, IN or
    /// BETWEEN forms without parentheses
    pub(super) fn restricted_operand(&mut self, node: &Node) -> Result<()> {
        self.operand_at(PATTERN, node, None)
    }

    fn format_operator(&mut self, node: &Node) -> Result<()> {
        let names = node.list("name");
        let op = match names.as_slice() {
            [single] => single.as_string().unwrap_or_default().to_string(),
            [schema @ .., last] => {
                let schema = self.qualified_name(schema)?;
                format!("OPERATOR({schema}.{})", last.as_string().unwrap_or_default())
            }
            [] => return Err(Error::invalid_tree("A_Expr without an operator name")),
        };
        match node.child("lexpr") {
            Some(lexpr) => {
                self.operand(node, lexpr, Some(Side::Left))?;
                self.printer.write(&format!(" {op} "));
                self.operand(node, required(node, "rexpr")?, Some(Side::Right))
            }
            None => {
                self.printer.write(&format!("{op} "));
                self.operand(node, required(node, "rexpr")?, None)
            }
        }
    }

    /// `lexpr [NOT] keyword pattern [ESCAPE esc]`; the escape arrives wrapped in a
    /// `pg_catalog.<escape_fn>` call
    fn format_pattern_match(&mut self, node: &Node, keyword: &str, negated: bool, escape_fn: &str) -> Result<()> {
        self.operand(node, required(node, "lexpr")?, Some(Side::Left))?;
        let not = if negated { "NOT " } else { "" };
        self.printer.write(&format!(" {not}{keyword} "));
        let rexpr = required(node, "rexpr")?;
        if is_system_call(rexpr, escape_fn) {
            let args = rexpr.list("args");
            if let Some(pattern) = args.first() {
                self.operand(node, pattern, Some(Side::Right))?;
            }
            if let Some(escape) = args.get(1) {
                self.printer.write(" ESCAPE ");
                self.operand(node, escape, Some(Side::Right))?;
            }
            return Ok(());
        }
        self.operand(node, rexpr, Some(Side::Right))
    }

    pub(super) fn format_bool_expr(&mut self, node: &Node) -> Result<()> {
        let args = node.list("args");
        let keyword = match node.tag("boolop") {
            "NOT_EXPR" => {
                let arg = args
                    .first()
                    .ok_or_else(|| Error::invalid_tree("NOT without an argument"))?;
                self.in_filter = false;
                self.printer.write("NOT ");
                return self.operand(node, arg, None);
            }
            "AND_EXPR" => "AND",
            _ => "OR",
        };
        let multiline = std::mem::take(&mut self.in_filter);
        for (i, arg) in args.iter().copied().enumerate() {
            let side = if i == 0 {
                Side::Left
            } else {
                if multiline {
                    self.printer.newline();
                    self.printer.write(&format!("{keyword} "));
                } else {
                    self.printer.write(&format!(" {keyword} "));
                }
                Side::Right
            };
            self.operand(node, arg, Some(side))?;
        }
        Ok(())
    }

    pub(super) fn format_func_call(&mut self, node: &Node) -> Result<()> {
        // EXTRACT, TRIM, OVERLAY and friends only parse back in their SQL syntax
        if node.tag("funcformat") == "COERCE_SQL_SYNTAX" {
            return self.deparse_fallback(node);
        }
        let mut funcname = node.list("funcname");
        if funcname.len() > 1 && funcname[0].as_string() == Some("pg_catalog") {
            funcname.remove(0);
        }
        let name = self.qualified_name(&funcname)?;
        self.printer.write(&name);
        self.printer.write("(");
        let within_group = node.flag("agg_within_group");
        if node.flag("agg_star") {
            self.printer.write("*");
        } else {
            if node.flag("agg_distinct") {
                self.printer.write("DISTINCT ");
            }
            let args = node.list("args");
            let variadic = node.flag("func_variadic");
            let last = args.len().saturating_sub(1);
            for (i, arg) in args.iter().copied().enumerate() {
                if i > 0 {
                    self.printer.write(", ");
                }
                if variadic && i == last {
                    self.printer.write("VARIADIC ");
                }
                self.visit(arg)?;
            }
            let order = node.list("agg_order");
            if !order.is_empty() && !within_group {
                self.printer.write(" ORDER BY ");
                self.inline_list(&order)?;
            }
        }
        self.printer.write(")");
        if within_group {
            self.printer.write(" WITHIN GROUP (ORDER BY ");
            self.inline_list(&node.list("agg_order"))?;
            self.printer.write(")");
        }
        if let Some(filter) = node.child("agg_filter") {
            self.printer.write(" FILTER (WHERE ");
            self.visit(filter)?;
            self.printer.write(")");
        }
        if let Some(over) = node.child("over") {
            self.printer.write(" OVER ");
            self.visit(over)?;
        }
        Ok(())
    }

    pub(super) fn format_named_arg(&mut self, node: &Node) -> Result<()> {
        if let Some(name) = node.str("name") {
            self.write_ident(name)?;
            self.printer.write(" => ");
        }
        self.visit(required(node, "arg")?)
    }

    /// `OVER` target: a window name, or a parenthesized specification
    pub(super) fn format_window_def(&mut self, node: &Node) -> Result<()> {
        match node.str("name") {
            Some(name) => self.write_ident(name),
            None => self.window_spec(node),
        }
    }

    /// `([refname] [PARTITION BY ...] [ORDER BY ...] [frame])`
    pub(super) fn window_spec(&mut self, node: &Node) -> Result<()> {
        let mut parts = Vec::new();
        if let Some(refname) = node.str("refname") {
            parts.push(self.ident(refname)?);
        }
        let partition = node.list("partition_clause");
        if !partition.is_empty() {
            let items = self.render_inline(&partition)?;
            parts.push(format!("PARTITION BY {items}"));
        }
        let order = node.list("order_clause");
        if !order.is_empty() {
            let items = self.render_inline(&order)?;
            parts.push(format!("ORDER BY {items}"));
        }
        if node.int("frame_options") & FRAMEOPTION_NONDEFAULT != 0 {
            parts.push(self.window_frame(node)?);
        }
        self.printer.write(&format!("({})", parts.join(" ")));
        Ok(())
    }

    fn window_frame(&mut self, node: &Node) -> Result<String> {
        let options = node.int("frame_options");
        let mode = if options & FRAMEOPTION_ROWS != 0 {
            "ROWS"
        } else if options & FRAMEOPTION_GROUPS != 0 {
            "GROUPS"
        } else {
            "RANGE"
        };
        let start = if options & FRAMEOPTION_START_UNBOUNDED_PRECEDING != 0 {
            "UNBOUNDED PRECEDING".to_string()
        } else if options & FRAMEOPTION_START_UNBOUNDED_FOLLOWING != 0 {
            "UNBOUNDED FOLLOWING".to_string()
        } else if options & FRAMEOPTION_START_CURRENT_ROW != 0 {
            "CURRENT ROW".to_string()
        } else if options & FRAMEOPTION_START_OFFSET_PRECEDING != 0 {
            format!("{} PRECEDING", self.render(required(node, "start_offset")?)?)
        } else if options & FRAMEOPTION_START_OFFSET_FOLLOWING != 0 {
            format!("{} FOLLOWING", self.render(required(node, "start_offset")?)?)
        } else {
            return Err(Error::invalid_tree("window frame without a start bound"));
        };
        let mut frame = if options & FRAMEOPTION_BETWEEN != 0 {
            let end = if options & FRAMEOPTION_END_UNBOUNDED_FOLLOWING != 0 {
                "UNBOUNDED FOLLOWING".to_string()
            } else if options & FRAMEOPTION_END_UNBOUNDED_PRECEDING != 0 {
                "UNBOUNDED PRECEDING".to_string()
            } else if options & FRAMEOPTION_END_CURRENT_ROW != 0 {
                "CURRENT ROW".to_string()
            } else if options & FRAMEOPTION_END_OFFSET_PRECEDING != 0 {
                format!("{} PRECEDING", self.render(required(node, "end_offset")?)?)
            } else if options & FRAMEOPTION_END_OFFSET_FOLLOWING != 0 {
                format!("{} FOLLOWING", self.render(required(node, "end_offset")?)?)
            } else {
                return Err(Error::invalid_tree("window frame without an end bound"));
            };
            format!("{mode} BETWEEN {start} AND {end}")
        } else {
            format!("{mode} {start}")
        };
        if options & FRAMEOPTION_EXCLUDE_CURRENT_ROW != 0 {
            frame.push_str(" EXCLUDE CURRENT ROW");
        } else if options & FRAMEOPTION_EXCLUDE_GROUP != 0 {
            frame.push_str(" EXCLUDE GROUP");
        } else if options & FRAMEOPTION_EXCLUDE_TIES != 0 {
            frame.push_str(" EXCLUDE TIES");
        }
        Ok(frame)
    }

    /// Comma-separated rendering of `items`
    fn render_inline(&mut self, items: &[&Node]) -> Result<String> {
        let rendered = items
            .iter()
            .map(|item| self.render(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join(", "))
    }

    pub(super) fn format_type_cast(&mut self, node: &Node) -> Result<()> {
        let arg = required(node, "arg")?;
        // `-1::int` would parse as a negated cast
        if is_negative_const(arg) {
            self.printer.write("(");
            self.visit(arg)?;
            self.printer.write(")");
        } else {
            self.operand(node, arg, Some(Side::Left))?;
        }
        self.printer.write("::");
        self.visit(required(node, "type_name")?)
    }

    pub(super) fn format_type_name(&mut self, node: &Node) -> Result<()> {
        if node.flag("setof") {
            self.printer.write("SETOF ");
        }
        let names = node.list("names");
        let builtin = names.first().and_then(|n| n.as_string()) == Some("pg_catalog");
        let name = if builtin {
            names
                .iter()
                .filter_map(|n| n.as_string())
                .filter(|n| *n != "pg_catalog")
                .collect::<Vec<_>>()
                .join(".")
        } else {
            self.qualified_name(&names)?
        };
        self.printer.write(rules::type_name(&name));
        if node.flag("pct_type") {
            self.printer.write("%TYPE");
        }
        let typmods = node.list("typmods");
        if !typmods.is_empty() {
            self.printer.write("(");
            self.inline_list(&typmods)?;
            self.printer.write(")");
        }
        for bound in node.list("array_bounds") {
            match bound.int("ival") {
                n if n >= 0 => self.printer.write(&format!("[{n}]")),
                _ => self.printer.write("[]"),
            }
        }
        Ok(())
    }

    pub(super) fn format_collate(&mut self, node: &Node) -> Result<()> {
        self.operand_at(COLLATE, required(node, "arg")?, Some(Side::Left))?;
        let collation = self.qualified_name(&node.list("collname"))?;
        self.printer.write(&format!(" COLLATE {collation}"));
        Ok(())
    }

    pub(super) fn format_case(&mut self, node: &Node) -> Result<()> {
        self.printer.write("CASE");
        if let Some(arg) = node.child("arg") {
            self.printer.write(" ");
            self.visit(arg)?;
        }
        self.printer.newline();
        self.printer.indent();
        for when in node.list("args") {
            self.visit(when)?;
        }
        if let Some(default) = node.child("defresult") {
            self.printer.write("ELSE ");
            self.visit(default)?;
            self.printer.newline();
        }
        self.printer.dedent();
        self.printer.write("END");
        Ok(())
    }

    pub(super) fn format_case_when(&mut self, node: &Node) -> Result<()> {
        self.printer.write("WHEN ");
        self.visit(required(node, "expr")?)?;
        self.printer.write(" THEN ");
        self.visit(required(node, "result")?)?;
        self.printer.newline();
        Ok(())
    }

    pub(super) fn format_sub_link(&mut self, node: &Node) -> Result<()> {
        let subselect = required(node, "subselect")?;
        match node.tag("sub_link_type") {
            "EXISTS_SUBLINK" => self.nested_query("EXISTS (", subselect),
            "EXPR_SUBLINK" => self.nested_query("(", subselect),
            "ARRAY_SUBLINK" => self.nested_query("ARRAY(", subselect),
            kind @ ("ANY_SUBLINK" | "ALL_SUBLINK") => {
                let operator = node.list("oper_name").last().copied().and_then(Node::as_string);
                self.operand(node, required(node, "testexpr")?, Some(Side::Left))?;
                match (kind, operator) {
                    // `x IN (SELECT ...)` carries no operator
                    ("ANY_SUBLINK", None) => self.nested_query(" IN (", subselect),
                    (_, operator) => {
                        let quantifier = if kind == "ANY_SUBLINK" { "ANY" } else { "ALL" };
                        let opening = format!(" {} {quantifier}(", operator.unwrap_or("="));
                        self.nested_query(&opening, subselect)
                    }
                }
            }
            _ => self.deparse_fallback(node),
        }
    }

    pub(super) fn format_null_test(&mut self, node: &Node) -> Result<()> {
        self.operand(node, required(node, "arg")?, Some(Side::Left))?;
        self.printer.write(if node.tag("nulltesttype") == "IS_NOT_NULL" {
            " IS NOT NULL"
        } else {
            " IS NULL"
        });
        Ok(())
    }

    pub(super) fn format_boolean_test(&mut self, node: &Node) -> Result<()> {
        self.operand(node, required(node, "arg")?, Some(Side::Left))?;
        let test = match node.tag("booltesttype") {
            "IS_TRUE" => " IS TRUE",
            "IS_NOT_TRUE" => " IS NOT TRUE",
            "IS_FALSE" => " IS FALSE",
            "IS_NOT_FALSE" => " IS NOT FALSE",
            "IS_UNKNOWN" => " IS UNKNOWN",
            "IS_NOT_UNKNOWN" => " IS NOT UNKNOWN",
            other => return Err(Error::invalid_tree(format!("unknown boolean test {other:?}"))),
        };
        self.printer.write(test);
        Ok(())
    }

    pub(super) fn format_coalesce(&mut self, node: &Node) -> Result<()> {
        self.printer.write("COALESCE(");
        self.inline_list(&node.list("args"))?;
        self.printer.write(")");
        Ok(())
    }

    pub(super) fn format_min_max(&mut self, node: &Node) -> Result<()> {
        self.printer.write(if node.tag("op") == "IS_GREATEST" {
            "GREATEST("
        } else {
            "LEAST("
        });
        self.inline_list(&node.list("args"))?;
        self.printer.write(")");
        Ok(())
    }

    pub(super) fn format_sql_value_function(&mut self, node: &Node) -> Result<()> {
        let op = node.tag("op");
        let keyword = rules::sql_value_function(op)
            .ok_or_else(|| Error::invalid_tree(format!("unknown SQLValueFunction op {op:?}")))?;
        self.printer.write(keyword);
        if op.ends_with("_N") && node.int("typmod") >= 0 {
            self.printer.write(&format!("({})", node.int("typmod")));
        }
        Ok(())
    }

    pub(super) fn format_indirection(&mut self, node: &Node) -> Result<()> {
        let arg = required(node, "arg")?;
        let indirection = node.list("indirection");
        let subscript_first = indirection.first().is_some_and(|n| n.is(NodeKind::AIndices));
        let bare = arg.is(NodeKind::ParamRef) || (arg.is(NodeKind::ColumnRef) && subscript_first);
        if bare {
            self.visit(arg)?;
        } else {
            self.printer.write("(");
            self.visit(arg)?;
            self.printer.write(")");
        }
        for step in indirection {
            match step.kind() {
                NodeKind::String => {
                    self.printer.write(".");
                    self.write_ident(step.tag("sval"))?;
                }
                NodeKind::AStar => self.printer.write(".*"),
                NodeKind::AIndices => {
                    self.printer.write("[");
                    if let Some(lidx) = step.child("lidx") {
                        self.visit(lidx)?;
                    }
                    if step.flag("is_slice") {
                        self.printer.write(":");
                    }
                    if let Some(uidx) = step.child("uidx") {
                        self.visit(uidx)?;
                    }
                    self.printer.write("]");
                }
                _ => {
                    self.printer.write(".");
                    self.visit(step)?;
                }
            }
        }
        Ok(())
    }

    pub(super) fn format_array_expr(&mut self, node: &Node) -> Result<()> {
        self.printer.write("ARRAY[");
        self.inline_list(&node.list("elements"))?;
        self.printer.write("]");
        Ok(())
    }

    pub(super) fn format_row_expr(&mut self, node: &Node) -> Result<()> {
        let args = node.list("args");
        // a one-column implicit row would read back as a parenthesized expression
        if node.tag("row_format") == "COERCE_EXPLICIT_CALL" || args.len() < 2 {
            self.printer.write("ROW(");
        } else {
            self.printer.write("(");
        }
        self.inline_list(&args)?;
        self.printer.write(")");
        Ok(())
    }

    pub(super) fn format_res_target(&mut self, node: &Node) -> Result<()> {
        match node.child("val") {
            Some(val) => {
                self.visit(val)?;
                if let Some(name) = node.str("name") {
                    self.printer.write(" AS ");
                    self.write_ident(name)?;
                }
            }
            None => self.target_column(node)?,
        }
        Ok(())
    }

    /// Column name of an INSERT or SET target, with any subscripts or field steps
    pub(super) fn target_column(&mut self, node: &Node) -> Result<()> {
        let name = node
            .str("name")
            .ok_or_else(|| Error::invalid_tree("target column without a name"))?;
        self.write_ident(name)?;
        for step in node.list("indirection") {
            match step.as_string() {
                Some(field) => {
                    self.printer.write(".");
                    self.write_ident(field)?;
                }
                None => {
                    self.printer.write("[");
                    if let Some(lidx) = step.child("lidx") {
                        self.visit(lidx)?;
                    }
                    if step.flag("is_slice") {
                        self.printer.write(":");
                    }
                    if let Some(uidx) = step.child("uidx") {
                        self.visit(uidx)?;
                    }
                    self.printer.write("]");
                }
            }
        }
        Ok(())
    }

    pub(super) fn format_sort_by(&mut self, node: &Node) -> Result<()> {
        self.visit(required(node, "node")?)?;
        match node.tag("sortby_dir") {
            "SORTBY_ASC" => self.printer.write(" ASC"),
            "SORTBY_DESC" => self.printer.write(" DESC"),
            "SORTBY_USING" => {
                let names = node.list("use_op");
                let op = match names.as_slice() {
                    [single] => single.as_string().unwrap_or_default().to_string(),
                    [schema @ .., last] => format!(
                        "OPERATOR({}.{})",
                        self.qualified_name(schema)?,
                        last.as_string().unwrap_or_default()
                    ),
                    [] => return Err(Error::invalid_tree("ORDER BY USING without an operator")),
                };
                self.printer.write(&format!(" USING {op}"));
            }
            _ => {}
        }
        match node.tag("sortby_nulls") {
            "SORTBY_NULLS_FIRST" => self.printer.write(" NULLS FIRST"),
            "SORTBY_NULLS_LAST" => self.printer.write(" NULLS LAST"),
            _ => {}
        }
        Ok(())
    }
}

/// A call to `pg_catalog.<name>`, as the grammar builds for ESCAPE clauses
fn is_system_call(node: &Node, name: &str) -> bool {
    if !node.is(NodeKind::FuncCall) {
        return false;
    }
    let funcname = node.list("funcname");
    matches!(
        funcname.as_slice(),
        [schema, func] if schema.as_string() == Some("pg_catalog") && func.as_string() == Some(name)
    )
}

fn is_negative_const(node: &Node) -> bool {
    if !node.is(NodeKind::AConst) {
        return false;
    }
    if let Some(ival) = node.child("ival") {
        return ival.int("ival") < 0;
    }
    node.child("fval")
        .is_some_and(|fval| fval.tag("fval").starts_with('-'))
}
