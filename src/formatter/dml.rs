//! INSERT, UPDATE and DELETE handlers

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::ir::{Node, NodeKind};
use crate::walk::Visitor;

use super::{required, Formatter};

impl<E: Engine> Formatter<E> {
    pub(super) fn format_insert(&mut self, node: &Node) -> Result<()> {
        self.with_prefix(node)?;
        let relation = required(node, "relation")?;
        self.printer.write("INSERT INTO ");
        self.relation_name(relation)?;
        if let Some(alias) = relation.child("alias") {
            self.printer.write(" AS ");
            self.alias(alias)?;
        }
        let cols = node.list("cols");
        if !cols.is_empty() {
            self.printer.write(" (");
            self.inline_list_with(&cols, |f, col| f.target_column(col))?;
            self.printer.write(")");
        }
        match node.tag("override") {
            "OVERRIDING_SYSTEM_VALUE" => {
                self.printer.newline();
                self.printer.write("OVERRIDING SYSTEM VALUE");
            }
            "OVERRIDING_USER_VALUE" => {
                self.printer.newline();
                self.printer.write("OVERRIDING USER VALUE");
            }
            _ => {}
        }
        self.printer.newline();
        match node.child("select_stmt") {
            Some(source) => self.visit(source)?,
            None => self.printer.write("DEFAULT VALUES"),
        }
        if let Some(conflict) = node.child("on_conflict_clause") {
            self.printer.newline();
            self.on_conflict(conflict)?;
        }
        self.returning_clause(&node.list("returning_list"))
    }

    fn on_conflict(&mut self, node: &Node) -> Result<()> {
        self.printer.write("ON CONFLICT");
        if let Some(infer) = node.child("infer") {
            if let Some(conname) = infer.str("conname") {
                self.printer.write(" ON CONSTRAINT ");
                self.write_ident(conname)?;
            } else {
                self.printer.write(" (");
                self.inline_list(&infer.list("index_elems"))?;
                self.printer.write(")");
                if let Some(predicate) = infer.child("where_clause") {
                    self.printer.write(" WHERE ");
                    self.visit(predicate)?;
                }
            }
        }
        match node.tag("action") {
            "ONCONFLICT_UPDATE" => {
                self.printer.write(" DO UPDATE");
                self.set_clause(&node.list("target_list"))?;
                if let Some(filter) = node.child("where_clause") {
                    self.filter_clause("WHERE", filter)?;
                }
            }
            _ => self.printer.write(" DO NOTHING"),
        }
        Ok(())
    }

    pub(super) fn format_update(&mut self, node: &Node) -> Result<()> {
        self.with_prefix(node)?;
        self.printer.write("UPDATE ");
        self.visit(required(node, "relation")?)?;
        self.set_clause(&node.list("target_list"))?;
        let from = node.list("from_clause");
        if !from.is_empty() {
            self.list_clause("FROM", &from)?;
        }
        if let Some(filter) = node.child("where_clause") {
            self.filter_clause("WHERE", filter)?;
        }
        self.returning_clause(&node.list("returning_list"))
    }

    pub(super) fn format_delete(&mut self, node: &Node) -> Result<()> {
        self.with_prefix(node)?;
        self.printer.write("DELETE FROM ");
        self.visit(required(node, "relation")?)?;
        let using = node.list("using_clause");
        if !using.is_empty() {
            self.list_clause("USING", &using)?;
        }
        if let Some(filter) = node.child("where_clause") {
            self.filter_clause("WHERE", filter)?;
        }
        self.returning_clause(&node.list("returning_list"))
    }

    pub(super) fn format_current_of(&mut self, node: &Node) -> Result<()> {
        let cursor = node
            .str("cursor_name")
            .ok_or_else(|| Error::invalid_tree("CURRENT OF without a cursor name"))?;
        self.printer.write("CURRENT OF ");
        self.write_ident(cursor)
    }

    /// SET with one assignment per line; `(a, b) = source` for multi-column targets
    fn set_clause(&mut self, targets: &[&Node]) -> Result<()> {
        self.printer.newline();
        self.printer.write("SET");
        self.printer.newline();
        self.printer.indent();
        let mut rest = targets;
        let mut first = true;
        while let Some(target) = rest.first().copied() {
            if !first {
                self.printer.write(",");
                self.printer.newline();
            }
            first = false;
            let val = required(target, "val")?;
            if val.is(NodeKind::MultiAssignRef) {
                // the source is repeated on each target; its first carrier owns the group
                let width = usize::try_from(val.int("ncolumns")).unwrap_or(1).clamp(1, rest.len());
                let (group, tail) = rest.split_at(width);
                self.printer.write("(");
                self.inline_list_with(group, |f, col| f.target_column(col))?;
                self.printer.write(") = ");
                self.visit(required(val, "source")?)?;
                rest = tail;
            } else {
                self.target_column(target)?;
                self.printer.write(" = ");
                self.visit(val)?;
                rest = &rest[1..];
            }
        }
        self.printer.dedent();
        Ok(())
    }

    /// RETURNING; kept on the keyword line for a single one-line target
    fn returning_clause(&mut self, targets: &[&Node]) -> Result<()> {
        if let [target] = targets {
            let rendered = self.render(target)?;
            if !rendered.contains('\n') {
                self.printer.newline();
                self.printer.write("RETURNING ");
                self.printer.write(&rendered);
                return Ok(());
            }
        }
        if targets.is_empty() {
            return Ok(());
        }
        self.list_clause("RETURNING", targets)
    }
}
