//! DDL handlers: CREATE TABLE / INDEX / VIEW, ALTER TABLE, DROP
//!
//! Each statement is checked up front; when it carries a clause these handlers do not
//! lay out (storage options, partition bounds, exclusion constraints, ...) the whole
//! statement is emitted through the engine's deparse instead.

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::ir::{Node, NodeKind};
use crate::walk::Visitor;

use super::rules;
use super::{required, Formatter};

impl<E: Engine> Formatter<E> {
    pub(super) fn format_create_table(&mut self, node: &Node) -> Result<()> {
        if !create_table_supported(node) {
            return self.deparse_fallback(node);
        }
        let relation = required(node, "relation")?;
        self.printer.write("CREATE ");
        self.persistence(relation);
        self.printer.write("TABLE ");
        if node.flag("if_not_exists") {
            self.printer.write("IF NOT EXISTS ");
        }
        self.relation_name(relation)?;

        let mut elements = node.list("table_elts");
        elements.extend(node.list("constraints"));
        if elements.is_empty() {
            self.printer.write(" ()");
        } else {
            self.printer.write(" (");
            self.printer.newline();
            self.printer.indent();
            self.multiline_list_with(&elements, |f, element| f.visit(element))?;
            self.printer.newline();
            self.printer.dedent();
            self.printer.write(")");
        }

        let parents = node.list("inh_relations");
        if !parents.is_empty() {
            self.printer.write(" INHERITS (");
            self.inline_list(&parents)?;
            self.printer.write(")");
        }
        if let Some(spec) = node.child("partspec") {
            self.partition_spec(spec)?;
        }
        Ok(())
    }

    fn persistence(&mut self, relation: &Node) {
        match relation.tag("relpersistence") {
            "t" => self.printer.write("TEMPORARY "),
            "u" => self.printer.write("UNLOGGED "),
            _ => {}
        }
    }

    fn partition_spec(&mut self, spec: &Node) -> Result<()> {
        let strategy = match spec.tag("strategy") {
            "PARTITION_STRATEGY_LIST" => "LIST",
            "PARTITION_STRATEGY_HASH" => "HASH",
            _ => "RANGE",
        };
        self.printer.write(&format!(" PARTITION BY {strategy} ("));
        self.inline_list_with(&spec.list("part_params"), |f, elem| {
            f.index_column(elem)?;
            f.collation_and_opclass(elem)
        })?;
        self.printer.write(")");
        Ok(())
    }

    pub(super) fn format_column_def(&mut self, node: &Node) -> Result<()> {
        let name = node
            .str("colname")
            .ok_or_else(|| Error::invalid_tree("ColumnDef without a name"))?;
        self.write_ident(name)?;
        if let Some(type_name) = node.child("type_name") {
            self.printer.write(" ");
            self.visit(type_name)?;
        }
        if let Some(collation) = node.child("coll_clause") {
            let name = self.qualified_name(&collation.list("collname"))?;
            self.printer.write(&format!(" COLLATE {name}"));
        }
        for constraint in node.list("constraints") {
            self.printer.write(" ");
            self.column_constraint(constraint)?;
        }
        Ok(())
    }

    fn constraint_name(&mut self, node: &Node) -> Result<()> {
        if let Some(name) = node.str("conname") {
            self.printer.write("CONSTRAINT ");
            self.write_ident(name)?;
            self.printer.write(" ");
        }
        Ok(())
    }

    /// Constraint attached to a column definition
    fn column_constraint(&mut self, node: &Node) -> Result<()> {
        self.constraint_name(node)?;
        match node.tag("contype") {
            "CONSTR_NOTNULL" => self.printer.write("NOT NULL"),
            "CONSTR_NULL" => self.printer.write("NULL"),
            "CONSTR_DEFAULT" => {
                self.printer.write("DEFAULT ");
                self.restricted_operand(required(node, "raw_expr")?)?;
            }
            "CONSTR_CHECK" => self.check_constraint(node)?,
            "CONSTR_PRIMARY" => self.printer.write("PRIMARY KEY"),
            "CONSTR_UNIQUE" => {
                self.printer.write("UNIQUE");
                if node.flag("nulls_not_distinct") {
                    self.printer.write(" NULLS NOT DISTINCT");
                }
            }
            "CONSTR_FOREIGN" => self.references(node)?,
            "CONSTR_IDENTITY" => {
                let when = if node.tag("generated_when") == "d" {
                    "BY DEFAULT"
                } else {
                    "ALWAYS"
                };
                self.printer.write(&format!("GENERATED {when} AS IDENTITY"));
            }
            "CONSTR_GENERATED" => {
                self.printer.write("GENERATED ALWAYS AS (");
                self.visit(required(node, "raw_expr")?)?;
                self.printer.write(") STORED");
            }
            "CONSTR_ATTR_DEFERRABLE" => self.printer.write("DEFERRABLE"),
            "CONSTR_ATTR_NOT_DEFERRABLE" => self.printer.write("NOT DEFERRABLE"),
            "CONSTR_ATTR_DEFERRED" => self.printer.write("INITIALLY DEFERRED"),
            "CONSTR_ATTR_IMMEDIATE" => self.printer.write("INITIALLY IMMEDIATE"),
            _ => return self.deparse_fallback(node),
        }
        Ok(())
    }

    /// Table-level constraint, as in CREATE TABLE or ALTER TABLE ... ADD
    pub(super) fn format_table_constraint(&mut self, node: &Node) -> Result<()> {
        self.constraint_name(node)?;
        match node.tag("contype") {
            "CONSTR_PRIMARY" => {
                self.printer.write("PRIMARY KEY ");
                self.ident_list(&node.list("keys"))?;
                self.including(node)?;
            }
            "CONSTR_UNIQUE" => {
                self.printer.write("UNIQUE ");
                if node.flag("nulls_not_distinct") {
                    self.printer.write("NULLS NOT DISTINCT ");
                }
                self.ident_list(&node.list("keys"))?;
                self.including(node)?;
            }
            "CONSTR_CHECK" => self.check_constraint(node)?,
            "CONSTR_FOREIGN" => {
                self.printer.write("FOREIGN KEY ");
                self.ident_list(&node.list("fk_attrs"))?;
                self.printer.write(" ");
                self.references(node)?;
            }
            _ => return self.deparse_fallback(node),
        }
        if node.flag("deferrable") {
            self.printer.write(" DEFERRABLE");
        }
        if node.flag("initdeferred") {
            self.printer.write(" INITIALLY DEFERRED");
        }
        if node.flag("skip_validation") {
            self.printer.write(" NOT VALID");
        }
        Ok(())
    }

    fn check_constraint(&mut self, node: &Node) -> Result<()> {
        self.printer.write("CHECK (");
        self.visit(required(node, "raw_expr")?)?;
        self.printer.write(")");
        if node.flag("is_no_inherit") {
            self.printer.write(" NO INHERIT");
        }
        Ok(())
    }

    fn including(&mut self, node: &Node) -> Result<()> {
        let including = node.list("including");
        if !including.is_empty() {
            self.printer.write(" INCLUDE ");
            self.ident_list(&including)?;
        }
        Ok(())
    }

    /// `REFERENCES rel [(cols)] [MATCH ...] [ON DELETE ...] [ON UPDATE ...]`
    fn references(&mut self, node: &Node) -> Result<()> {
        self.printer.write("REFERENCES ");
        self.relation_name(required(node, "pktable")?)?;
        let pk_attrs = node.list("pk_attrs");
        if !pk_attrs.is_empty() {
            self.printer.write(" ");
            self.ident_list(&pk_attrs)?;
        }
        match node.tag("fk_matchtype") {
            "f" => self.printer.write(" MATCH FULL"),
            "p" => self.printer.write(" MATCH PARTIAL"),
            _ => {}
        }
        if let Some(action) = rules::fk_action(node.tag("fk_del_action")) {
            self.printer.write(&format!(" ON DELETE {action}"));
        }
        if let Some(action) = rules::fk_action(node.tag("fk_upd_action")) {
            self.printer.write(&format!(" ON UPDATE {action}"));
        }
        Ok(())
    }

    pub(super) fn format_create_index(&mut self, node: &Node) -> Result<()> {
        if !node.list("options").is_empty() || node.str("table_space").is_some() {
            return self.deparse_fallback(node);
        }
        self.printer.write("CREATE ");
        if node.flag("unique") {
            self.printer.write("UNIQUE ");
        }
        self.printer.write("INDEX ");
        if node.flag("concurrent") {
            self.printer.write("CONCURRENTLY ");
        }
        if node.flag("if_not_exists") {
            self.printer.write("IF NOT EXISTS ");
        }
        if let Some(name) = node.str("idxname") {
            self.write_ident(name)?;
            self.printer.write(" ");
        }
        self.printer.write("ON ");
        self.visit(required(node, "relation")?)?;
        if let Some(method) = node.str("access_method").filter(|m| *m != "btree") {
            self.printer.write(" USING ");
            self.write_ident(method)?;
        }
        self.printer.write(" (");
        self.inline_list(&node.list("index_params"))?;
        self.printer.write(")");
        let including = node.list("index_including_params");
        if !including.is_empty() {
            self.printer.write(" INCLUDE (");
            self.inline_list(&including)?;
            self.printer.write(")");
        }
        if node.flag("nulls_not_distinct") {
            self.printer.write(" NULLS NOT DISTINCT");
        }
        if let Some(filter) = node.child("where_clause") {
            self.filter_clause("WHERE", filter)?;
        }
        Ok(())
    }

    pub(super) fn format_index_elem(&mut self, node: &Node) -> Result<()> {
        self.index_column(node)?;
        self.collation_and_opclass(node)?;
        match node.tag("ordering") {
            "SORTBY_ASC" => self.printer.write(" ASC"),
            "SORTBY_DESC" => self.printer.write(" DESC"),
            _ => {}
        }
        match node.tag("nulls_ordering") {
            "SORTBY_NULLS_FIRST" => self.printer.write(" NULLS FIRST"),
            "SORTBY_NULLS_LAST" => self.printer.write(" NULLS LAST"),
            _ => {}
        }
        Ok(())
    }

    /// Column name, function call, or parenthesized expression of an index or
    /// partition key element
    fn index_column(&mut self, node: &Node) -> Result<()> {
        if let Some(name) = node.str("name") {
            return self.write_ident(name);
        }
        let expr = required(node, "expr")?;
        if expr.is(NodeKind::FuncCall) {
            self.visit(expr)
        } else {
            self.printer.write("(");
            self.visit(expr)?;
            self.printer.write(")");
            Ok(())
        }
    }

    fn collation_and_opclass(&mut self, node: &Node) -> Result<()> {
        let collation = node.list("collation");
        if !collation.is_empty() {
            let name = self.qualified_name(&collation)?;
            self.printer.write(&format!(" COLLATE {name}"));
        }
        let opclass = node.list("opclass");
        if !opclass.is_empty() {
            let name = self.qualified_name(&opclass)?;
            self.printer.write(&format!(" {name}"));
        }
        Ok(())
    }

    pub(super) fn format_create_view(&mut self, node: &Node) -> Result<()> {
        if !node.list("options").is_empty() {
            return self.deparse_fallback(node);
        }
        let view = required(node, "view")?;
        self.printer.write("CREATE ");
        if node.flag("replace") {
            self.printer.write("OR REPLACE ");
        }
        self.persistence(view);
        self.printer.write("VIEW ");
        self.relation_name(view)?;
        let aliases = node.list("aliases");
        if !aliases.is_empty() {
            self.printer.write(" ");
            self.ident_list(&aliases)?;
        }
        self.printer.write(" AS");
        self.printer.newline();
        self.visit(required(node, "query")?)?;
        match node.tag("with_check_option") {
            "LOCAL_CHECK_OPTION" => {
                self.printer.newline();
                self.printer.write("WITH LOCAL CHECK OPTION");
            }
            "CASCADED_CHECK_OPTION" => {
                self.printer.newline();
                self.printer.write("WITH CASCADED CHECK OPTION");
            }
            _ => {}
        }
        Ok(())
    }

    pub(super) fn format_alter_table(&mut self, node: &Node) -> Result<()> {
        let cmds = node.list("cmds");
        let object = rules::object_type(node.tag("objtype"));
        let Some(object) = object.filter(|_| cmds.iter().all(|cmd| alter_cmd_supported(cmd))) else {
            return self.deparse_fallback(node);
        };
        self.printer.write(&format!("ALTER {object} "));
        if node.flag("missing_ok") {
            self.printer.write("IF EXISTS ");
        }
        self.visit(required(node, "relation")?)?;
        for (i, cmd) in cmds.iter().copied().enumerate() {
            if i > 0 {
                self.printer.write(",");
            }
            self.printer.newline();
            self.printer.indent();
            self.alter_table_cmd(cmd)?;
            self.printer.dedent();
        }
        Ok(())
    }

    fn alter_table_cmd(&mut self, cmd: &Node) -> Result<()> {
        let column = cmd.str("name").unwrap_or_default();
        match cmd.tag("subtype") {
            "AT_AddColumn" => {
                self.printer.write("ADD COLUMN ");
                if cmd.flag("missing_ok") {
                    self.printer.write("IF NOT EXISTS ");
                }
                self.visit(required(cmd, "def")?)?;
            }
            "AT_DropColumn" => {
                self.printer.write("DROP COLUMN ");
                if cmd.flag("missing_ok") {
                    self.printer.write("IF EXISTS ");
                }
                self.write_ident(column)?;
                self.drop_behavior(cmd);
            }
            "AT_AlterColumnType" => {
                let def = required(cmd, "def")?;
                self.printer.write("ALTER COLUMN ");
                self.write_ident(column)?;
                self.printer.write(" TYPE ");
                self.visit(required(def, "type_name")?)?;
                if let Some(collation) = def.child("coll_clause") {
                    let name = self.qualified_name(&collation.list("collname"))?;
                    self.printer.write(&format!(" COLLATE {name}"));
                }
                if let Some(using) = def.child("raw_default") {
                    self.printer.write(" USING ");
                    self.visit(using)?;
                }
            }
            "AT_ColumnDefault" => {
                self.printer.write("ALTER COLUMN ");
                self.write_ident(column)?;
                match cmd.child("def") {
                    Some(default) => {
                        self.printer.write(" SET DEFAULT ");
                        self.restricted_operand(default)?;
                    }
                    None => self.printer.write(" DROP DEFAULT"),
                }
            }
            "AT_SetNotNull" => {
                self.printer.write("ALTER COLUMN ");
                self.write_ident(column)?;
                self.printer.write(" SET NOT NULL");
            }
            "AT_DropNotNull" => {
                self.printer.write("ALTER COLUMN ");
                self.write_ident(column)?;
                self.printer.write(" DROP NOT NULL");
            }
            "AT_AddConstraint" => {
                self.printer.write("ADD ");
                self.visit(required(cmd, "def")?)?;
            }
            "AT_DropConstraint" => {
                self.printer.write("DROP CONSTRAINT ");
                if cmd.flag("missing_ok") {
                    self.printer.write("IF EXISTS ");
                }
                self.write_ident(column)?;
                self.drop_behavior(cmd);
            }
            "AT_ChangeOwner" => {
                self.printer.write("OWNER TO ");
                self.visit(required(cmd, "newowner")?)?;
            }
            other => {
                return Err(Error::invalid_tree(format!("ALTER TABLE command {other} has no layout")));
            }
        }
        Ok(())
    }

    fn drop_behavior(&mut self, node: &Node) {
        // RESTRICT is the default and is left implicit
        if node.tag("behavior") == "DROP_CASCADE" {
            self.printer.write(" CASCADE");
        }
    }

    pub(super) fn format_drop(&mut self, node: &Node) -> Result<()> {
        let Some(object) = rules::object_type(node.tag("remove_type")) else {
            return self.deparse_fallback(node);
        };
        self.printer.write(&format!("DROP {object} "));
        if node.flag("concurrent") {
            self.printer.write("CONCURRENTLY ");
        }
        if node.flag("missing_ok") {
            self.printer.write("IF EXISTS ");
        }
        self.inline_list_with(&node.list("objects"), |f, object| {
            if object.is(NodeKind::List) {
                let name = f.qualified_name(&object.list("items"))?;
                f.printer.write(&name);
                Ok(())
            } else {
                f.ident_or_visit(object)
            }
        })?;
        self.drop_behavior(node);
        Ok(())
    }

    pub(super) fn format_object_with_args(&mut self, node: &Node) -> Result<()> {
        let name = self.qualified_name(&node.list("objname"))?;
        self.printer.write(&name);
        if !node.flag("args_unspecified") {
            self.printer.write("(");
            self.inline_list(&node.list("objargs"))?;
            self.printer.write(")");
        }
        Ok(())
    }

    pub(super) fn format_role_spec(&mut self, node: &Node) -> Result<()> {
        match node.tag("roletype") {
            "ROLESPEC_CURRENT_ROLE" => self.printer.write("CURRENT_ROLE"),
            "ROLESPEC_CURRENT_USER" => self.printer.write("CURRENT_USER"),
            "ROLESPEC_SESSION_USER" => self.printer.write("SESSION_USER"),
            "ROLESPEC_PUBLIC" => self.printer.write("PUBLIC"),
            _ => {
                let name = node
                    .str("rolename")
                    .ok_or_else(|| Error::invalid_tree("RoleSpec without a name"))?;
                self.write_ident(name)?;
            }
        }
        Ok(())
    }
}

fn create_table_supported(node: &Node) -> bool {
    let plain_table = ["partbound", "of_typename"]
        .iter()
        .all(|field| node.child(field).is_none())
        && node.list("options").is_empty()
        && node.str("tablespacename").is_none()
        && node.str("access_method").is_none()
        && matches!(node.tag("oncommit"), "" | "ONCOMMIT_NOOP");
    plain_table
        && node
            .list("table_elts")
            .iter()
            .chain(node.list("constraints").iter())
            .all(|element| match element.kind() {
                NodeKind::ColumnDef => column_def_supported(element),
                NodeKind::Constraint => constraint_supported(element, false),
                _ => false,
            })
}

fn column_def_supported(node: &Node) -> bool {
    node.list("constraints")
        .iter()
        .all(|constraint| constraint_supported(constraint, true))
}

fn constraint_supported(node: &Node, on_column: bool) -> bool {
    let kind_supported = match node.tag("contype") {
        "CONSTR_CHECK" | "CONSTR_PRIMARY" | "CONSTR_UNIQUE" | "CONSTR_FOREIGN" => true,
        "CONSTR_NULL" | "CONSTR_NOTNULL" | "CONSTR_DEFAULT" | "CONSTR_IDENTITY"
        | "CONSTR_GENERATED" | "CONSTR_ATTR_DEFERRABLE" | "CONSTR_ATTR_NOT_DEFERRABLE"
        | "CONSTR_ATTR_DEFERRED" | "CONSTR_ATTR_IMMEDIATE" => on_column,
        _ => false,
    };
    // column constraints carry deferrability as separate entries
    let table_only = !on_column || !(node.flag("deferrable") || node.flag("initdeferred"));
    kind_supported
        && table_only
        && node.list("options").is_empty()
        && node.list("fk_del_set_cols").is_empty()
        && node.child("where_clause").is_none()
        && ["indexname", "indexspace", "access_method"]
            .iter()
            .all(|field| node.str(field).is_none())
}

fn alter_cmd_supported(cmd: &Node) -> bool {
    let def = cmd.child("def");
    match cmd.tag("subtype") {
        "AT_AddColumn" => def.is_some_and(|def| def.is(NodeKind::ColumnDef) && column_def_supported(def)),
        "AT_AlterColumnType" => def.is_some_and(|def| def.child("type_name").is_some()),
        "AT_AddConstraint" => def.is_some_and(|def| def.is(NodeKind::Constraint) && constraint_supported(def, false)),
        "AT_DropColumn" | "AT_ColumnDefault" | "AT_SetNotNull" | "AT_DropNotNull"
        | "AT_DropConstraint" => cmd.str("name").is_some(),
        "AT_ChangeOwner" => cmd.child("newowner").is_some(),
        _ => false,
    }
}
