//! libpg_query JSON codec
//!
//! Wrapper slots arrive as `{"Kind": {...}}` (or `{}` when empty). Fields whose schema
//! type is a fixed message are bare objects; their kind comes from [`bare_slot`]. Keys
//! are normalized to snake_case on the way in and written as lowerCamelCase on the way
//! out, which is what the protobuf JSON mapping produces.

use serde_json::{Map, Number, Value as Json};

use super::{Field, Node, NodeKind, Value};
use crate::error::{Error, Result};

/// Kind of a bare (non-wrapper) message field, if `field` of `parent` is one
///
/// Field names shared by several messages are matched per parent first, because the
/// same name is a fixed message in one place and a `Node` slot in another.
pub fn bare_slot(parent: NodeKind, field: &str) -> Option<NodeKind> {
    use NodeKind as K;

    match (parent, field) {
        // fields whose type depends on the parent
        (K::SelectStmt, "larg" | "rarg") => Some(K::SelectStmt),
        (K::PlAssignStmt, "val") => Some(K::SelectStmt),
        (K::JsonArgument, "val") => Some(K::JsonValueExpr),
        (K::JsonKeyValue, "value") => Some(K::JsonValueExpr),
        (K::JsonParseExpr | K::JsonSerializeExpr, "expr") => Some(K::JsonValueExpr),
        (K::JsonObjectAgg, "arg") => Some(K::JsonKeyValue),
        (K::JsonArrayAgg, "arg") => Some(K::JsonValueExpr),
        (K::JsonTable | K::JsonTableColumn, "pathspec") => Some(K::JsonTablePathSpec),
        (K::JsonTablePathScan, "path") => Some(K::JsonTablePath),
        (K::CallStmt, "funccall") => Some(K::FuncCall),
        (K::CallStmt, "funcexpr") => Some(K::FuncExpr),
        (K::PartitionCmd, "name") => Some(K::RangeVar),
        (K::CreateOpClassItem, "name") => Some(K::ObjectWithArgs),
        (K::RangeTblEntry, "subquery") => Some(K::Query),
        (K::RangeTableSample, "relation") => None,
        (K::AlterDomainStmt, "type_name") => None,
        (K::JsonConstructorExpr, "func") => None,
        // fields that are the same message wherever they appear
        (_, "alias" | "eref" | "join_using_alias") => Some(K::Alias),
        (_, "relation" | "view" | "sequence" | "pktable" | "identity_sequence") => Some(K::RangeVar),
        (_, "rel" | "table" | "typevar" | "constrrel") => Some(K::RangeVar),
        (_, "into_clause" | "into") => Some(K::IntoClause),
        (_, "type_name" | "arg_type" | "return_type" | "of_typename") => Some(K::TypeName),
        (_, "sourcetype" | "targettype" | "datatype" | "storedtype") => Some(K::TypeName),
        (_, "with_clause") => Some(K::WithClause),
        (_, "on_conflict_clause") => Some(K::OnConflictClause),
        (_, "on_conflict") => Some(K::OnConflictExpr),
        (_, "jointree") => Some(K::FromExpr),
        (_, "tablesample") => Some(K::TableSampleClause),
        (_, "tablefunc") => Some(K::TableFunc),
        (_, "infer") => Some(K::InferClause),
        (_, "over") => Some(K::WindowDef),
        (_, "coll_clause") => Some(K::CollateClause),
        (_, "ival") => Some(K::Integer),
        (_, "fval") => Some(K::Float),
        (_, "boolval") => Some(K::Boolean),
        (_, "sval" | "extname") => Some(K::String),
        (_, "bsval") => Some(K::BitString),
        (_, "stmts") => Some(K::RawStmt),
        (_, "role" | "newowner" | "authrole" | "owner") => Some(K::RoleSpec),
        (_, "grantor" | "newrole" | "user") => Some(K::RoleSpec),
        (_, "action") => Some(K::GrantStmt),
        (_, "base") => Some(K::CreateStmt),
        (_, "setstmt") => Some(K::VariableSetStmt),
        (_, "partspec") => Some(K::PartitionSpec),
        (_, "partbound" | "bound") => Some(K::PartitionBoundSpec),
        (_, "search_clause") => Some(K::CteSearchClause),
        (_, "cycle_clause") => Some(K::CteCycleClause),
        (_, "func" | "opername" | "fromsql" | "tosql") => Some(K::ObjectWithArgs),
        (_, "pubtable") => Some(K::PublicationTable),
        (_, "format") => Some(K::JsonFormat),
        (_, "returning") => Some(K::JsonReturning),
        (_, "output") => Some(K::JsonOutput),
        (_, "context_item") => Some(K::JsonValueExpr),
        (_, "constructor") => Some(K::JsonAggConstructor),
        (_, "on_empty" | "on_error") => Some(K::JsonBehavior),
        _ => None,
    }
}

/// Decode the root object of a parse result
pub fn decode_root(value: &Json) -> Result<Node> {
    let obj = as_object(value, "<root>")?;
    // accept an explicit {"ParseResult": {...}} wrapper too
    if let Some((kind, inner)) = wrapper_of(obj) {
        return decode_fields(kind, inner);
    }
    decode_fields(NodeKind::ParseResult, obj)
}

/// Decode a wrapper slot; `Ok(None)` for an empty wrapper
pub fn decode_wrapped(value: &Json, field: &str) -> Result<Option<Node>> {
    let obj = as_object(value, field)?;
    if obj.is_empty() {
        return Ok(None);
    }
    match wrapper_of(obj) {
        Some((kind, inner)) => decode_fields(kind, inner).map(Some),
        None => Err(Error::invalid_tree(format!(
            "field `{field}`: expected a node wrapper, found keys {:?}",
            obj.keys().collect::<Vec<_>>()
        ))),
    }
}

fn decode_bare(kind: NodeKind, value: &Json, field: &str) -> Result<Node> {
    let obj = as_object(value, field)?;
    match wrapper_of(obj) {
        Some((inner_kind, inner)) => decode_fields(inner_kind, inner),
        None => decode_fields(kind, obj),
    }
}

fn decode_slot(parent: NodeKind, field: &str, value: &Json) -> Result<Option<Node>> {
    match bare_slot(parent, field) {
        Some(kind) => decode_bare(kind, value, field).map(Some),
        None => decode_wrapped(value, field),
    }
}

fn decode_fields(kind: NodeKind, obj: &Map<String, Json>) -> Result<Node> {
    let mut fields = Vec::with_capacity(obj.len());
    for (key, raw) in obj {
        let name = to_snake_case(key);
        let value = match raw {
            Json::Null => continue,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => {
                if items.is_empty() {
                    continue;
                }
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    if !item.is_object() {
                        return Err(Error::invalid_tree(format!(
                            "{kind}.{name}: scalar arrays are not part of the schema"
                        )));
                    }
                    list.push(decode_slot(kind, &name, item)?);
                }
                Value::List(list)
            }
            Json::Object(_) => match decode_slot(kind, &name, raw)? {
                Some(node) => Value::Node(Box::new(node)),
                None => continue,
            },
        };
        fields.push(Field { name, value });
    }
    Ok(Node { kind, fields })
}

fn as_object<'a>(value: &'a Json, field: &str) -> Result<&'a Map<String, Json>> {
    value
        .as_object()
        .ok_or_else(|| Error::invalid_tree(format!("field `{field}`: expected an object")))
}

/// A single PascalCase kind key holding an object
fn wrapper_of(obj: &Map<String, Json>) -> Option<(NodeKind, &Map<String, Json>)> {
    if obj.len() != 1 {
        return None;
    }
    let (key, inner) = obj.iter().next()?;
    let kind = NodeKind::from_name(key)?;
    Some((kind, inner.as_object()?))
}

/// Encode as `{"Kind": {...}}`
pub fn encode_wrapped(node: &Node) -> Json {
    let mut obj = Map::new();
    obj.insert(node.kind().name().to_string(), encode_fields(node));
    Json::Object(obj)
}

/// Encode the fields of `node` as a bare object
pub fn encode_fields(node: &Node) -> Json {
    let mut obj = Map::new();
    for field in node.fields() {
        let bare = bare_slot(node.kind(), &field.name).is_some();
        let value = match &field.value {
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::Number((*i).into()),
            Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Str(s) => Json::String(s.clone()),
            Value::Node(child) => encode_slot(child, bare),
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Some(child) => encode_slot(child, bare),
                        None => Json::Object(Map::new()),
                    })
                    .collect(),
            ),
        };
        obj.insert(to_camel_case(&field.name), value);
    }
    Json::Object(obj)
}

fn encode_slot(node: &Node, bare: bool) -> Json {
    if bare {
        encode_fields(node)
    } else {
        encode_wrapped(node)
    }
}

/// `targetList` -> `target_list`; snake_case input is returned unchanged
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// `target_list` -> `targetList`
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.push(ch.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
