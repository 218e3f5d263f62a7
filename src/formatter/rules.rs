//! Formatting rules
//!
//! The layout is fixed, not configurable:
//! - Keywords: uppercase
//! - Indentation: 2 spaces, clause bodies one level below their keyword
//! - Lists: one item per line, trailing commas
//! - Statements: terminated by `;` and separated by a blank line

/// One level of indentation
pub const INDENT: &str = "  ";

/// Appended to every formatted statement
pub const STATEMENT_TERMINATOR: &str = ";";

/// Placed between terminated statements
pub const STATEMENT_SEPARATOR: &str = "\n\n";

/// Identifiers matching this never need quoting unless they are reserved keywords
pub const SIMPLE_IDENT: &str = r"^[a-z_][a-z0-9_]*$";

/// Prefix of the scanner probe used to classify an identifier
pub const QUOTING_PROBE: &str = "SELECT ";

/// Built-in type names and their SQL spelling; anything else is emitted as written
pub const TYPE_MAP: &[(&str, &str)] = &[
    ("int4", "INTEGER"),
    ("int8", "BIGINT"),
    ("int2", "SMALLINT"),
    ("float4", "REAL"),
    ("float8", "DOUBLE PRECISION"),
    ("bool", "BOOLEAN"),
    ("varchar", "VARCHAR"),
    ("bpchar", "CHARACTER"),
    // the single-byte internal type; bare `char` would read back as bpchar
    ("char", "\"char\""),
    ("numeric", "NUMERIC"),
    ("text", "TEXT"),
    ("timestamp", "TIMESTAMP"),
    ("timestamptz", "TIMESTAMPTZ"),
    ("date", "DATE"),
    ("time", "TIME"),
    ("timetz", "TIMETZ"),
    ("interval", "INTERVAL"),
    ("uuid", "UUID"),
    ("json", "JSON"),
    ("jsonb", "JSONB"),
    ("bytea", "BYTEA"),
    ("xml", "XML"),
];

/// SQL spelling of a (schema-stripped) type name
pub fn type_name(name: &str) -> &str {
    TYPE_MAP
        .iter()
        .find(|(internal, _)| *internal == name)
        .map_or(name, |(_, sql)| *sql)
}

// Window frame option bits, from PostgreSQL's parsenodes.h
pub const FRAMEOPTION_NONDEFAULT: i64 = 0x00001;
pub const FRAMEOPTION_ROWS: i64 = 0x00004;
pub const FRAMEOPTION_GROUPS: i64 = 0x00008;
pub const FRAMEOPTION_BETWEEN: i64 = 0x00010;
pub const FRAMEOPTION_START_UNBOUNDED_PRECEDING: i64 = 0x00020;
pub const FRAMEOPTION_END_UNBOUNDED_PRECEDING: i64 = 0x00040;
pub const FRAMEOPTION_START_UNBOUNDED_FOLLOWING: i64 = 0x00080;
pub const FRAMEOPTION_END_UNBOUNDED_FOLLOWING: i64 = 0x00100;
pub const FRAMEOPTION_START_CURRENT_ROW: i64 = 0x00200;
pub const FRAMEOPTION_END_CURRENT_ROW: i64 = 0x00400;
pub const FRAMEOPTION_START_OFFSET_PRECEDING: i64 = 0x00800;
pub const FRAMEOPTION_END_OFFSET_PRECEDING: i64 = 0x01000;
pub const FRAMEOPTION_START_OFFSET_FOLLOWING: i64 = 0x02000;
pub const FRAMEOPTION_END_OFFSET_FOLLOWING: i64 = 0x04000;
pub const FRAMEOPTION_EXCLUDE_CURRENT_ROW: i64 = 0x08000;
pub const FRAMEOPTION_EXCLUDE_GROUP: i64 = 0x10000;
pub const FRAMEOPTION_EXCLUDE_TIES: i64 = 0x20000;

/// Keyword for a join type
pub fn join_keyword(jointype: &str) -> &'static str {
    match jointype {
        "JOIN_LEFT" => "LEFT JOIN",
        "JOIN_FULL" => "FULL JOIN",
        "JOIN_RIGHT" => "RIGHT JOIN",
        _ => "JOIN",
    }
}

/// Keyword for a locking clause strength
pub fn lock_strength(strength: &str) -> Option<&'static str> {
    match strength {
        "LCS_FORKEYSHARE" => Some("FOR KEY SHARE"),
        "LCS_FORSHARE" => Some("FOR SHARE"),
        "LCS_FORNOKEYUPDATE" => Some("FOR NO KEY UPDATE"),
        "LCS_FORUPDATE" => Some("FOR UPDATE"),
        _ => None,
    }
}

/// Object keyword for DROP and ALTER statements
pub fn object_type(objtype: &str) -> Option<&'static str> {
    match objtype {
        "OBJECT_TABLE" => Some("TABLE"),
        "OBJECT_INDEX" => Some("INDEX"),
        "OBJECT_VIEW" => Some("VIEW"),
        "OBJECT_MATVIEW" => Some("MATERIALIZED VIEW"),
        "OBJECT_SEQUENCE" => Some("SEQUENCE"),
        "OBJECT_FOREIGN_TABLE" => Some("FOREIGN TABLE"),
        "OBJECT_SCHEMA" => Some("SCHEMA"),
        "OBJECT_TYPE" => Some("TYPE"),
        "OBJECT_DOMAIN" => Some("DOMAIN"),
        "OBJECT_EXTENSION" => Some("EXTENSION"),
        "OBJECT_FUNCTION" => Some("FUNCTION"),
        "OBJECT_PROCEDURE" => Some("PROCEDURE"),
        _ => None,
    }
}

/// Referential action for a foreign key action code
pub fn fk_action(code: &str) -> Option<&'static str> {
    match code {
        "r" => Some("RESTRICT"),
        "c" => Some("CASCADE"),
        "n" => Some("SET NULL"),
        "d" => Some("SET DEFAULT"),
        _ => None,
    }
}

/// Keyword for a `SQLValueFunction` op
pub fn sql_value_function(op: &str) -> Option<&'static str> {
    match op {
        "SVFOP_CURRENT_DATE" => Some("CURRENT_DATE"),
        "SVFOP_CURRENT_TIME" | "SVFOP_CURRENT_TIME_N" => Some("CURRENT_TIME"),
        "SVFOP_CURRENT_TIMESTAMP" | "SVFOP_CURRENT_TIMESTAMP_N" => Some("CURRENT_TIMESTAMP"),
        "SVFOP_LOCALTIME" | "SVFOP_LOCALTIME_N" => Some("LOCALTIME"),
        "SVFOP_LOCALTIMESTAMP" | "SVFOP_LOCALTIMESTAMP_N" => Some("LOCALTIMESTAMP"),
        "SVFOP_CURRENT_ROLE" => Some("CURRENT_ROLE"),
        "SVFOP_CURRENT_USER" => Some("CURRENT_USER"),
        "SVFOP_USER" => Some("USER"),
        "SVFOP_SESSION_USER" => Some("SESSION_USER"),
        "SVFOP_CURRENT_CATALOG" => Some("CURRENT_CATALOG"),
        "SVFOP_CURRENT_SCHEMA" => Some("CURRENT_SCHEMA"),
        _ => None,
    }
}
