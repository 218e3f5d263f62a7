//! The closed set of node kinds in the libpg_query (PostgreSQL 17) schema

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

macro_rules! node_kinds {
    (@name $variant:ident $name:literal) => {
        $name
    };
    (@name $variant:ident) => {
        stringify!($variant)
    };
    ($($variant:ident $(=> $name:literal)?),* $(,)?) => {
        /// Kind tag of an IR [`Node`](super::Node)
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $($variant,)*
        }

        impl NodeKind {
            /// Every kind, in schema order
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$variant,)*];

            /// Schema name, as used for wrapper keys in the engine's JSON
            pub fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$variant => node_kinds!(@name $variant $($name)?),)*
                }
            }
        }
    };
}

node_kinds! {
    ParseResult,
    Alias,
    RangeVar,
    TableFunc,
    IntoClause,
    Var,
    Param,
    Aggref,
    GroupingFunc,
    WindowFunc,
    WindowFuncRunCondition,
    MergeSupportFunc,
    SubscriptingRef,
    FuncExpr,
    NamedArgExpr,
    OpExpr,
    DistinctExpr,
    NullIfExpr,
    ScalarArrayOpExpr,
    BoolExpr,
    SubLink,
    SubPlan,
    AlternativeSubPlan,
    FieldSelect,
    FieldStore,
    RelabelType,
    CoerceViaIo => "CoerceViaIO",
    ArrayCoerceExpr,
    ConvertRowtypeExpr,
    CollateExpr,
    CaseExpr,
    CaseWhen,
    CaseTestExpr,
    ArrayExpr,
    RowExpr,
    RowCompareExpr,
    CoalesceExpr,
    MinMaxExpr,
    SqlValueFunction => "SQLValueFunction",
    XmlExpr,
    JsonFormat,
    JsonReturning,
    JsonValueExpr,
    JsonConstructorExpr,
    JsonIsPredicate,
    JsonBehavior,
    JsonExpr,
    JsonTablePath,
    JsonTablePathScan,
    JsonTableSiblingJoin,
    NullTest,
    BooleanTest,
    MergeAction,
    CoerceToDomain,
    CoerceToDomainValue,
    SetToDefault,
    CurrentOfExpr,
    NextValueExpr,
    InferenceElem,
    TargetEntry,
    RangeTblRef,
    JoinExpr,
    FromExpr,
    OnConflictExpr,
    Query,
    TypeName,
    ColumnRef,
    ParamRef,
    AExpr => "A_Expr",
    TypeCast,
    CollateClause,
    RoleSpec,
    FuncCall,
    AStar => "A_Star",
    AIndices => "A_Indices",
    AIndirection => "A_Indirection",
    AArrayExpr => "A_ArrayExpr",
    ResTarget,
    MultiAssignRef,
    SortBy,
    WindowDef,
    RangeSubselect,
    RangeFunction,
    RangeTableFunc,
    RangeTableFuncCol,
    RangeTableSample,
    ColumnDef,
    TableLikeClause,
    IndexElem,
    DefElem,
    LockingClause,
    XmlSerialize,
    PartitionElem,
    PartitionSpec,
    PartitionBoundSpec,
    PartitionRangeDatum,
    SinglePartitionSpec,
    PartitionCmd,
    RangeTblEntry,
    RtePermissionInfo => "RTEPermissionInfo",
    RangeTblFunction,
    TableSampleClause,
    WithCheckOption,
    SortGroupClause,
    GroupingSet,
    WindowClause,
    RowMarkClause,
    WithClause,
    InferClause,
    OnConflictClause,
    CteSearchClause => "CTESearchClause",
    CteCycleClause => "CTECycleClause",
    CommonTableExpr,
    MergeWhenClause,
    TriggerTransition,
    JsonOutput,
    JsonArgument,
    JsonFuncExpr,
    JsonTablePathSpec,
    JsonTable,
    JsonTableColumn,
    JsonKeyValue,
    JsonParseExpr,
    JsonScalarExpr,
    JsonSerializeExpr,
    JsonObjectConstructor,
    JsonArrayConstructor,
    JsonArrayQueryConstructor,
    JsonAggConstructor,
    JsonObjectAgg,
    JsonArrayAgg,
    RawStmt,
    InsertStmt,
    DeleteStmt,
    UpdateStmt,
    MergeStmt,
    SelectStmt,
    SetOperationStmt,
    ReturnStmt,
    PlAssignStmt => "PLAssignStmt",
    CreateSchemaStmt,
    AlterTableStmt,
    ReplicaIdentityStmt,
    AlterTableCmd,
    AlterCollationStmt,
    AlterDomainStmt,
    GrantStmt,
    ObjectWithArgs,
    AccessPriv,
    GrantRoleStmt,
    AlterDefaultPrivilegesStmt,
    CopyStmt,
    VariableSetStmt,
    VariableShowStmt,
    CreateStmt,
    Constraint,
    CreateTableSpaceStmt,
    DropTableSpaceStmt,
    AlterTableSpaceOptionsStmt,
    AlterTableMoveAllStmt,
    CreateExtensionStmt,
    AlterExtensionStmt,
    AlterExtensionContentsStmt,
    CreateFdwStmt,
    AlterFdwStmt,
    CreateForeignServerStmt,
    AlterForeignServerStmt,
    CreateForeignTableStmt,
    CreateUserMappingStmt,
    AlterUserMappingStmt,
    DropUserMappingStmt,
    ImportForeignSchemaStmt,
    CreatePolicyStmt,
    AlterPolicyStmt,
    CreateAmStmt,
    CreateTrigStmt,
    CreateEventTrigStmt,
    AlterEventTrigStmt,
    CreatePlangStmt => "CreatePLangStmt",
    CreateRoleStmt,
    AlterRoleStmt,
    AlterRoleSetStmt,
    DropRoleStmt,
    CreateSeqStmt,
    AlterSeqStmt,
    DefineStmt,
    CreateDomainStmt,
    CreateOpClassStmt,
    CreateOpClassItem,
    CreateOpFamilyStmt,
    AlterOpFamilyStmt,
    DropStmt,
    TruncateStmt,
    CommentStmt,
    SecLabelStmt,
    DeclareCursorStmt,
    ClosePortalStmt,
    FetchStmt,
    IndexStmt,
    CreateStatsStmt,
    StatsElem,
    AlterStatsStmt,
    CreateFunctionStmt,
    FunctionParameter,
    AlterFunctionStmt,
    DoStmt,
    InlineCodeBlock,
    CallStmt,
    CallContext,
    RenameStmt,
    AlterObjectDependsStmt,
    AlterObjectSchemaStmt,
    AlterOwnerStmt,
    AlterOperatorStmt,
    AlterTypeStmt,
    RuleStmt,
    NotifyStmt,
    ListenStmt,
    UnlistenStmt,
    TransactionStmt,
    CompositeTypeStmt,
    CreateEnumStmt,
    CreateRangeStmt,
    AlterEnumStmt,
    ViewStmt,
    LoadStmt,
    CreatedbStmt,
    AlterDatabaseStmt,
    AlterDatabaseRefreshCollStmt,
    AlterDatabaseSetStmt,
    DropdbStmt,
    AlterSystemStmt,
    ClusterStmt,
    VacuumStmt,
    VacuumRelation,
    ExplainStmt,
    CreateTableAsStmt,
    RefreshMatViewStmt,
    CheckPointStmt,
    DiscardStmt,
    LockStmt,
    ConstraintsSetStmt,
    ReindexStmt,
    CreateConversionStmt,
    CreateCastStmt,
    CreateTransformStmt,
    PrepareStmt,
    ExecuteStmt,
    DeallocateStmt,
    DropOwnedStmt,
    ReassignOwnedStmt,
    AlterTsDictionaryStmt => "AlterTSDictionaryStmt",
    AlterTsConfigurationStmt => "AlterTSConfigurationStmt",
    PublicationTable,
    PublicationObjSpec,
    CreatePublicationStmt,
    AlterPublicationStmt,
    CreateSubscriptionStmt,
    AlterSubscriptionStmt,
    DropSubscriptionStmt,
    Integer,
    Float,
    Boolean,
    String,
    BitString,
    List,
    IntList,
    OidList,
    AConst => "A_Const",
}

static BY_NAME: Lazy<HashMap<&'static str, NodeKind>> =
    Lazy::new(|| NodeKind::ALL.iter().map(|kind| (kind.name(), *kind)).collect());

impl NodeKind {
    /// Look up a kind by its schema name
    pub fn from_name(name: &str) -> Option<NodeKind> {
        BY_NAME.get(name).copied()
    }

    /// True for the scalar value kinds (`Integer`, `Float`, `Boolean`, `String`, `BitString`)
    pub fn is_value(self) -> bool {
        matches!(
            self,
            NodeKind::Integer | NodeKind::Float | NodeKind::Boolean | NodeKind::String | NodeKind::BitString
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
