//! # condsql
//!
//! Compile document-style query conditions into MySQL statements.
//!
//! ## Features
//!
//! - **Document conditions**: `{"$and": [{"$or": [{"a": 1}, {"a": 2}]}, {"b": {"$gt": 5}}]}`
//!   becomes ``WHERE ((`a` = 1) OR (`a` = 2)) AND (`b` > 5)``
//! - **Post-processing**: `$sort`, `$limit` and `$offset` become `ORDER BY`,
//!   `LIMIT` and `OFFSET`
//! - **Joins**: equality and natural joins compose into read-only table expressions
//! - **Write guard**: INSERT, UPDATE and DELETE refuse joined tables
//! - **Keyword search**: plan searches over configured columns
//! - **Execution monitoring**: timing, statistics, logging and timeouts around any executor
//!
//! Values are embedded as literals. Strings are written the way a JSON
//! serializer writes them (double-quoted, backslash escapes). Identifiers are
//! wrapped in backticks without escaping.
//!
//! ## Example
//!
//! ```
//! use condsql::{Condition, PostProcess, TableRef, build_select};
//! use serde_json::json;
//!
//! let condition = Condition::from_json(&json!({"sex": "F", "height": {"$gt": 30}}))?;
//! let sql = build_select(
//!     &TableRef::new("Pet"),
//!     &condition,
//!     &["name"],
//!     &PostProcess::new().sort_desc("height").limit(3),
//! )?;
//! assert_eq!(
//!     sql,
//!     "SELECT `name` FROM `Pet` WHERE (`sex` = \"F\") AND (`height` > 30) \
//!      ORDER BY `height` DESC LIMIT 3"
//! );
//! # Ok::<(), condsql::SqlError>(())
//! ```

pub mod client;
pub mod condition;
pub mod error;
pub mod ident;
pub mod join;
pub mod monitor;
pub mod post_process;
pub mod search;
pub mod statement;
pub mod table;
pub mod value;

pub use client::Executor;
pub use condition::{Condition, Leaf, MAX_CONDITION_DEPTH, Op, translate};
pub use error::{SqlError, SqlResult};
pub use ident::quote_identifier;
pub use join::{JoinCondition, TableRef};
pub use monitor::{
    InstrumentedClient, LoggingMonitor, QueryMonitor, StatementKind, StatementStats, StatsMonitor,
};
pub use post_process::{PostProcess, SortDirection};
pub use search::{SearchPlan, SearchRequest, SearchSchema, SearchTable};
pub use statement::{build_delete, build_insert, build_select, build_update};
pub use table::{Database, Table};
pub use value::{Record, Row, Scalar, Value, serialize_value};
