//! Turn parsed arguments into SQL text.

use crate::cli::{DeleteArgs, InsertArgs, JoinSpec, SearchArgs, SelectArgs, TargetArgs, UpdateArgs};
use anyhow::Context;
use condsql::{
    Condition, JoinCondition, PostProcess, Row, SearchRequest, SearchSchema, TableRef,
    build_delete, build_insert, build_select, build_update,
};
use serde_json::Value;
use std::path::Path;

const DEFAULT_SCHEMA_FILE: &str = "condsql.toml";

fn parse_json(flag: &str, raw: &str) -> anyhow::Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("{flag} is not valid JSON: {raw}"))
}

fn condition(raw: Option<&str>) -> anyhow::Result<Condition> {
    match raw {
        Some(raw) => Ok(Condition::from_json(&parse_json("--where", raw)?)?),
        None => Ok(Condition::Empty),
    }
}

fn row(flag: &str, raw: &str) -> anyhow::Result<Row> {
    Row::from_json(&parse_json(flag, raw)?).with_context(|| format!("invalid {flag}"))
}

fn target(args: &TargetArgs) -> anyhow::Result<TableRef> {
    let mut table = TableRef::new(args.table.as_str());
    for join in &args.joins {
        let condition = match &join.spec {
            JoinSpec::Natural => JoinCondition::Natural,
            JoinSpec::On(raw) => JoinCondition::from_json(&parse_json("--on", raw)?)?,
        };
        table = table
            .join(&TableRef::new(join.table.as_str()), &condition)
            .with_context(|| format!("cannot join {}", join.table))?;
    }
    Ok(table)
}

pub fn select(args: &SelectArgs) -> anyhow::Result<String> {
    let post_process = match &args.post_json {
        Some(raw) => PostProcess::from_json(&parse_json("--post", raw)?)?,
        None => PostProcess::new(),
    };
    Ok(build_select(
        &target(&args.target)?,
        &condition(args.where_json.as_deref())?,
        args.columns.as_slice(),
        &post_process,
    )?)
}

pub fn insert(args: &InsertArgs) -> anyhow::Result<String> {
    Ok(build_insert(
        &target(&args.target)?,
        &row("--row", &args.row_json)?,
    )?)
}

pub fn update(args: &UpdateArgs) -> anyhow::Result<String> {
    Ok(build_update(
        &target(&args.target)?,
        &condition(args.where_json.as_deref())?,
        &row("--set", &args.set_json)?,
    )?)
}

pub fn delete(args: &DeleteArgs) -> anyhow::Result<String> {
    Ok(build_delete(
        &target(&args.target)?,
        &condition(args.where_json.as_deref())?,
    )?)
}

fn load_schema(path: Option<&Path>) -> anyhow::Result<SearchSchema> {
    match path {
        Some(path) => Ok(SearchSchema::load(path)?),
        None if Path::new(DEFAULT_SCHEMA_FILE).is_file() => {
            Ok(SearchSchema::load(DEFAULT_SCHEMA_FILE)?)
        }
        None => {
            tracing::debug!("no {DEFAULT_SCHEMA_FILE} found, using the built-in search schema");
            Ok(SearchSchema::pet_shop())
        }
    }
}

pub fn search(args: &SearchArgs) -> anyhow::Result<String> {
    let schema = load_schema(args.schema.as_deref())?;

    let mut request = SearchRequest::new(args.keyword.as_str());
    if let Some(table) = &args.table {
        request = request.table(table.as_str());
    }
    if let Some(column) = &args.column {
        request = request.column(column.as_str());
    }
    if let Some(limit) = args.limit {
        request = request.limit(limit);
    }

    Ok(schema.plan(&request)?.to_sql()?)
}
