//! Statement assembly: INSERT / SELECT / UPDATE / DELETE.
//!
//! Every builder is a pure function from its inputs to one SQL string. Empty
//! clauses leave no trace in the output, so
//! ``SELECT * FROM `Pet` `` is produced rather than one with trailing spaces.
//!
//! Mutations on a joined (composite) table fail with
//! [`SqlError::WriteGuardViolation`] before any SQL is built.

use crate::condition::Condition;
use crate::error::{SqlError, SqlResult};
use crate::ident::{quote_list, write_identifier};
use crate::join::TableRef;
use crate::post_process::PostProcess;
use crate::value::Row;

fn guard_write(table: &TableRef, verb: &str) -> SqlResult<()> {
    if table.is_composite() {
        return Err(SqlError::write_guard(format!(
            "cannot {verb} a joined table: {}",
            table.name()
        )));
    }
    Ok(())
}

/// Join the non-empty segments with single spaces.
fn assemble(segments: &[&str]) -> String {
    let mut out = String::new();
    for segment in segments.iter().filter(|s| !s.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(segment);
    }
    out
}

fn log_statement(kind: &'static str, sql: &str) {
    tracing::debug!(target: "condsql.sql", kind, sql = %sql, "built statement");
}

/// `INSERT INTO `t`(`a`, `b`) VALUES (1, "x")`
pub fn build_insert(table: &TableRef, row: &Row) -> SqlResult<String> {
    guard_write(table, "insert into")?;
    if row.is_empty() {
        return Err(SqlError::schema("INSERT requires at least one column"));
    }

    let mut sql = String::from("INSERT INTO ");
    table.write_sql(&mut sql);
    sql.push('(');
    sql.push_str(&quote_list(row.columns()));
    sql.push_str(") VALUES (");
    for (i, value) in row.values().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        value.write_sql(&mut sql);
    }
    sql.push(')');

    log_statement("insert", &sql);
    Ok(sql)
}

/// `SELECT <cols|*> FROM <table> [WHERE ...] [ORDER BY ...] [LIMIT n] [OFFSET n]`
pub fn build_select<C: AsRef<str>>(
    table: &TableRef,
    condition: &Condition,
    columns: &[C],
    post_process: &PostProcess,
) -> SqlResult<String> {
    let where_clause = condition.to_where_clause()?;
    let projection = if columns.is_empty() {
        "*".to_string()
    } else {
        quote_list(columns.iter().map(AsRef::as_ref))
    };
    let head = format!("SELECT {projection} FROM {}", table.to_sql());

    let sql = assemble(&[&head, &where_clause, &post_process.to_sql()]);
    log_statement("select", &sql);
    Ok(sql)
}

/// `UPDATE <table> SET `a` = 1, `b` = "x" [WHERE ...]`
pub fn build_update(table: &TableRef, condition: &Condition, updates: &Row) -> SqlResult<String> {
    guard_write(table, "update")?;
    if updates.is_empty() {
        return Err(SqlError::schema("UPDATE requires at least one assignment"));
    }
    let where_clause = condition.to_where_clause()?;

    let mut head = String::from("UPDATE ");
    table.write_sql(&mut head);
    head.push_str(" SET ");
    for (i, (column, value)) in updates.iter().enumerate() {
        if i > 0 {
            head.push_str(", ");
        }
        write_identifier(&mut head, column);
        head.push_str(" = ");
        value.write_sql(&mut head);
    }

    let sql = assemble(&[&head, &where_clause]);
    log_statement("update", &sql);
    Ok(sql)
}

/// `DELETE FROM <table> [WHERE ...]`
pub fn build_delete(table: &TableRef, condition: &Condition) -> SqlResult<String> {
    guard_write(table, "delete from")?;
    let where_clause = condition.to_where_clause()?;
    let head = format!("DELETE FROM {}", table.to_sql());

    let sql = assemble(&[&head, &where_clause]);
    log_statement("delete", &sql);
    Ok(sql)
}

#[cfg(test)]
mod tests;
