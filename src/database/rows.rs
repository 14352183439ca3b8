use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{FromQueryResult, QueryResult};
use serde_json::{json, Map, Value as JsonValue};

/// Converts raw query results into JSON objects. Column names come from
/// driver metadata when the backend exposes them; otherwise they are
/// inferred from the SELECT clause.
pub fn rows_to_objects(rows: &[QueryResult], sql: &str) -> Vec<JsonValue> {
    rows.iter().map(|row| row_to_object(row, sql)).collect()
}

pub fn row_to_object(row: &QueryResult, sql: &str) -> JsonValue {
    if let Ok(value @ JsonValue::Object(_)) = JsonValue::from_query_result(row, "") {
        return value;
    }

    // Metadata unavailable, fall back to positional extraction with names
    // parsed out of the query text.
    let names = infer_column_names(sql);
    let mut object = Map::with_capacity(names.len());
    for (idx, name) in names.iter().enumerate() {
        object.insert(name.clone(), value_at(row, idx));
    }
    JsonValue::Object(object)
}

/// Best-effort column names for a SELECT statement: honors `AS` aliases,
/// strips table prefixes, maps `COUNT(*)` to `count`, and falls back to
/// `col_<i>` for anything else it cannot name.
pub fn infer_column_names(sql: &str) -> Vec<String> {
    let Some(select_list) = select_list(sql) else {
        return Vec::new();
    };

    split_top_level(&select_list)
        .iter()
        .enumerate()
        .map(|(i, expr)| column_name(expr, i))
        .collect()
}

fn column_name(expr: &str, index: usize) -> String {
    let expr = expr.trim();

    if let Some(alias) = trailing_alias(expr) {
        return alias;
    }

    if expr.contains('(') {
        if expr.to_uppercase().starts_with("COUNT(") {
            return "count".to_string();
        }
        return format!("col_{index}");
    }

    match expr.rsplit_once('.') {
        Some((_, column)) => column.trim().to_string(),
        None => expr.to_string(),
    }
}

/// Alias from `expr AS alias`, matched at the end of the expression only.
/// The bare `expr alias` form is not recognized; the queries here always
/// spell out `AS`.
fn trailing_alias(expr: &str) -> Option<String> {
    let upper = expr.to_uppercase();
    let pos = upper.rfind(" AS ")?;
    let alias = expr[pos + 4..].trim();
    if alias.is_empty() || alias.contains('(') {
        None
    } else {
        Some(alias.to_string())
    }
}

fn select_list(sql: &str) -> Option<String> {
    let upper = sql.to_uppercase();
    let select = upper.find("SELECT")? + "SELECT".len();

    // First FROM outside any parentheses after the SELECT keyword.
    let mut depth = 0usize;
    let bytes = upper.as_bytes();
    let mut i = select;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'F' if depth == 0 && upper[i..].starts_with("FROM") => {
                return Some(sql[select..i].trim().to_string());
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn split_top_level(list: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in list.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Probes column types in descending order of likelihood for this schema.
fn value_at(row: &QueryResult, idx: usize) -> JsonValue {
    if let Ok(v) = row.try_get_by::<Option<i64>, _>(idx) {
        return v.map(|n| json!(n)).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get_by::<Option<Decimal>, _>(idx) {
        return v
            .map(|d| d.to_f64().map(|f| json!(f)).unwrap_or_else(|| json!(d.to_string())))
            .unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get_by::<Option<f64>, _>(idx) {
        return v.map(|f| json!(f)).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get_by::<Option<bool>, _>(idx) {
        return v.map(|b| json!(b)).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get_by::<Option<DateTime<Utc>>, _>(idx) {
        return v.map(|t| json!(t.to_rfc3339())).unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get_by::<Option<NaiveDateTime>, _>(idx) {
        return v
            .map(|t| json!(t.format("%Y-%m-%dT%H:%M:%S%.f").to_string()))
            .unwrap_or(JsonValue::Null);
    }
    if let Ok(v) = row.try_get_by::<Option<String>, _>(idx) {
        return v.map(JsonValue::String).unwrap_or(JsonValue::Null);
    }
    JsonValue::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_columns() {
        let names = infer_column_names("SELECT w_id, w_name FROM warehouse");
        assert_eq!(names, vec!["w_id", "w_name"]);
    }

    #[test]
    fn test_table_prefixes_are_stripped() {
        let names = infer_column_names("SELECT o.o_id, c.c_first FROM order_table o");
        assert_eq!(names, vec!["o_id", "c_first"]);
    }

    #[test]
    fn test_aliases_win_over_prefixes() {
        let names =
            infer_column_names("SELECT w.w_name AS warehouse_name, d.d_name as district_name FROM x");
        assert_eq!(names, vec!["warehouse_name", "district_name"]);
    }

    #[test]
    fn test_count_star() {
        let names = infer_column_names("SELECT COUNT(*) FROM customer");
        assert_eq!(names, vec!["count"]);
    }

    #[test]
    fn test_aliased_aggregate() {
        let names = infer_column_names("SELECT COUNT(*) AS order_count, MIN(o_entry_d) AS first_order FROM order_table");
        assert_eq!(names, vec!["order_count", "first_order"]);
    }

    #[test]
    fn test_unaliased_function_gets_positional_name() {
        let names = infer_column_names("SELECT o_id, SUM(ol_amount) FROM order_line");
        assert_eq!(names, vec!["o_id", "col_1"]);
    }

    #[test]
    fn test_case_expression_with_alias() {
        let names = infer_column_names(
            "SELECT o.o_id, CASE WHEN no.no_o_id IS NOT NULL THEN 'New' ELSE 'Delivered' END AS status FROM order_table o",
        );
        assert_eq!(names, vec!["o_id", "status"]);
    }

    #[test]
    fn test_from_inside_function_is_ignored() {
        // The commas and FROM-lookalikes inside parens must not end the list.
        let names = infer_column_names("SELECT COALESCE(MAX(o_id), 0) AS next_order_id FROM order_table");
        assert_eq!(names, vec!["next_order_id"]);
    }

    #[test]
    fn test_no_from_clause() {
        assert!(infer_column_names("UPDATE x SET y = 1").is_empty());
    }
}
