use sea_orm::{DatabaseBackend, Statement, Value};

/// Builder for the filtered listing queries. Filters contribute numbered
/// `$n` placeholders in the order they are pushed; the same builder yields
/// both the `COUNT(*)` statement and the ordered/paged data statement, so
/// the two always share one WHERE clause.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    base: String,
    conditions: Vec<String>,
    values: Vec<Value>,
}

impl SelectBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            conditions: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Appends `column = $n` for the next placeholder number.
    pub fn eq(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.push_filter(&format!("{column} = $?"), [value.into()])
    }

    /// Appends a condition template. Each `$?` marker consumes one value and
    /// is rewritten to the next placeholder number.
    pub fn push_filter<I>(&mut self, template: &str, params: I) -> &mut Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut rendered = template.to_string();
        for value in params {
            self.values.push(value);
            let n = self.values.len();
            rendered = rendered.replacen("$?", &format!("${n}"), 1);
        }
        self.conditions.push(rendered);
        self
    }

    /// Appends a condition that binds no parameters.
    pub fn push_condition(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    pub fn sql(&self) -> String {
        if self.conditions.is_empty() {
            self.base.clone()
        } else {
            format!("{} WHERE {}", self.base, self.conditions.join(" AND "))
        }
    }

    pub fn statement(&self) -> Statement {
        Statement::from_sql_and_values(DatabaseBackend::Postgres, self.sql(), self.values.clone())
    }

    /// Wraps the filtered query in `SELECT COUNT(*) FROM (...) AS subquery`.
    pub fn count_statement(&self) -> Statement {
        let sql = format!("SELECT COUNT(*) AS count FROM ({}) AS subquery", self.sql());
        Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, self.values.clone())
    }

    /// Data statement with ORDER BY, LIMIT and OFFSET appended. The limit and
    /// offset placeholders are numbered after the filter placeholders; values
    /// past `i64::MAX` are clamped rather than wrapped negative.
    pub fn page_statement(&self, order_by: &str, limit: u64, offset: u64) -> Statement {
        let mut values = self.values.clone();
        values.push(Value::from(i64::try_from(limit).unwrap_or(i64::MAX)));
        let limit_n = values.len();
        values.push(Value::from(i64::try_from(offset).unwrap_or(i64::MAX)));
        let offset_n = values.len();

        let sql = format!(
            "{} ORDER BY {} LIMIT ${} OFFSET ${}",
            self.sql(),
            order_by,
            limit_n,
            offset_n
        );
        Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filters() {
        let builder = SelectBuilder::new("SELECT o_id FROM order_table");
        assert_eq!(builder.sql(), "SELECT o_id FROM order_table");
        assert!(builder.statement().values.unwrap().0.is_empty());
    }

    #[test]
    fn test_placeholder_numbering() {
        let mut builder = SelectBuilder::new("SELECT * FROM history h");
        builder.eq("h.h_w_id", 1i64);
        builder.eq("h.h_d_id", 2i64);
        builder.eq("h.h_c_id", 3i64);

        assert_eq!(
            builder.sql(),
            "SELECT * FROM history h WHERE h.h_w_id = $1 AND h.h_d_id = $2 AND h.h_c_id = $3"
        );
    }

    #[test]
    fn test_multi_marker_filter_binds_each_value_once() {
        let mut builder = SelectBuilder::new("SELECT * FROM stock s JOIN item i ON i.i_id = s.s_i_id");
        builder.eq("s.s_w_id", 4i64);
        builder.push_filter(
            "(LOWER(i.i_name) LIKE LOWER($?) OR LOWER(i.i_data) LIKE LOWER($?))",
            [Value::from("%bolt%"), Value::from("%bolt%")],
        );

        let sql = builder.sql();
        assert!(sql.contains("s.s_w_id = $1"));
        assert!(sql.contains("LIKE LOWER($2) OR LOWER(i.i_data) LIKE LOWER($3)"));

        let values = builder.statement().values.unwrap().0;
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_raw_condition_binds_nothing() {
        let mut builder = SelectBuilder::new("SELECT * FROM order_table o");
        builder.push_condition("no.no_o_id IS NOT NULL");
        assert_eq!(
            builder.sql(),
            "SELECT * FROM order_table o WHERE no.no_o_id IS NOT NULL"
        );
        assert!(builder.statement().values.unwrap().0.is_empty());
    }

    #[test]
    fn test_count_statement_wraps_filtered_query() {
        let mut builder = SelectBuilder::new("SELECT o_id FROM order_table o");
        builder.eq("o.o_w_id", 7i64);

        let stmt = builder.count_statement();
        assert_eq!(
            stmt.sql,
            "SELECT COUNT(*) AS count FROM (SELECT o_id FROM order_table o WHERE o.o_w_id = $1) AS subquery"
        );
        assert_eq!(stmt.values.unwrap().0.len(), 1);
    }

    #[test]
    fn test_page_statement_clamps_offset_past_i64_max() {
        let builder = SelectBuilder::new("SELECT o_id FROM order_table");
        let stmt = builder.page_statement("o_id ASC", 50, u64::MAX);

        let values = stmt.values.unwrap().0;
        assert_eq!(values[0], Value::from(50i64));
        assert_eq!(values[1], Value::from(i64::MAX));
    }

    #[test]
    fn test_page_statement_numbers_limit_and_offset_after_filters() {
        let mut builder = SelectBuilder::new("SELECT o_id FROM order_table o");
        builder.eq("o.o_w_id", 1i64);
        builder.eq("o.o_d_id", 2i64);

        let stmt = builder.page_statement("o.o_entry_d DESC", 50, 100);
        assert!(stmt.sql.ends_with("ORDER BY o.o_entry_d DESC LIMIT $3 OFFSET $4"));
        assert_eq!(stmt.values.unwrap().0.len(), 4);
    }
}
