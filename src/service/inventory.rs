use crate::database::{connector, statement::SelectBuilder};
use anyhow::Result;
use sea_orm::Value;
use serde_json::{json, Value as JsonValue};

pub struct InventoryService;

#[derive(Debug, Default, Clone)]
pub struct InventoryFilters {
    pub warehouse_id: Option<i64>,
    /// Strictly-below cut, only applied when given.
    pub low_stock_threshold: Option<i64>,
    pub item_search: Option<String>,
}

const INVENTORY_LIST_BASE: &str = "\
    SELECT s.s_i_id, s.s_w_id, s.s_quantity, s.s_ytd, s.s_order_cnt, s.s_remote_cnt, \
           i.i_name, i.i_price, i.i_data, \
           w.w_name \
    FROM stock s \
    JOIN item i ON i.i_id = s.s_i_id \
    JOIN warehouse w ON w.w_id = s.s_w_id";

fn inventory_list_builder(filters: &InventoryFilters) -> SelectBuilder {
    let mut builder = SelectBuilder::new(INVENTORY_LIST_BASE);
    if let Some(w) = filters.warehouse_id {
        builder.eq("s.s_w_id", w);
    }
    if let Some(threshold) = filters.low_stock_threshold {
        builder.push_filter("s.s_quantity < $?", [Value::from(threshold)]);
    }
    if let Some(search) = filters.item_search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        builder.push_filter(
            "(LOWER(i.i_name) LIKE LOWER($?) OR LOWER(i.i_data) LIKE LOWER($?))",
            [Value::from(pattern.clone()), Value::from(pattern)],
        );
    }
    builder
}

impl InventoryService {
    pub async fn get_inventory_paginated(
        filters: &InventoryFilters,
        limit: u64,
        offset: u64,
    ) -> Result<JsonValue> {
        let builder = inventory_list_builder(filters);
        let total_count = connector::fetch_count(builder.count_statement()).await?;
        let inventory =
            connector::execute(builder.page_statement("s.s_quantity ASC", limit, offset)).await?;

        Ok(json!({
            "inventory": inventory,
            "total_count": total_count,
            "limit": limit,
            "offset": offset,
            "has_next": offset.saturating_add(limit) < total_count as u64,
            "has_prev": offset > 0,
        }))
    }

    /// TPC-C Stock Level: distinct low-stock items touched by the district's
    /// last 20 orders.
    pub async fn get_stock_level(
        warehouse_id: i64,
        district_id: i64,
        threshold: i64,
    ) -> Result<JsonValue> {
        let low_stock_count = connector::count(
            "SELECT COUNT(*) AS low_stock_count \
             FROM stock s \
             JOIN order_line ol ON ol.ol_i_id = s.s_i_id AND ol.ol_w_id = s.s_w_id \
             JOIN order_table o ON o.o_id = ol.ol_o_id AND o.o_w_id = ol.ol_w_id AND o.o_d_id = ol.ol_d_id \
             WHERE s.s_w_id = $1 \
               AND o.o_d_id = $2 \
               AND o.o_id >= (SELECT d_next_o_id - 20 FROM district WHERE d_w_id = $1 AND d_id = $2) \
               AND o.o_id < (SELECT d_next_o_id FROM district WHERE d_w_id = $1 AND d_id = $2) \
               AND s.s_quantity < $3",
            vec![warehouse_id.into(), district_id.into(), threshold.into()],
        )
        .await?;

        Ok(json!({
            "success": true,
            "warehouse_id": warehouse_id,
            "district_id": district_id,
            "threshold": threshold,
            "low_stock_count": low_stock_count,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_without_filters_has_no_where() {
        let builder = inventory_list_builder(&InventoryFilters::default());
        assert!(!builder.sql().contains("WHERE"));
    }

    #[test]
    fn test_threshold_only_applied_when_given() {
        let filters = InventoryFilters {
            low_stock_threshold: Some(10),
            ..Default::default()
        };
        let sql = inventory_list_builder(&filters).sql();
        assert!(sql.contains("s.s_quantity < $1"));

        let none = inventory_list_builder(&InventoryFilters::default()).sql();
        assert!(!none.contains("s_quantity <"));
    }

    #[test]
    fn test_search_binds_pattern_to_both_markers() {
        let filters = InventoryFilters {
            warehouse_id: Some(3),
            item_search: Some("bolt".to_string()),
            ..Default::default()
        };
        let builder = inventory_list_builder(&filters);
        let sql = builder.sql();
        assert!(sql.contains("s.s_w_id = $1"));
        assert!(sql.contains("LOWER(i.i_name) LIKE LOWER($2)"));
        assert!(sql.contains("LOWER(i.i_data) LIKE LOWER($3)"));
        assert_eq!(builder.statement().values.unwrap().0.len(), 3);
    }

    #[test]
    fn test_empty_search_is_ignored() {
        let filters = InventoryFilters {
            item_search: Some(String::new()),
            ..Default::default()
        };
        assert!(!inventory_list_builder(&filters).sql().contains("LIKE"));
    }
}
