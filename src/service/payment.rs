use crate::database::{connector, statement::SelectBuilder};
use crate::service::{customer_name, decimal_field, rejection};
use anyhow::Result;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};
use tracing::info;

pub struct PaymentService;

#[derive(Debug, Default, Clone)]
pub struct PaymentFilters {
    pub warehouse_id: Option<i64>,
    pub district_id: Option<i64>,
    pub customer_id: Option<i64>,
}

const PAYMENT_LIST_BASE: &str = "\
    SELECT h.h_w_id, h.h_d_id, h.h_c_id, h.h_amount, h.h_date, \
           c.c_first, c.c_middle, c.c_last, \
           w.w_name AS warehouse_name, d.d_name AS district_name \
    FROM history h \
    JOIN customer c ON c.c_w_id = h.h_w_id AND c.c_d_id = h.h_d_id AND c.c_id = h.h_c_id \
    JOIN warehouse w ON w.w_id = h.h_w_id \
    JOIN district d ON d.d_w_id = h.h_w_id AND d.d_id = h.h_d_id";

fn payment_list_builder(filters: &PaymentFilters) -> SelectBuilder {
    let mut builder = SelectBuilder::new(PAYMENT_LIST_BASE);
    if let Some(w) = filters.warehouse_id {
        builder.eq("h.h_w_id", w);
    }
    if let Some(d) = filters.district_id {
        builder.eq("h.h_d_id", d);
    }
    if let Some(c) = filters.customer_id {
        builder.eq("h.h_c_id", c);
    }
    builder
}

impl PaymentService {
    /// TPC-C Payment. Reads warehouse, district and customer, computes the
    /// post-payment figures, commits nothing.
    pub async fn execute_payment(
        warehouse_id: i64,
        district_id: i64,
        customer_id: i64,
        amount: Decimal,
    ) -> Result<JsonValue> {
        info!(
            "Starting Payment transaction: w_id={}, d_id={}, c_id={}, amount={}",
            warehouse_id, district_id, customer_id, amount
        );

        if amount <= Decimal::ZERO {
            return Ok(rejection("Payment amount must be positive"));
        }

        let warehouses = connector::execute_query(
            "SELECT w_name, w_ytd FROM warehouse WHERE w_id = $1",
            vec![warehouse_id.into()],
        )
        .await?;
        let Some(warehouse) = warehouses.into_iter().next() else {
            return Ok(rejection("Warehouse not found"));
        };

        let districts = connector::execute_query(
            "SELECT d_name, d_ytd FROM district WHERE d_w_id = $1 AND d_id = $2",
            vec![warehouse_id.into(), district_id.into()],
        )
        .await?;
        let Some(district) = districts.into_iter().next() else {
            return Ok(rejection("District not found"));
        };

        let customers = connector::execute_query(
            "SELECT c_first, c_middle, c_last, c_credit, c_balance, c_ytd_payment, c_payment_cnt \
             FROM customer \
             WHERE c_w_id = $1 AND c_d_id = $2 AND c_id = $3",
            vec![warehouse_id.into(), district_id.into(), customer_id.into()],
        )
        .await?;
        let Some(customer) = customers.into_iter().next() else {
            return Ok(rejection("Customer not found"));
        };

        let balance = decimal_field(&customer, "c_balance")?;
        let ytd_payment = decimal_field(&customer, "c_ytd_payment")?;
        let new_balance = (balance - amount).round_dp(2);
        let new_ytd_payment = (ytd_payment + amount).round_dp(2);

        info!(
            "Payment of {} for customer {} would bring balance to {}",
            amount, customer_id, new_balance
        );

        Ok(json!({
            "success": true,
            "warehouse_id": warehouse_id,
            "district_id": district_id,
            "customer_id": customer_id,
            "customer_name": customer_name(&customer),
            "warehouse_name": warehouse.get("w_name").cloned().unwrap_or(JsonValue::Null),
            "district_name": district.get("d_name").cloned().unwrap_or(JsonValue::Null),
            "amount": amount.to_f64(),
            "new_balance": new_balance.to_f64(),
            "new_ytd_payment": new_ytd_payment.to_f64(),
            "message": "Payment processed successfully (simulated - no actual database changes)",
        }))
    }

    pub async fn get_payment_history_paginated(
        filters: &PaymentFilters,
        limit: u64,
        offset: u64,
    ) -> Result<JsonValue> {
        let builder = payment_list_builder(filters);
        let total_count = connector::fetch_count(builder.count_statement()).await?;
        let payments =
            connector::execute(builder.page_statement("h.h_date DESC", limit, offset)).await?;

        Ok(json!({
            "payments": payments,
            "total_count": total_count,
            "limit": limit,
            "offset": offset,
            "has_next": offset.saturating_add(limit) < total_count as u64,
            "has_prev": offset > 0,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_filters_in_push_order() {
        let filters = PaymentFilters {
            warehouse_id: Some(1),
            district_id: None,
            customer_id: Some(42),
        };
        let sql = payment_list_builder(&filters).sql();
        assert!(sql.contains("h.h_w_id = $1"));
        assert!(sql.contains("h.h_c_id = $2"));
        assert!(!sql.contains("h_d_id ="));
    }

    #[test]
    fn test_page_statement_orders_by_date() {
        let stmt = payment_list_builder(&PaymentFilters::default()).page_statement(
            "h.h_date DESC",
            50,
            0,
        );
        assert!(stmt.sql.contains("ORDER BY h.h_date DESC LIMIT $1 OFFSET $2"));
    }
}
