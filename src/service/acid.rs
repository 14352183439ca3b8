use crate::database::connector;
use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::time::Instant;
use tracing::{info, warn};

/// Read-only ACID sanity harness. These checks exercise snapshot reads
/// against the managed database; they are not genuine isolation or
/// durability verification.
pub struct AcidTests;

#[derive(Debug, Clone, Serialize)]
pub struct AcidTestReport {
    pub test: &'static str,
    pub passed: bool,
    pub elapsed_time: f64,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcidSummary {
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub success_rate: f64,
    pub duration_ms: u64,
    pub duration: String,
}

pub fn summarize(passed: &[bool], duration_ms: u64) -> AcidSummary {
    let total_tests = passed.len();
    let passed_tests = passed.iter().filter(|p| **p).count();
    AcidSummary {
        total_tests,
        passed_tests,
        failed_tests: total_tests - passed_tests,
        success_rate: if total_tests > 0 {
            (passed_tests as f64 / total_tests as f64) * 100.0
        } else {
            0.0
        },
        duration_ms,
        duration: format!("{duration_ms} ms"),
    }
}

fn report(
    test: &'static str,
    passed: bool,
    started: Instant,
    details: Option<String>,
    error: Option<String>,
) -> AcidTestReport {
    AcidTestReport {
        test,
        passed,
        elapsed_time: (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0,
        provider: connector::provider_name(),
        details,
        error,
    }
}

/// Tables the harness must be able to read before any check runs.
const REQUIRED_TABLES: [&str; 5] = [
    "warehouse",
    "district",
    "customer",
    "order_table",
    "order_line",
];

impl AcidTests {
    /// Verifies the tables the harness reads from are reachable.
    async fn setup() -> Result<usize> {
        let counts = connector::table_counts().await;
        let mut available = 0usize;

        for table in REQUIRED_TABLES {
            match counts.get(table) {
                Some(count) => {
                    info!("Table {} available with {} records", table, count);
                    available += 1;
                }
                None => warn!("Table {} not accessible", table),
            }
        }

        if available < 3 {
            return Err(crate::lined_err!(
                "Insufficient tables available for ACID testing"
            ));
        }
        Ok(available)
    }

    /// Consistent reads across several tables in one pass.
    pub async fn test_atomicity() -> AcidTestReport {
        info!("Testing Atomicity (All-or-Nothing)");
        let started = Instant::now();

        if let Err(e) = Self::setup().await {
            return report("Atomicity", false, started, None, Some(e.to_string()));
        }

        let reads = [
            connector::count("SELECT COUNT(*) AS count FROM warehouse", vec![]).await,
            connector::count("SELECT COUNT(*) AS count FROM customer", vec![]).await,
            connector::count("SELECT COUNT(*) AS count FROM order_table", vec![]).await,
        ];
        let passed = reads.iter().all(Result::is_ok);

        report(
            "Atomicity",
            passed,
            started,
            Some("Tested consistent reads across multiple tables".to_string()),
            None,
        )
    }

    /// Referential spot checks: district warehouse ids must exist in
    /// warehouse.
    pub async fn test_consistency() -> AcidTestReport {
        info!("Testing Consistency");
        let started = Instant::now();

        let district_warehouses =
            match connector::execute_query("SELECT DISTINCT d_w_id FROM district", vec![]).await {
                Ok(rows) => rows,
                Err(e) => {
                    return report("Consistency", false, started, None, Some(e.to_string()));
                }
            };

        if district_warehouses.is_empty() {
            return report(
                "Consistency",
                false,
                started,
                Some("No district data found".to_string()),
                None,
            );
        }

        let warehouse_ids: Vec<i64> = district_warehouses
            .iter()
            .filter_map(|row| super::field_i64(row, "d_w_id"))
            .collect();

        // First five ids are enough to catch a broken reference.
        let test_count = warehouse_ids.len().min(5);
        let mut passed_checks = 0usize;
        for w_id in warehouse_ids.iter().take(test_count) {
            let found = connector::execute_query(
                "SELECT w_id FROM warehouse WHERE w_id = $1",
                vec![(*w_id).into()],
            )
            .await
            .map(|rows| !rows.is_empty())
            .unwrap_or(false);
            if found {
                passed_checks += 1;
            } else {
                warn!("Warehouse {} not found in warehouse table", w_id);
            }
        }

        let passed = test_count > 0 && (passed_checks as f64) >= (test_count as f64) * 0.8;
        report(
            "Consistency",
            passed,
            started,
            Some(format!(
                "Tested referential integrity across tables - {passed_checks}/{test_count} warehouse checks passed"
            )),
            None,
        )
    }

    /// Three consecutive identical counts.
    pub async fn test_isolation() -> AcidTestReport {
        info!("Testing Isolation");
        let started = Instant::now();

        let mut counts = Vec::with_capacity(3);
        for _ in 0..3 {
            match connector::count("SELECT COUNT(*) AS count FROM customer", vec![]).await {
                Ok(count) => counts.push(count),
                Err(e) => {
                    return report("Isolation", false, started, None, Some(e.to_string()));
                }
            }
        }

        let passed = counts.len() == 3 && counts.windows(2).all(|w| w[0] == w[1]);
        report(
            "Isolation",
            passed,
            started,
            Some("Tested consistent reads under concurrent access".to_string()),
            None,
        )
    }

    /// Data remains readable across operations.
    pub async fn test_durability() -> AcidTestReport {
        info!("Testing Durability");
        let started = Instant::now();

        let warehouse = connector::count("SELECT COUNT(*) AS count FROM warehouse", vec![]).await;
        let customer = connector::count("SELECT COUNT(*) AS count FROM customer", vec![]).await;
        let passed = warehouse.is_ok() && customer.is_ok();

        report(
            "Durability",
            passed,
            started,
            Some("Tested data persistence across operations".to_string()),
            None,
        )
    }

    pub async fn run_all() -> JsonValue {
        info!("Running complete ACID test suite");
        let started = Instant::now();

        let atomicity = Self::test_atomicity().await;
        let consistency = Self::test_consistency().await;
        let isolation = Self::test_isolation().await;
        let durability = Self::test_durability().await;

        let passed = [
            atomicity.passed,
            consistency.passed,
            isolation.passed,
            durability.passed,
        ];
        let summary = summarize(&passed, started.elapsed().as_millis() as u64);

        info!(
            "ACID test suite completed: {}/{} tests passed ({:.1}%) in {}",
            summary.passed_tests, summary.total_tests, summary.success_rate, summary.duration
        );

        json!({
            "provider": connector::provider_name(),
            "test_suite": "ACID Compliance (Read-Only Sanity Checks)",
            "timestamp": chrono::Utc::now().timestamp(),
            "test_session_id": chrono::Utc::now().timestamp_millis(),
            "tests": {
                "atomicity": atomicity,
                "consistency": consistency,
                "isolation": isolation,
                "durability": durability,
            },
            "summary": summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_tables_are_probed_by_table_counts() {
        for table in REQUIRED_TABLES {
            assert!(
                connector::TPCC_TABLES.contains(&table),
                "{table} is not covered by table_counts"
            );
        }
    }

    #[test]
    fn test_summary_all_passed() {
        let summary = summarize(&[true, true, true, true], 120);
        assert_eq!(summary.passed_tests, 4);
        assert_eq!(summary.failed_tests, 0);
        assert_eq!(summary.success_rate, 100.0);
        assert_eq!(summary.duration, "120 ms");
    }

    #[test]
    fn test_summary_partial() {
        let summary = summarize(&[true, false, true, false], 80);
        assert_eq!(summary.passed_tests, 2);
        assert_eq!(summary.failed_tests, 2);
        assert_eq!(summary.success_rate, 50.0);
    }

    #[test]
    fn test_summary_empty_has_zero_rate() {
        let summary = summarize(&[], 5);
        assert_eq!(summary.total_tests, 0);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[test]
    fn test_report_serialization_skips_absent_fields() {
        let report = AcidTestReport {
            test: "Atomicity",
            passed: true,
            elapsed_time: 0.012,
            provider: "Distributed SQL".to_string(),
            details: Some("details".to_string()),
            error: None,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("details").is_some());
        assert!(value.get("error").is_none());
    }
}
