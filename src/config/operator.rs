//! Operator configuration loaded from environment variables.
//!
//! There is no authentication; every movement is stamped with one configured operator
//! label, falling back to the system administrator label.

/// Label used when `STOCK_OPERATOR` is not set.
pub const DEFAULT_OPERATOR: &str = "系统管理员";

/// Gets the operator label recorded on movements.
///
/// Reads `STOCK_OPERATOR`; blank values fall back to [`DEFAULT_OPERATOR`].
#[must_use]
pub fn get_operator() -> String {
    operator_from(std::env::var("STOCK_OPERATOR").ok())
}

fn operator_from(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_OPERATOR.to_string())
}
