use serde::Deserialize;
use serde::Serialize;

use crate::config::WrappersConfig;
use crate::registry::WrapperKind;

/// Smallest per-request override a caller may ask for.
pub const MIN_QUERIES: u32 = 1;
/// Largest per-request override a caller may ask for.
pub const MAX_QUERIES: u32 = 10;

// ---------------------------------------------------------------------------
// CallBudget — model calls allowed for one request
// ---------------------------------------------------------------------------

/// Maximum number of model completions for one request. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallBudget(u32);

impl CallBudget {
    pub fn new(calls: u32) -> Self {
        Self(calls.max(1))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Resolve the budget for a request, once, before the loop starts.
    ///
    /// - query_budget: a caller override within `[MIN_QUERIES, MAX_QUERIES]`
    ///   wins; anything else falls back to the configured cap.
    /// - history: at least `k + 2`, so a run of empty or repeated outputs
    ///   cannot use up the budget before a fresh answer has a chance.
    /// - everything else: the configured cap.
    pub fn resolve(kind: WrapperKind, config: &WrappersConfig, requested: Option<i64>) -> Self {
        let flat = config.query_budget.cap();
        match kind {
            WrapperKind::QueryBudget => {
                let requested = requested
                    .and_then(|n| u32::try_from(n).ok())
                    .filter(|n| (MIN_QUERIES..=MAX_QUERIES).contains(n));
                if requested.is_none() {
                    tracing::debug!(flat, "no usable max_queries override; using configured cap");
                }
                Self::new(requested.unwrap_or(flat))
            }
            WrapperKind::History => {
                let floor = u32::try_from(config.history.depth())
                    .unwrap_or(u32::MAX)
                    .saturating_add(2);
                Self::new(flat.max(floor))
            }
            WrapperKind::Noop | WrapperKind::Keyword => Self::new(flat),
        }
    }
}

// ---------------------------------------------------------------------------
// QueryBudgetRange — what callers may request
// ---------------------------------------------------------------------------

/// Override range and default, as exposed by the configuration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBudgetRange {
    pub min_queries: u32,
    pub max_queries: u32,
    pub default_queries: u32,
}

impl QueryBudgetRange {
    pub fn from_config(config: &WrappersConfig) -> Self {
        Self {
            min_queries: MIN_QUERIES,
            max_queries: MAX_QUERIES,
            default_queries: config.query_budget.cap(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistoryConfig;
    use crate::config::QueryBudgetConfig;

    fn config(k: i64, max_queries: i64) -> WrappersConfig {
        WrappersConfig {
            history: HistoryConfig { k },
            query_budget: QueryBudgetConfig { max_queries },
            ..WrappersConfig::default()
        }
    }

    #[test]
    fn test_flat_budget_for_noop_and_keyword() {
        let cfg = config(3, 4);
        assert_eq!(CallBudget::resolve(WrapperKind::Noop, &cfg, Some(9)).get(), 4);
        assert_eq!(CallBudget::resolve(WrapperKind::Keyword, &cfg, None).get(), 4);
    }

    #[test]
    fn test_query_budget_override_in_range() {
        let cfg = config(3, 2);
        for n in 1..=10 {
            assert_eq!(
                CallBudget::resolve(WrapperKind::QueryBudget, &cfg, Some(n)).get(),
                n as u32
            );
        }
    }

    #[test]
    fn test_query_budget_override_out_of_range_falls_back() {
        let cfg = config(3, 2);
        for n in [0, -1, 11, 1_000, i64::MAX] {
            assert_eq!(
                CallBudget::resolve(WrapperKind::QueryBudget, &cfg, Some(n)).get(),
                2,
                "override {n}"
            );
        }
        assert_eq!(
            CallBudget::resolve(WrapperKind::QueryBudget, &cfg, None).get(),
            2
        );
    }

    #[test]
    fn test_history_floor_is_k_plus_two() {
        assert_eq!(
            CallBudget::resolve(WrapperKind::History, &config(3, 2), None).get(),
            5
        );
        assert_eq!(
            CallBudget::resolve(WrapperKind::History, &config(1, 7), None).get(),
            7
        );
        assert_eq!(
            CallBudget::resolve(WrapperKind::History, &config(-5, 0), None).get(),
            2
        );
    }

    #[test]
    fn test_budget_is_never_zero() {
        assert_eq!(CallBudget::new(0).get(), 1);
        assert_eq!(
            CallBudget::resolve(WrapperKind::Noop, &config(3, -3), None).get(),
            1
        );
    }

    #[test]
    fn test_range_reports_configured_default() {
        let range = QueryBudgetRange::from_config(&config(3, 6));
        assert_eq!(
            range,
            QueryBudgetRange {
                min_queries: 1,
                max_queries: 10,
                default_queries: 6,
            }
        );
    }
}
