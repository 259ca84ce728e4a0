use serde::Deserialize;
use serde::Serialize;

use crate::registry::WrapperKind;

pub const DEFAULT_HISTORY_DEPTH: i64 = 3;
pub const DEFAULT_MAX_QUERIES: i64 = 2;

/// Options for the keyword wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordConfig {
    #[serde(default)]
    pub banned_keywords: Vec<String>,
}

/// Options for the history wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// History depth. Negative values are treated as 0.
    #[serde(default = "default_history_depth")]
    pub k: i64,
}

impl HistoryConfig {
    pub fn depth(&self) -> usize {
        usize::try_from(self.k).unwrap_or(0)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// Options for the query-budget wrapper. `max_queries` is also the flat
/// call budget every other wrapper starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBudgetConfig {
    /// Calls per request. Values below 1 are treated as 1.
    #[serde(default = "default_max_queries")]
    pub max_queries: i64,
}

impl QueryBudgetConfig {
    pub fn cap(&self) -> u32 {
        u32::try_from(self.max_queries.max(1)).unwrap_or(u32::MAX)
    }
}

impl Default for QueryBudgetConfig {
    fn default() -> Self {
        Self {
            max_queries: DEFAULT_MAX_QUERIES,
        }
    }
}

fn default_history_depth() -> i64 {
    DEFAULT_HISTORY_DEPTH
}

fn default_max_queries() -> i64 {
    DEFAULT_MAX_QUERIES
}

/// The `wrappers` block of the settings document. Immutable once loaded;
/// wrapper instances are built from it per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappersConfig {
    #[serde(default)]
    pub default: WrapperKind,
    #[serde(default)]
    pub keyword: KeywordConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub query_budget: QueryBudgetConfig,
}

impl WrappersConfig {
    /// Config block for one wrapper as recorded in traces. Noop has none.
    pub fn block_for(&self, kind: WrapperKind) -> serde_json::Value {
        let value = match kind {
            WrapperKind::Noop => return serde_json::json!({}),
            WrapperKind::Keyword => serde_json::to_value(&self.keyword),
            WrapperKind::History => serde_json::to_value(&self.history),
            WrapperKind::QueryBudget => serde_json::to_value(&self.query_budget),
        };
        value.unwrap_or_else(|_| serde_json::json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_when_blocks_missing() {
        let config: WrappersConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.default, WrapperKind::Noop);
        assert!(config.keyword.banned_keywords.is_empty());
        assert_eq!(config.history.depth(), 3);
        assert_eq!(config.query_budget.cap(), 2);
    }

    #[test]
    fn malformed_values_are_normalized() {
        let config: WrappersConfig = serde_json::from_value(serde_json::json!({
            "history": {"k": -4},
            "query_budget": {"max_queries": 0}
        }))
        .unwrap();
        assert_eq!(config.history.depth(), 0);
        assert_eq!(config.query_budget.cap(), 1);
    }

    #[test]
    fn unknown_default_wrapper_is_rejected() {
        let result: Result<WrappersConfig, _> =
            serde_json::from_value(serde_json::json!({"default": "llm_judge"}));
        assert!(result.is_err());
    }

    #[test]
    fn block_for_each_kind() {
        let config = WrappersConfig {
            keyword: KeywordConfig {
                banned_keywords: vec!["hack".into()],
            },
            ..WrappersConfig::default()
        };
        assert_eq!(config.block_for(WrapperKind::Noop), serde_json::json!({}));
        assert_eq!(
            config.block_for(WrapperKind::Keyword),
            serde_json::json!({"banned_keywords": ["hack"]})
        );
        assert_eq!(config.block_for(WrapperKind::History), serde_json::json!({"k": 3}));
        assert_eq!(
            config.block_for(WrapperKind::QueryBudget),
            serde_json::json!({"max_queries": 2})
        );
    }
}
