//! Request and response bodies of the query surface.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::budget::QueryBudgetRange;
use crate::config::WrappersConfig;
use crate::registry::WrapperDescriptor;
use crate::registry::WrapperKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub prompt: String,
    /// Wrapper id; the configured default when absent.
    #[serde(default)]
    pub wrapper_name: Option<String>,
    /// Call cap override, honoured by the query-budget wrapper when in 1..=10.
    #[serde(default)]
    pub max_queries: Option<i64>,
}

impl QueryRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            wrapper_name: None,
            max_queries: None,
        }
    }

    pub fn with_wrapper(mut self, kind: WrapperKind) -> Self {
        self.wrapper_name = Some(kind.id().to_string());
        self
    }

    pub fn with_max_queries(mut self, max_queries: i64) -> Self {
        self.max_queries = Some(max_queries);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub final_output: String,
    /// Last action of the run, or `SKIP` for an empty prompt.
    pub wrapper_decision: String,
    pub decision_summary: String,
    pub model_call_count: usize,
    pub raw_outputs: Vec<String>,
    pub decisions_sequence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrapperList {
    pub wrappers: Vec<WrapperDescriptor>,
}

/// Active configuration as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigView {
    pub model_name: String,
    pub default_wrapper: WrapperKind,
    pub wrapper_configs: BTreeMap<&'static str, serde_json::Value>,
    pub query_budget: QueryBudgetRange,
}

impl ConfigView {
    /// `wrapper_configs` mirrors the whole `wrappers` settings block.
    pub fn new(model_name: &str, wrappers: &WrappersConfig) -> Self {
        let mut wrapper_configs: BTreeMap<&'static str, serde_json::Value> = [
            WrapperKind::Keyword,
            WrapperKind::History,
            WrapperKind::QueryBudget,
        ]
        .into_iter()
        .map(|kind| (kind.id(), wrappers.block_for(kind)))
        .collect();
        wrapper_configs.insert("default", serde_json::json!(wrappers.default.id()));
        Self {
            model_name: model_name.to_string(),
            default_wrapper: wrappers.default,
            wrapper_configs,
            query_budget: QueryBudgetRange::from_config(wrappers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_optional_fields_default_to_none() {
        let req: QueryRequest = serde_json::from_str(r#"{"prompt":"hi"}"#).unwrap();
        assert_eq!(req, QueryRequest::new("hi"));
    }

    #[test]
    fn config_view_shape() {
        let view = ConfigView::new("m", &WrappersConfig::default());
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({
                "model_name": "m",
                "default_wrapper": "noop",
                "wrapper_configs": {
                    "default": "noop",
                    "history": {"k": 3},
                    "keyword": {"banned_keywords": []},
                    "query_budget": {"max_queries": 2}
                },
                "query_budget": {"min_queries": 1, "max_queries": 10, "default_queries": 2}
            })
        );
    }
}
