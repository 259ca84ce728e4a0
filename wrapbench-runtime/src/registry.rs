use serde::Deserialize;
use serde::Serialize;

use crate::budget::CallBudget;
use crate::config::WrappersConfig;
use crate::error::RunError;
use crate::wrapper::HistoryWrapper;
use crate::wrapper::KeywordWrapper;
use crate::wrapper::NoopWrapper;
use crate::wrapper::QueryBudgetWrapper;
use crate::wrapper::Wrapper;

/// The closed set of wrapper variants, identified by their config/API id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapperKind {
    #[default]
    Noop,
    Keyword,
    History,
    QueryBudget,
}

impl WrapperKind {
    pub const ALL: [WrapperKind; 4] = [
        WrapperKind::Noop,
        WrapperKind::Keyword,
        WrapperKind::History,
        WrapperKind::QueryBudget,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Keyword => "keyword",
            Self::History => "history",
            Self::QueryBudget => "query_budget",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Noop => "No filter (baseline)",
            Self::Keyword => "Block harmful keywords",
            Self::History => "History-based",
            Self::QueryBudget => "Query budget",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Noop => "No safety check. Use to compare with other options.",
            Self::Keyword => {
                "Blocks prompts containing banned words (e.g. bomb, hack, weapon). Best for stopping obviously harmful requests."
            }
            Self::History => {
                "Avoids empty or repeated answers by re-asking the model (bounded history)."
            }
            Self::QueryBudget => {
                "Limits how many times the model is called per request. Useful for cost control."
            }
        }
    }

    /// Build a fresh instance with initial state.
    ///
    /// The query-budget wrapper reports the resolved `budget` as its cap; every
    /// other variant only reads its own config block.
    pub fn build(self, config: &WrappersConfig, budget: CallBudget) -> Box<dyn Wrapper> {
        match self {
            Self::Noop => Box::new(NoopWrapper),
            Self::Keyword => Box::new(KeywordWrapper::new(&config.keyword)),
            Self::History => Box::new(HistoryWrapper::new(&config.history)),
            Self::QueryBudget => Box::new(QueryBudgetWrapper::new(budget.get())),
        }
    }
}

impl std::fmt::Display for WrapperKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for WrapperKind {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| RunError::Validation(format!("unknown wrapper: {s}")))
    }
}

/// Discovery entry for one wrapper variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrapperDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// All wrapper variants, in display order.
pub fn wrapper_catalog() -> Vec<WrapperDescriptor> {
    WrapperKind::ALL
        .into_iter()
        .map(|kind| WrapperDescriptor {
            id: kind.id(),
            label: kind.label(),
            description: kind.description(),
        })
        .collect()
}
