pub mod action;
pub mod api;
pub mod budget;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod registry;
pub mod run_state;
pub mod summary;
pub mod wrapper;

pub use action::{Action, Decision};
pub use api::{ConfigView, QueryRequest, QueryResponse, WrapperList};
pub use budget::{CallBudget, MAX_QUERIES, MIN_QUERIES, QueryBudgetRange};
pub use config::{HistoryConfig, KeywordConfig, QueryBudgetConfig, WrappersConfig};
pub use error::{Result, RunError};
pub use orchestrator::{DEFAULT_CALL_TIMEOUT, Orchestrator, RunReport};
pub use registry::{WrapperDescriptor, WrapperKind, wrapper_catalog};
pub use run_state::{EMPTY_PROMPT_OUTPUT, InvalidTransition, RequestRun, RunPhase};
pub use summary::decision_summary;
pub use wrapper::{Wrapper, WrapperState};
