pub mod analyze;
pub mod batch;
pub mod server;
pub mod settings;

pub use analyze::analyze;
pub use batch::{BatchSummary, PromptSet, run_batch};
pub use server::{ApiError, AppState, ErrorResponse, router, serve};
pub use settings::{CONFIG_PATH_ENV, ConfigError, DEFAULT_CONFIG_PATH, Settings};
