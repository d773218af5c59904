//! CLI command implementations.

mod ask;
mod config;
mod history;
mod serve;
mod transcript;

pub use ask::run_ask;
pub use config::run_config;
pub use history::run_history;
pub use serve::{build_router, run_serve};
pub use transcript::run_transcript;
