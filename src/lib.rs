pub mod config;
pub mod error;
pub mod fetch;
pub mod llm;
pub mod prompt;
pub mod server;
pub mod tailor;

pub use config::Config;
pub use error::AppError;
pub use tailor::TailorEngine;
