pub mod config;
pub mod error;
pub mod identity;
pub mod posts;
pub mod render;
pub mod server;
pub mod storage;

pub use config::BlogConfig;
pub use error::{AppError, AppResult};
