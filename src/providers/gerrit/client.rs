mod changes;
mod core;
mod files;

pub use self::core::{GerritClient, DEFAULT_MAX_CONCURRENT_REQUESTS};
pub use files::DEFAULT_REVISION;
