pub mod client;
pub mod decode;
pub mod filter;
mod provider;
pub mod types;

pub use provider::GerritProvider;
