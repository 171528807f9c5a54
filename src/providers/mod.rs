pub mod gerrit;

pub use gerrit::GerritProvider;
