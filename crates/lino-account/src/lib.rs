// crates/lino-account/src/lib.rs
//
// lino-account: account balances, per-account activity timestamps, donation
// relationship counters, and the developer (application) registry.

pub mod developer;
pub mod manager;
pub mod model;

// Re-export key types for ergonomic access from downstream crates.
pub use developer::{Developer, DeveloperManager};
pub use manager::AccountManager;
pub use model::{AccountBank, AccountInfo, AccountMeta, Relationship};
