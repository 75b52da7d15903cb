pub mod json_backend;

use crate::{core::Portfolio, errors::StoreError};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Abstraction over persistence backends that hold subscription portfolios.
///
/// Stores only move records in and out; every renewal date they receive has already been
/// computed by the billing engine.
pub trait RecordStore: Send + Sync {
    fn save(&self, portfolio: &Portfolio, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Portfolio>;
    fn list(&self) -> Result<Vec<String>>;
}

pub use json_backend::{JsonStore, PortfolioFile, RecordRow};
