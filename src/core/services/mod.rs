pub mod subscription_service;

pub use subscription_service::SubscriptionService;

use uuid::Uuid;

use crate::errors::{BillingError, StoreError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Billing(#[from] BillingError),
    #[error("Subscription not found: {0}")]
    NotFound(Uuid),
    #[error("{0}")]
    Invalid(String),
}
