//! Repository trait for storage health probes.

use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthRepository: Send + Sync {
    /// Round-trips a trivial statement to the database.
    async fn ping(&self) -> Result<(), AppError>;
}
