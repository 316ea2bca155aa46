// libs/doctor-cell/src/services/registry.rs
use async_trait::async_trait;

use shared_models::error::StoreError;

/// Which doctors may hold availability. Owned by the identity side.
#[async_trait]
pub trait DoctorRegistry: Send + Sync {
    async fn doctor_exists(&self, doctor_id: i64) -> Result<bool, StoreError>;
}
