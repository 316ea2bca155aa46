// libs/appointment-cell/src/services/directory.rs
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use doctor_cell::models::Doctor;
use doctor_cell::services::DoctorRegistry;
use shared_models::error::StoreError;

use crate::models::Patient;

/// Existence checks and display names owned by the identity subsystem.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    async fn doctor_exists(&self, doctor_id: i64) -> Result<bool, StoreError>;
    async fn patient_exists(&self, patient_id: i64) -> Result<bool, StoreError>;
    async fn doctor_name(&self, doctor_id: i64) -> Result<Option<String>, StoreError>;
    async fn patient_name(&self, patient_id: i64) -> Result<Option<String>, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    doctors: RwLock<HashMap<i64, Doctor>>,
    patients: RwLock<HashMap<i64, Patient>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register_doctor(&self, doctor: Doctor) {
        self.doctors.write().await.insert(doctor.id, doctor);
    }

    pub async fn register_patient(&self, patient: Patient) {
        self.patients.write().await.insert(patient.id, patient);
    }
}

#[async_trait]
impl DirectoryService for InMemoryDirectory {
    /// Inactive doctors count as absent for scheduling.
    async fn doctor_exists(&self, doctor_id: i64) -> Result<bool, StoreError> {
        Ok(self
            .doctors
            .read()
            .await
            .get(&doctor_id)
            .is_some_and(|d| d.is_active))
    }

    async fn patient_exists(&self, patient_id: i64) -> Result<bool, StoreError> {
        Ok(self.patients.read().await.contains_key(&patient_id))
    }

    async fn doctor_name(&self, doctor_id: i64) -> Result<Option<String>, StoreError> {
        Ok(self
            .doctors
            .read()
            .await
            .get(&doctor_id)
            .map(|d| d.display_name.clone()))
    }

    async fn patient_name(&self, patient_id: i64) -> Result<Option<String>, StoreError> {
        Ok(self
            .patients
            .read()
            .await
            .get(&patient_id)
            .map(|p| p.display_name.clone()))
    }
}

/// Lets the availability side ask the directory about doctors.
pub struct DirectoryDoctors(pub Arc<dyn DirectoryService>);

#[async_trait]
impl DoctorRegistry for DirectoryDoctors {
    async fn doctor_exists(&self, doctor_id: i64) -> Result<bool, StoreError> {
        self.0.doctor_exists(doctor_id).await
    }
}
