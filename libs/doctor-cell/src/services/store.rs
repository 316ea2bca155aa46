use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use shared_models::error::StoreError;

use crate::models::{AvailabilityWindow, NewAvailabilityWindow};

const ENTITY: &str = "AvailabilityWindow";

/// Persistence contract for availability windows.
///
/// `add` and `update` persist exactly the fields given. Listings are ordered
/// by day of week, then start time.
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<AvailabilityWindow, StoreError>;
    async fn list_by_doctor(&self, doctor_id: i64) -> Result<Vec<AvailabilityWindow>, StoreError>;
    async fn list_by_doctor_and_day(
        &self,
        doctor_id: i64,
        day_of_week: i32,
    ) -> Result<Vec<AvailabilityWindow>, StoreError>;
    async fn add(&self, window: NewAvailabilityWindow) -> Result<AvailabilityWindow, StoreError>;
    async fn update(&self, window: AvailabilityWindow) -> Result<AvailabilityWindow, StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
    async fn exists(&self, id: i64) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryAvailabilityStore {
    windows: RwLock<HashMap<i64, AvailabilityWindow>>,
    next_id: AtomicI64,
}

impl InMemoryAvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut windows: Vec<AvailabilityWindow>) -> Vec<AvailabilityWindow> {
        windows.sort_by_key(|w| (w.day_of_week, w.start_time, w.id));
        windows
    }
}

#[async_trait]
impl AvailabilityStore for InMemoryAvailabilityStore {
    async fn get(&self, id: i64) -> Result<AvailabilityWindow, StoreError> {
        self.windows
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: ENTITY, id })
    }

    async fn list_by_doctor(&self, doctor_id: i64) -> Result<Vec<AvailabilityWindow>, StoreError> {
        let windows = self.windows.read().await;
        Ok(Self::sorted(
            windows
                .values()
                .filter(|w| w.doctor_id == doctor_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_doctor_and_day(
        &self,
        doctor_id: i64,
        day_of_week: i32,
    ) -> Result<Vec<AvailabilityWindow>, StoreError> {
        let windows = self.windows.read().await;
        Ok(Self::sorted(
            windows
                .values()
                .filter(|w| w.doctor_id == doctor_id && w.day_of_week == day_of_week)
                .cloned()
                .collect(),
        ))
    }

    async fn add(&self, window: NewAvailabilityWindow) -> Result<AvailabilityWindow, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = AvailabilityWindow {
            id,
            doctor_id: window.doctor_id,
            day_of_week: window.day_of_week,
            specific_date: window.specific_date,
            start_time: window.start_time,
            end_time: window.end_time,
            is_active: window.is_active,
            created_at: window.created_at,
            updated_at: window.updated_at,
        };
        self.windows.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, window: AvailabilityWindow) -> Result<AvailabilityWindow, StoreError> {
        let mut windows = self.windows.write().await;
        match windows.get_mut(&window.id) {
            Some(existing) => {
                *existing = window.clone();
                Ok(window)
            }
            None => Err(StoreError::NotFound { entity: ENTITY, id: window.id }),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.windows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { entity: ENTITY, id })
    }

    async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.windows.read().await.contains_key(&id))
    }
}
