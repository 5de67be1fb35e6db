use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::request::{LogisticsRequest, RequestFilter, RequestStatus};
use crate::models::service::{ServiceFilter, ServiceOffering, ServiceSpec};
use crate::storage::LogisticsStore;

/// DashMap-backed store. Each request (with its lines) is a single map value,
/// so one entry lock covers the whole aggregate.
///
/// Lock order is `open_drafts` before `requests`; no method holds a
/// `requests` entry while touching `services` or `open_drafts`.
pub struct MemoryStore {
    services: DashMap<u32, ServiceOffering>,
    requests: DashMap<Uuid, LogisticsRequest>,
    open_drafts: DashMap<Uuid, Uuid>,
    next_service_id: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
            requests: DashMap::new(),
            open_drafts: DashMap::new(),
            next_service_id: AtomicU32::new(1),
        }
    }

    fn request_not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("logistics request {id} not found"))
    }

    fn service_not_found(id: u32) -> AppError {
        AppError::NotFound(format!("service {id} not found"))
    }

    fn live_references(&self, service_id: u32) -> usize {
        self.requests
            .iter()
            .filter(|entry| {
                let request = entry.value();
                !request.is_deleted() && request.line(service_id).is_some()
            })
            .count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticsStore for MemoryStore {
    fn insert_service(&self, spec: ServiceSpec) -> Result<ServiceOffering, AppError> {
        let now = Utc::now();
        let service = ServiceOffering {
            id: self.next_service_id.fetch_add(1, Ordering::SeqCst),
            name: spec.name.trim().to_string(),
            description: spec.description,
            price: spec.price,
            delivery_days: spec.delivery_days,
            max_weight: spec.max_weight,
            max_volume: spec.max_volume,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        self.services.insert(service.id, service.clone());
        Ok(service)
    }

    fn service(&self, id: u32) -> Result<ServiceOffering, AppError> {
        self.services
            .get(&id)
            .map(|entry| entry.value().clone())
            .filter(|service| !service.is_deleted())
            .ok_or_else(|| Self::service_not_found(id))
    }

    fn services_by_ids(&self, ids: &[u32]) -> Result<Vec<ServiceOffering>, AppError> {
        ids.iter().map(|id| self.service(*id)).collect()
    }

    fn services(&self, filter: &ServiceFilter) -> Result<Vec<ServiceOffering>, AppError> {
        let mut services: Vec<ServiceOffering> = self
            .services
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|service| !service.is_deleted() && filter.matches(service))
            .collect();

        services.sort_by_key(|service| service.id);
        Ok(services)
    }

    fn update_service(&self, id: u32, spec: ServiceSpec) -> Result<ServiceOffering, AppError> {
        let mut service = self
            .services
            .get_mut(&id)
            .ok_or_else(|| Self::service_not_found(id))?;

        if service.is_deleted() {
            return Err(Self::service_not_found(id));
        }

        service.name = spec.name.trim().to_string();
        service.description = spec.description;
        service.price = spec.price;
        service.delivery_days = spec.delivery_days;
        service.max_weight = spec.max_weight;
        service.max_volume = spec.max_volume;
        service.updated_at = Utc::now();

        Ok(service.clone())
    }

    fn delete_service(&self, id: u32) -> Result<(), AppError> {
        self.service(id)?;

        let references = self.live_references(id);
        if references > 0 {
            return Err(AppError::Validation(format!(
                "service {id} is still used by {references} request(s)"
            )));
        }

        let mut service = self
            .services
            .get_mut(&id)
            .ok_or_else(|| Self::service_not_found(id))?;
        let now = Utc::now();
        service.deleted_at = Some(now);
        service.updated_at = now;
        Ok(())
    }

    fn open_draft_or_insert(
        &self,
        creator_id: Uuid,
        make: impl FnOnce() -> LogisticsRequest,
    ) -> Result<LogisticsRequest, AppError> {
        match self.open_drafts.entry(creator_id) {
            Entry::Occupied(mut slot) => {
                let existing = self
                    .requests
                    .get(slot.get())
                    .map(|entry| entry.value().clone())
                    .filter(|request| request.status == RequestStatus::Draft);
                if let Some(draft) = existing {
                    return Ok(draft);
                }

                let draft = make();
                self.requests.insert(draft.id, draft.clone());
                slot.insert(draft.id);
                Ok(draft)
            }
            Entry::Vacant(slot) => {
                let draft = make();
                self.requests.insert(draft.id, draft.clone());
                slot.insert(draft.id);
                Ok(draft)
            }
        }
    }

    fn open_draft(&self, creator_id: Uuid) -> Result<Option<LogisticsRequest>, AppError> {
        let Some(request_id) = self.open_drafts.get(&creator_id).map(|entry| *entry.value()) else {
            return Ok(None);
        };

        Ok(self
            .requests
            .get(&request_id)
            .map(|entry| entry.value().clone())
            .filter(|request| request.status == RequestStatus::Draft))
    }

    fn release_draft(&self, creator_id: Uuid, request_id: Uuid) -> Result<(), AppError> {
        self.open_drafts
            .remove_if(&creator_id, |_, current| *current == request_id);
        Ok(())
    }

    fn request(&self, id: Uuid) -> Result<LogisticsRequest, AppError> {
        self.requests
            .get(&id)
            .map(|entry| entry.value().clone())
            .filter(|request| !request.is_deleted())
            .ok_or_else(|| Self::request_not_found(id))
    }

    fn requests(&self, filter: &RequestFilter) -> Result<Vec<LogisticsRequest>, AppError> {
        let mut requests: Vec<LogisticsRequest> = self
            .requests
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|request| filter.matches(request))
            .collect();

        requests.sort_by_key(|request| request.created_at);
        Ok(requests)
    }

    fn modify_request<F>(&self, id: Uuid, apply: F) -> Result<LogisticsRequest, AppError>
    where
        F: FnOnce(&mut LogisticsRequest) -> Result<(), AppError>,
    {
        let mut entry = self
            .requests
            .get_mut(&id)
            .ok_or_else(|| Self::request_not_found(id))?;

        if entry.is_deleted() {
            return Err(Self::request_not_found(id));
        }

        let mut staged = entry.value().clone();
        apply(&mut staged)?;
        *entry.value_mut() = staged.clone();

        Ok(staged)
    }

    fn service_count(&self) -> usize {
        self.services
            .iter()
            .filter(|entry| !entry.value().is_deleted())
            .count()
    }

    fn request_count(&self) -> usize {
        self.requests
            .iter()
            .filter(|entry| !entry.value().is_deleted())
            .count()
    }
}
