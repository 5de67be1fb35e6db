//! Persistence boundary for offerings and logistics requests.
//!
//! Implementations must hide soft-deleted rows from every lookup and apply
//! [`LogisticsStore::modify_request`] as one atomic unit over the request and
//! its lines.

pub mod memory;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::request::{LogisticsRequest, RequestFilter};
use crate::models::service::{ServiceFilter, ServiceOffering, ServiceSpec};

pub use memory::MemoryStore;

pub trait LogisticsStore: Send + Sync {
    fn insert_service(&self, spec: ServiceSpec) -> Result<ServiceOffering, AppError>;

    fn service(&self, id: u32) -> Result<ServiceOffering, AppError>;

    /// Fetches every listed offering in one pass, in the order asked for.
    fn services_by_ids(&self, ids: &[u32]) -> Result<Vec<ServiceOffering>, AppError>;

    fn services(&self, filter: &ServiceFilter) -> Result<Vec<ServiceOffering>, AppError>;

    fn update_service(&self, id: u32, spec: ServiceSpec) -> Result<ServiceOffering, AppError>;

    /// Soft-deletes an offering unless a live request still references it.
    fn delete_service(&self, id: u32) -> Result<(), AppError>;

    /// Returns the creator's open draft, creating it with `make` when absent.
    fn open_draft_or_insert(
        &self,
        creator_id: Uuid,
        make: impl FnOnce() -> LogisticsRequest,
    ) -> Result<LogisticsRequest, AppError>;

    fn open_draft(&self, creator_id: Uuid) -> Result<Option<LogisticsRequest>, AppError>;

    /// Forgets the creator's cart slot if it still points at `request_id`.
    fn release_draft(&self, creator_id: Uuid, request_id: Uuid) -> Result<(), AppError>;

    fn request(&self, id: Uuid) -> Result<LogisticsRequest, AppError>;

    fn requests(&self, filter: &RequestFilter) -> Result<Vec<LogisticsRequest>, AppError>;

    /// Runs `apply` against a copy of the request under an exclusive lock and
    /// commits the copy only if `apply` succeeds.
    fn modify_request<F>(&self, id: Uuid, apply: F) -> Result<LogisticsRequest, AppError>
    where
        F: FnOnce(&mut LogisticsRequest) -> Result<(), AppError>;

    fn service_count(&self) -> usize;

    fn request_count(&self) -> usize;
}
