use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::calculator::{estimate_delivery, Estimate};
use crate::error::AppError;
use crate::models::request::{
    CartSummary, DraftUpdate, FormInput, LineDetail, LineUpdate, LogisticsRequest, Outcome,
    RequestDetail, RequestFilter, RequestStatus,
};
use crate::models::user::{Caller, Role};
use crate::observability::metrics::Metrics;
use crate::storage::LogisticsStore;

/// Drives a logistics request through draft → formed → completed/rejected,
/// with soft delete from any live state.
pub struct LifecycleManager<S> {
    store: Arc<S>,
    metrics: Metrics,
}

impl<S> Clone for LifecycleManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S: LogisticsStore> LifecycleManager<S> {
    pub fn new(store: Arc<S>, metrics: Metrics) -> Self {
        Self { store, metrics }
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }

    pub fn create_draft(&self, caller: &Caller) -> Result<LogisticsRequest, AppError> {
        let creator = caller.user_id;
        let result = self
            .store
            .open_draft_or_insert(creator, || LogisticsRequest::new_draft(creator));
        self.observe("create_draft", result)
    }

    pub fn add_line(
        &self,
        caller: &Caller,
        request_id: Uuid,
        service_id: u32,
        quantity: u32,
    ) -> Result<LogisticsRequest, AppError> {
        let result = self.try_add_line(caller, request_id, service_id, quantity);
        self.observe("add_line", result)
    }

    fn try_add_line(
        &self,
        caller: &Caller,
        request_id: Uuid,
        service_id: u32,
        quantity: u32,
    ) -> Result<LogisticsRequest, AppError> {
        if quantity == 0 {
            return Err(AppError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }
        self.store.service(service_id)?;

        self.store.modify_request(request_id, |request| {
            request.ensure_owner(caller)?;
            request.ensure_status(RequestStatus::Draft, "add services to")?;
            request.upsert_line(service_id, quantity);
            request.touch();
            Ok(())
        })
    }

    pub fn remove_line(
        &self,
        caller: &Caller,
        request_id: Uuid,
        service_id: u32,
    ) -> Result<LogisticsRequest, AppError> {
        let result = self.store.modify_request(request_id, |request| {
            request.ensure_owner(caller)?;
            request.ensure_status(RequestStatus::Draft, "remove services from")?;
            request.decrement_line(service_id)?;
            request.touch();
            Ok(())
        });
        self.observe("remove_line", result)
    }

    pub fn update_line(
        &self,
        caller: &Caller,
        request_id: Uuid,
        service_id: u32,
        update: &LineUpdate,
    ) -> Result<LogisticsRequest, AppError> {
        let result = self.store.modify_request(request_id, |request| {
            request.ensure_owner(caller)?;
            request.ensure_status(RequestStatus::Draft, "edit services of")?;
            if update.quantity == Some(0) {
                return Err(AppError::Validation(
                    "quantity must be at least 1".to_string(),
                ));
            }

            let line = request.line_mut(service_id)?;
            if let Some(quantity) = update.quantity {
                line.quantity = quantity;
            }
            if let Some(sort_order) = update.sort_order {
                line.sort_order = sort_order;
            }
            if let Some(comment) = &update.comment {
                line.comment = comment.clone();
            }
            request.touch();
            Ok(())
        });
        self.observe("update_line", result)
    }

    pub fn update_draft(
        &self,
        caller: &Caller,
        request_id: Uuid,
        update: &DraftUpdate,
    ) -> Result<LogisticsRequest, AppError> {
        let result = self.store.modify_request(request_id, |request| {
            request.ensure_owner(caller)?;
            request.ensure_status(RequestStatus::Draft, "edit")?;
            update.apply(request);
            request.touch();
            Ok(())
        });
        self.observe("update_draft", result)
    }

    pub fn form(
        &self,
        caller: &Caller,
        request_id: Uuid,
        input: &FormInput,
    ) -> Result<LogisticsRequest, AppError> {
        let result = self.store.modify_request(request_id, |request| {
            request.ensure_owner(caller)?;
            request.ensure_status(RequestStatus::Draft, "form")?;

            let cargo = input.cargo();
            let mut problems = Vec::new();
            if input.from_city.trim().is_empty() {
                problems.push("from_city is required".to_string());
            }
            if input.to_city.trim().is_empty() {
                problems.push("to_city is required".to_string());
            }
            let bad = cargo.non_positive_fields();
            if !bad.is_empty() {
                problems.push(format!("{} must be greater than 0", bad.join(", ")));
            }
            if request.lines.is_empty() {
                problems.push("request has no services".to_string());
            }
            if !problems.is_empty() {
                return Err(AppError::Validation(problems.join("; ")));
            }

            let now = Utc::now();
            request.from_city = input.from_city.trim().to_string();
            request.to_city = input.to_city.trim().to_string();
            request.cargo = cargo;
            request.status = RequestStatus::Formed;
            request.formed_at = Some(now);
            request.updated_at = now;
            Ok(())
        });

        if let Ok(formed) = &result {
            self.store.release_draft(formed.creator_id, formed.id)?;
        }
        self.observe("form", result)
    }

    pub fn complete(
        &self,
        caller: &Caller,
        request_id: Uuid,
        outcome: Outcome,
    ) -> Result<LogisticsRequest, AppError> {
        let result = self.try_complete(caller, request_id, outcome);
        self.observe("complete", result)
    }

    fn try_complete(
        &self,
        caller: &Caller,
        request_id: Uuid,
        outcome: Outcome,
    ) -> Result<LogisticsRequest, AppError> {
        caller.require_staff()?;
        let action = match outcome {
            Outcome::Completed => "complete",
            Outcome::Rejected => "reject",
        };

        // Route, cargo and lines are frozen once formed, so quoting from a
        // snapshot is safe as long as the request is still formed at commit.
        let snapshot = self.store.request(request_id)?;
        snapshot.ensure_status(RequestStatus::Formed, action)?;

        let totals = match outcome {
            Outcome::Completed => Some(self.quote_lines(&snapshot)?),
            Outcome::Rejected => None,
        };

        self.store.modify_request(request_id, |request| {
            request.ensure_status(RequestStatus::Formed, action)?;

            if let Some((total_cost, total_days)) = totals {
                request.total_cost = total_cost;
                request.total_days = total_days;
            }

            let now = Utc::now();
            request.status = outcome.status();
            request.moderator_id = Some(caller.user_id);
            request.completed_at = Some(now);
            request.updated_at = now;
            Ok(())
        })
    }

    fn quote_lines(&self, request: &LogisticsRequest) -> Result<(f64, u32), AppError> {
        let ids: Vec<u32> = request.lines.iter().map(|line| line.service_id).collect();
        let services = self.store.services_by_ids(&ids)?;

        let estimates = services
            .iter()
            .map(|service| {
                estimate_delivery(service, &request.from_city, &request.to_city, &request.cargo)
                    .into_result()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(aggregate_totals(&estimates))
    }

    pub fn delete(&self, caller: &Caller, request_id: Uuid) -> Result<LogisticsRequest, AppError> {
        let result = self.store.modify_request(request_id, |request| {
            if request.creator_id != caller.user_id && caller.role != Role::Admin {
                return Err(AppError::Forbidden(format!(
                    "request {} belongs to another user",
                    request.id
                )));
            }

            let now = Utc::now();
            request.status = RequestStatus::Deleted;
            request.deleted_at = Some(now);
            request.updated_at = now;
            Ok(())
        });

        if let Ok(deleted) = &result {
            self.store.release_draft(deleted.creator_id, deleted.id)?;
        }
        self.observe("delete", result)
    }

    /// Creates the caller's cart if needed and adds the service to it.
    pub fn add_to_cart(
        &self,
        caller: &Caller,
        service_id: u32,
        quantity: u32,
    ) -> Result<LogisticsRequest, AppError> {
        let draft = self.create_draft(caller)?;
        self.add_line(caller, draft.id, service_id, quantity)
    }

    pub fn remove_from_cart(
        &self,
        caller: &Caller,
        service_id: u32,
    ) -> Result<LogisticsRequest, AppError> {
        let draft = self
            .store
            .open_draft(caller.user_id)?
            .ok_or_else(|| AppError::NotFound("cart is empty".to_string()))?;
        self.remove_line(caller, draft.id, service_id)
    }

    pub fn cart(&self, caller: &Caller) -> Result<CartSummary, AppError> {
        let draft = self.store.open_draft(caller.user_id)?;
        Ok(CartSummary {
            request_id: draft.as_ref().map(|request| request.id),
            count: draft.as_ref().map_or(0, LogisticsRequest::item_count),
        })
    }

    pub fn get(&self, caller: &Caller, request_id: Uuid) -> Result<RequestDetail, AppError> {
        let request = self.store.request(request_id)?;
        request.ensure_visible_to(caller)?;

        let mut lines = request.lines.clone();
        lines.sort_by_key(|line| line.sort_order);
        let ids: Vec<u32> = lines.iter().map(|line| line.service_id).collect();
        let services = self.store.services_by_ids(&ids)?;

        let services = lines
            .into_iter()
            .zip(services)
            .map(|(line, service)| LineDetail { line, service })
            .collect();

        Ok(RequestDetail { request, services })
    }

    pub fn list(
        &self,
        caller: &Caller,
        mut filter: RequestFilter,
    ) -> Result<Vec<LogisticsRequest>, AppError> {
        if !caller.role.is_staff() {
            filter.creator_id = Some(caller.user_id);
        }
        self.store.requests(&filter)
    }

    fn observe(
        &self,
        transition: &'static str,
        result: Result<LogisticsRequest, AppError>,
    ) -> Result<LogisticsRequest, AppError> {
        match &result {
            Ok(request) => {
                self.metrics
                    .lifecycle_transitions_total
                    .with_label_values(&[transition, "ok"])
                    .inc();
                info!(
                    request_id = %request.id,
                    status = %request.status,
                    transition,
                    "logistics request updated"
                );
            }
            Err(err) => {
                self.metrics
                    .lifecycle_transitions_total
                    .with_label_values(&[transition, "error"])
                    .inc();
                warn!(transition, error = %err, "logistics request change refused");
            }
        }
        result
    }
}

/// Sum of line costs (to the cent) and the slowest line's days.
pub fn aggregate_totals(estimates: &[Estimate]) -> (f64, u32) {
    let cost: f64 = estimates.iter().map(|estimate| estimate.total_cost).sum();
    let days = estimates
        .iter()
        .map(|estimate| estimate.delivery_days)
        .max()
        .unwrap_or(0);
    ((cost * 100.0).round() / 100.0, days)
}
