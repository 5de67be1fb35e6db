use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::cargo::Cargo;
use crate::models::service::ServiceOffering;
use crate::models::user::Caller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Draft,
    Formed,
    Completed,
    Rejected,
    Deleted,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Draft => "draft",
            RequestStatus::Formed => "formed",
            RequestStatus::Completed => "completed",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "draft" => Ok(RequestStatus::Draft),
            "formed" => Ok(RequestStatus::Formed),
            "completed" => Ok(RequestStatus::Completed),
            "rejected" => Ok(RequestStatus::Rejected),
            "deleted" => Ok(RequestStatus::Deleted),
            other => Err(AppError::Validation(format!(
                "unrecognized status '{other}'"
            ))),
        }
    }
}

/// The two ways a moderator can close a formed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Rejected,
}

impl Outcome {
    pub fn status(&self) -> RequestStatus {
        match self {
            Outcome::Completed => RequestStatus::Completed,
            Outcome::Rejected => RequestStatus::Rejected,
        }
    }
}

impl FromStr for Outcome {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.parse::<RequestStatus>() {
            Ok(RequestStatus::Completed) => Ok(Outcome::Completed),
            Ok(RequestStatus::Rejected) => Ok(Outcome::Rejected),
            _ => Err(AppError::Validation(format!(
                "invalid status '{raw}'. allowed: completed, rejected"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLine {
    pub service_id: u32,
    pub quantity: u32,
    pub comment: String,
    pub sort_order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticsRequest {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub moderator_id: Option<Uuid>,
    pub from_city: String,
    pub to_city: String,
    pub cargo: Cargo,
    pub status: RequestStatus,
    pub total_cost: f64,
    pub total_days: u32,
    pub lines: Vec<RequestLine>,
    pub created_at: DateTime<Utc>,
    pub formed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl LogisticsRequest {
    pub fn new_draft(creator_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            creator_id,
            moderator_id: None,
            from_city: String::new(),
            to_city: String::new(),
            cargo: Cargo::default(),
            status: RequestStatus::Draft,
            total_cost: 0.0,
            total_days: 0,
            lines: Vec::new(),
            created_at: now,
            formed_at: None,
            completed_at: None,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.status == RequestStatus::Deleted
    }

    /// Total quantity across lines, shown as the cart badge.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn line(&self, service_id: u32) -> Option<&RequestLine> {
        self.lines.iter().find(|line| line.service_id == service_id)
    }

    pub fn ensure_owner(&self, caller: &Caller) -> Result<(), AppError> {
        if self.creator_id == caller.user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "request {} belongs to another user",
                self.id
            )))
        }
    }

    pub fn ensure_visible_to(&self, caller: &Caller) -> Result<(), AppError> {
        if caller.role.is_staff() {
            return Ok(());
        }
        self.ensure_owner(caller)
    }

    pub fn ensure_status(
        &self,
        expected: RequestStatus,
        action: &'static str,
    ) -> Result<(), AppError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(AppError::StateTransition {
                from: self.status,
                action,
            })
        }
    }

    /// Adds `quantity` of a service, merging into an existing line.
    pub fn upsert_line(&mut self, service_id: u32, quantity: u32) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.service_id == service_id)
        {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }

        let sort_order = self
            .lines
            .iter()
            .map(|line| line.sort_order.saturating_add(1))
            .max()
            .unwrap_or(0);
        self.lines.push(RequestLine {
            service_id,
            quantity,
            comment: String::new(),
            sort_order,
        });
    }

    /// Takes one unit off a line, dropping the line when it reaches zero.
    pub fn decrement_line(&mut self, service_id: u32) -> Result<(), AppError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.service_id == service_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "service {service_id} is not in request {}",
                    self.id
                ))
            })?;

        let line = &mut self.lines[index];
        line.quantity = line.quantity.saturating_sub(1);
        if line.quantity == 0 {
            self.lines.remove(index);
        }
        Ok(())
    }

    pub fn line_mut(&mut self, service_id: u32) -> Result<&mut RequestLine, AppError> {
        let id = self.id;
        self.lines
            .iter_mut()
            .find(|line| line.service_id == service_id)
            .ok_or_else(|| AppError::NotFound(format!("service {service_id} is not in request {id}")))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Route and cargo supplied when a draft is submitted. Missing fields
/// default to empty/zero so validation can report them all at once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub from_city: String,
    pub to_city: String,
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl FormInput {
    pub fn cargo(&self) -> Cargo {
        Cargo::new(self.length, self.width, self.height, self.weight)
    }
}

/// Partial edit of a draft; blank cities and non-positive numbers are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftUpdate {
    pub from_city: Option<String>,
    pub to_city: Option<String>,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl DraftUpdate {
    pub fn apply(&self, request: &mut LogisticsRequest) {
        let city = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|city| !city.is_empty())
                .map(str::to_string)
        };
        let positive = |value: Option<f64>| value.filter(|v| v.is_finite() && *v > 0.0);

        if let Some(from) = city(&self.from_city) {
            request.from_city = from;
        }
        if let Some(to) = city(&self.to_city) {
            request.to_city = to;
        }
        if let Some(weight) = positive(self.weight) {
            request.cargo.weight = weight;
        }
        if let Some(length) = positive(self.length) {
            request.cargo.length = length;
        }
        if let Some(width) = positive(self.width) {
            request.cargo.width = width;
        }
        if let Some(height) = positive(self.height) {
            request.cargo.height = height;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineUpdate {
    pub quantity: Option<u32>,
    pub sort_order: Option<u32>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub creator_id: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl RequestFilter {
    pub fn matches(&self, request: &LogisticsRequest) -> bool {
        if request.is_deleted() {
            return false;
        }
        let created = request.created_at.date_naive();

        self.status.is_none_or(|status| request.status == status)
            && self.creator_id.is_none_or(|creator| request.creator_id == creator)
            && self.date_from.is_none_or(|from| created >= from)
            && self.date_to.is_none_or(|to| created <= to)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LineDetail {
    #[serde(flatten)]
    pub line: RequestLine,
    pub service: ServiceOffering,
}

/// A request together with the offerings its lines point at.
#[derive(Debug, Clone, Serialize)]
pub struct RequestDetail {
    #[serde(flatten)]
    pub request: LogisticsRequest,
    pub services: Vec<LineDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub request_id: Option<Uuid>,
    pub count: u32,
}
