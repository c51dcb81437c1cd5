use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// Person
///
/// The single entity of the service, stored one row per person in the `people` table.
/// The same struct is the request body for create and replace and the response body
/// for reads, since replace is always a full-record replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Person {
    /// Primary key. Omitted or nil on create means "assign one for me".
    #[serde(default)]
    pub id: Uuid,
    #[schema(example = "Ann")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "ann@example.com")]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub birth_date: Option<NaiveDate>,
}

impl Person {
    /// Fills in a fresh identifier when the client did not supply one.
    pub fn with_assigned_id(mut self) -> Self {
        if self.id.is_nil() {
            self.id = Uuid::new_v4();
        }
        self
    }
}

/// ProblemDetails
///
/// Error body returned with every non-2xx response produced by this service.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ProblemDetails {
    pub status: u16,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
