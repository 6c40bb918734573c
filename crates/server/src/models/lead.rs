use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub type LeadId = sqlx::types::Uuid;
const LEAD_NAME_LENGTH_LIMIT: usize = 80;

#[derive(Clone, Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub source: Option<String>,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub fn validate_lead_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidInput {
            value: name.to_string(),
            reason: "lead name cannot be empty".to_string(),
        });
    }
    if name.len() > LEAD_NAME_LENGTH_LIMIT {
        return Err(ValidationError::LimitExceeded {
            subject: "lead name".to_string(),
            unit: "char".to_string(),
            attempted: name.len(),
            limit: LEAD_NAME_LENGTH_LIMIT,
        });
    }
    Ok(())
}
