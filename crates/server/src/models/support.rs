use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::error::ValidationError;

pub type TicketId = sqlx::types::Uuid;
const TICKET_SUBJECT_LENGTH_LIMIT: usize = 160;
const TICKET_MESSAGE_LENGTH_LIMIT: usize = 4096;

#[derive(Clone, Debug, Copy, PartialEq, Eq, Display, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Closed,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Ticket {
    pub id: TicketId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

pub fn validate_contact_email(email: &str) -> Result<(), ValidationError> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !well_formed {
        return Err(ValidationError::InvalidInput {
            value: email.to_string(),
            reason: "email address is not valid".to_string(),
        });
    }
    Ok(())
}

pub fn validate_ticket_subject(subject: &str) -> Result<(), ValidationError> {
    if subject.trim().is_empty() {
        return Err(ValidationError::InvalidInput {
            value: subject.to_string(),
            reason: "ticket subject cannot be empty".to_string(),
        });
    }
    if subject.len() > TICKET_SUBJECT_LENGTH_LIMIT {
        return Err(ValidationError::LimitExceeded {
            subject: "ticket subject".to_string(),
            unit: "char".to_string(),
            attempted: subject.len(),
            limit: TICKET_SUBJECT_LENGTH_LIMIT,
        });
    }
    Ok(())
}

pub fn validate_ticket_message(message: &str) -> Result<(), ValidationError> {
    if message.trim().is_empty() {
        return Err(ValidationError::InvalidInput {
            value: message.to_string(),
            reason: "ticket message cannot be empty".to_string(),
        });
    }
    if message.len() > TICKET_MESSAGE_LENGTH_LIMIT {
        return Err(ValidationError::LimitExceeded {
            subject: "ticket message".to_string(),
            unit: "char".to_string(),
            attempted: message.len(),
            limit: TICKET_MESSAGE_LENGTH_LIMIT,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_email() {
        validate_contact_email("ada@example.com").unwrap();
        validate_contact_email("a.b+tag@mail.example.org").unwrap();
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["", "plain", "@example.com", "user@nodot"] {
            let err = validate_contact_email(email).expect_err("expected invalid input error");
            assert!(matches!(err, ValidationError::InvalidInput { .. }));
        }
    }

    #[test]
    fn subject_and_message_cannot_be_blank() {
        validate_ticket_subject("").expect_err("expected invalid input error");
        validate_ticket_message("  ").expect_err("expected invalid input error");
        validate_ticket_subject("billing question").unwrap();
        validate_ticket_message("I was charged twice").unwrap();
    }
}
