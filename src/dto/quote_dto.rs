use serde::{Deserialize, Serialize};

use crate::model::quote::DeliveryOutcome;

pub const EMAIL_SENT_CLAUSE: &str = "Email sent";
pub const SHEET_SAVED_CLAUSE: &str = "Saved to Google Sheets";
pub const RECEIVED_MESSAGE: &str = "Quote received";

/// JSON body returned by every quote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub success: bool,
    pub message: String,
}

impl QuoteResponse {
    /// Accepted submission. `success` stays true whatever the side effects did.
    pub fn from_outcome(outcome: &DeliveryOutcome) -> Self {
        let mut clauses = Vec::with_capacity(2);
        if outcome.email_sent {
            clauses.push(EMAIL_SENT_CLAUSE);
        }
        if outcome.sheet_recorded {
            clauses.push(SHEET_SAVED_CLAUSE);
        }

        let message = if clauses.is_empty() {
            RECEIVED_MESSAGE.to_string()
        } else {
            clauses.join(", ")
        };
        QuoteResponse { success: true, message }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        QuoteResponse { success: false, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(sheet_recorded: bool, email_sent: bool) -> DeliveryOutcome {
        DeliveryOutcome { sheet_recorded, email_sent }
    }

    #[test]
    fn test_message_clauses() {
        assert_eq!(
            QuoteResponse::from_outcome(&outcome(true, true)).message,
            "Email sent, Saved to Google Sheets"
        );
        assert_eq!(QuoteResponse::from_outcome(&outcome(false, true)).message, "Email sent");
        assert_eq!(
            QuoteResponse::from_outcome(&outcome(true, false)).message,
            "Saved to Google Sheets"
        );
        assert_eq!(QuoteResponse::from_outcome(&outcome(false, false)).message, "Quote received");
    }

    #[test]
    fn test_success_is_independent_of_side_effects() {
        assert!(QuoteResponse::from_outcome(&outcome(false, false)).success);
        assert!(!QuoteResponse::failure("Name and Email are required").success);
    }
}
