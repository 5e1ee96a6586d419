//! Checks the shape of transaction route inputs before anything touches the database.

use axum::{
    Json,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transaction::{TransactionId, TransactionType};

/// The length of a hyphenated UUID, e.g. "67e55044-10b1-426f-9247-bb680e5fe0c8".
const HYPHENATED_UUID_LENGTH: usize = 36;

/// The largest magnitude accepted for a single transaction.
///
/// Keeps the sum of every amount a caller can realistically store well
/// inside the range of an `f64`.
pub const MAX_AMOUNT: f64 = 1e15;

/// A request parameter or body did not have the expected shape.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// The transaction ID in the path is not a hyphenated UUID.
    #[error("\"{0}\" is not a valid transaction ID")]
    InvalidTransactionId(String),

    /// The request body is not JSON, or is missing a field, or has a field of the wrong type.
    #[error("invalid request body: {0}")]
    MalformedBody(String),

    /// The title is empty or only whitespace.
    #[error("title cannot be empty")]
    EmptyTitle,

    /// The amount is negative.
    ///
    /// The sign of a stored amount comes from the transaction type, so the
    /// amount in a request must be an unsigned magnitude.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(f64),

    /// The amount is larger than [MAX_AMOUNT].
    #[error("amount must not be greater than {max}, got {0}", max = MAX_AMOUNT)]
    AmountTooLarge(f64),

    /// The path could not be decoded, e.g. it is not valid UTF-8.
    #[error("invalid path: {0}")]
    MalformedPath(String),
}

/// Parse the transaction ID from a path parameter.
///
/// Only the canonical hyphenated form is accepted, in either case.
///
/// # Errors
/// Returns [ValidationError::InvalidTransactionId] if `raw` is not a hyphenated UUID.
pub fn parse_transaction_id(raw: &str) -> Result<TransactionId, ValidationError> {
    if raw.len() != HYPHENATED_UUID_LENGTH {
        return Err(ValidationError::InvalidTransactionId(raw.to_owned()));
    }

    Uuid::try_parse(raw)
        .map(TransactionId::from_uuid)
        .map_err(|_| ValidationError::InvalidTransactionId(raw.to_owned()))
}

/// Parse the transaction ID from the result of the path extractor.
///
/// # Errors
/// Returns a [ValidationError::MalformedPath] if the path parameter could not
/// be decoded, or the errors from [parse_transaction_id].
pub fn parse_transaction_id_param(
    param: Result<Path<String>, PathRejection>,
) -> Result<TransactionId, ValidationError> {
    let Path(raw) =
        param.map_err(|rejection| ValidationError::MalformedPath(rejection.body_text()))?;

    parse_transaction_id(&raw)
}

/// The JSON body for creating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionBody {
    /// A text label for the transaction.
    pub title: String,
    /// The unsigned amount of money.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCreateTransaction {
    /// The title, never blank.
    pub title: String,
    /// The amount with the sign of the transaction type applied.
    pub signed_amount: f64,
}

impl CreateTransactionBody {
    /// Check the field values and apply the sign convention to the amount.
    ///
    /// # Errors
    /// Returns a:
    /// - [ValidationError::EmptyTitle] if the title is blank,
    /// - [ValidationError::NegativeAmount] if the amount is below zero,
    /// - or [ValidationError::AmountTooLarge] if the amount is above [MAX_AMOUNT].
    pub fn validate(self) -> Result<ValidCreateTransaction, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        if self.amount.is_sign_negative() && self.amount != 0.0 {
            return Err(ValidationError::NegativeAmount(self.amount));
        }

        if self.amount > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge(self.amount));
        }

        Ok(ValidCreateTransaction {
            title: self.title,
            signed_amount: self.transaction_type.signed_amount(self.amount),
        })
    }
}

/// Turn the result of the JSON extractor into a validated create request.
///
/// # Errors
/// Returns a [ValidationError::MalformedBody] if the body could not be
/// parsed, or the errors from [CreateTransactionBody::validate].
pub fn parse_create_body(
    payload: Result<Json<CreateTransactionBody>, JsonRejection>,
) -> Result<ValidCreateTransaction, ValidationError> {
    let Json(body) =
        payload.map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;

    body.validate()
}

#[cfg(test)]
mod validation_tests {
    use uuid::Uuid;

    use crate::transaction::{TransactionId, TransactionType};

    use super::{
        CreateTransactionBody, MAX_AMOUNT, ValidCreateTransaction, ValidationError,
        parse_transaction_id,
    };

    #[test]
    fn parses_hyphenated_uuid() {
        let raw = "67e55044-10b1-426f-9247-bb680e5fe0c8";

        let got = parse_transaction_id(raw).unwrap();

        assert_eq!(got, TransactionId::from_uuid(Uuid::parse_str(raw).unwrap()));
    }

    #[test]
    fn parses_uppercase_uuid() {
        let got = parse_transaction_id("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();

        assert_eq!(got.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn rejects_non_uuid() {
        assert_eq!(
            parse_transaction_id("not-a-uuid"),
            Err(ValidationError::InvalidTransactionId("not-a-uuid".to_owned()))
        );
    }

    #[test]
    fn rejects_uuid_without_hyphens() {
        let raw = "67e5504410b1426f9247bb680e5fe0c8";

        assert_eq!(
            parse_transaction_id(raw),
            Err(ValidationError::InvalidTransactionId(raw.to_owned()))
        );
    }

    #[test]
    fn rejects_braced_uuid() {
        let raw = "{67e55044-10b1-426f-9247-bb680e5fe0c8}";

        assert!(parse_transaction_id(raw).is_err());
    }

    #[test]
    fn rejects_uuid_with_invalid_characters() {
        let raw = "67e55044-10b1-426f-9247-bb680e5fe0cz";

        assert!(parse_transaction_id(raw).is_err());
    }

    fn body(title: &str, amount: f64, transaction_type: TransactionType) -> CreateTransactionBody {
        CreateTransactionBody {
            title: title.to_owned(),
            amount,
            transaction_type,
        }
    }

    #[test]
    fn credit_keeps_sign() {
        let got = body("Salary", 5000.0, TransactionType::Credit)
            .validate()
            .unwrap();

        assert_eq!(
            got,
            ValidCreateTransaction {
                title: "Salary".to_owned(),
                signed_amount: 5000.0
            }
        );
    }

    #[test]
    fn debit_flips_sign() {
        let got = body("Rent", 1200.0, TransactionType::Debit)
            .validate()
            .unwrap();

        assert_eq!(got.signed_amount, -1200.0);
    }

    #[test]
    fn zero_amount_is_allowed() {
        let got = body("Nothing", 0.0, TransactionType::Debit)
            .validate()
            .unwrap();

        assert_eq!(got.signed_amount, 0.0);
    }

    #[test]
    fn rejects_blank_title() {
        assert_eq!(
            body("", 1.0, TransactionType::Credit).validate(),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            body("   ", 1.0, TransactionType::Credit).validate(),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn rejects_negative_amount() {
        assert_eq!(
            body("Refund", -10.0, TransactionType::Debit).validate(),
            Err(ValidationError::NegativeAmount(-10.0))
        );
    }

    #[test]
    fn accepts_largest_amount() {
        let got = body("Lottery", MAX_AMOUNT, TransactionType::Credit)
            .validate()
            .unwrap();

        assert_eq!(got.signed_amount, MAX_AMOUNT);
    }

    #[test]
    fn rejects_amount_above_limit() {
        assert_eq!(
            body("Overflow", 1e308, TransactionType::Credit).validate(),
            Err(ValidationError::AmountTooLarge(1e308))
        );
        assert_eq!(
            body("Overflow", MAX_AMOUNT * 2.0, TransactionType::Debit).validate(),
            Err(ValidationError::AmountTooLarge(MAX_AMOUNT * 2.0))
        );
    }

    #[test]
    fn body_uses_type_as_field_name() {
        let got: CreateTransactionBody =
            serde_json::from_str(r#"{"title": "Salary", "amount": 5000, "type": "credit"}"#)
                .unwrap();

        assert_eq!(got.transaction_type, TransactionType::Credit);
        assert_eq!(got.amount, 5000.0);
    }

    #[test]
    fn body_rejects_unknown_type() {
        let got = serde_json::from_str::<CreateTransactionBody>(
            r#"{"title": "Salary", "amount": 5000, "type": "refund"}"#,
        );

        assert!(got.is_err());
    }

    #[test]
    fn body_rejects_amount_as_string() {
        let got = serde_json::from_str::<CreateTransactionBody>(
            r#"{"title": "Salary", "amount": "5000", "type": "credit"}"#,
        );

        assert!(got.is_err());
    }
}
