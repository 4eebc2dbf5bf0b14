use thiserror::Error;

use crate::decimal::Rate;

#[derive(Error, Debug)]
pub enum MortgageError {
    #[error("invalid input: {field}: {reason}")]
    InvalidInput {
        field: String,
        reason: String,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MortgageError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        MortgageError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: &str) -> Self {
        MortgageError::CalculationError {
            message: format!("decimal overflow in {context}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, MortgageError>;
