// ❗ Error taxonomy for the wealth core
//
// Four kinds of failure:
// 1. Invalid argument - rejected before any state changes
// 2. Not found        - user or node lookup failed, nothing changed
// 3. Conflict         - name already taken
// 4. Invariant        - mutation applied but the heap could not be repaired

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WealthError {
    // === Invalid argument ===
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name is reserved: {0}")]
    ReservedName(String),

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("Invalid amount {amount}: must be a finite, non-negative number")]
    InvalidAmount { amount: f64 },

    #[error("Node '{0}' has children; only leaf nodes hold values directly")]
    NotALeaf(String),

    #[error("Node '{name}' already holds a direct value of {value:.2}")]
    LeafHasValue { name: String, value: f64 },

    // === Not found ===
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Node '{name}' not found in {owner}'s wealth tree")]
    NodeNotFound { owner: String, name: String },

    // === Conflict ===
    #[error("User already exists: {0}")]
    DuplicateName(String),

    #[error("Node '{name}' already exists in {owner}'s wealth tree")]
    DuplicateNode { owner: String, name: String },

    // === Invariant violation ===
    #[error("User '{0}' is not tracked by the wealth heap")]
    NotInHeap(String),
}

impl WealthError {
    /// True for errors raised before any state was touched
    pub fn is_rejection(&self) -> bool {
        !matches!(self, WealthError::NotInHeap(_))
    }
}

pub type WealthResult<T> = Result<T, WealthError>;

/// Reject negative, NaN and infinite amounts
pub fn check_amount(amount: f64) -> WealthResult<f64> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(WealthError::InvalidAmount { amount })
    }
}

/// Trimmed, non-empty text field
pub fn check_field<'a>(field: &'static str, value: &'a str) -> WealthResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(WealthError::EmptyField { field })
    } else {
        Ok(trimmed)
    }
}
