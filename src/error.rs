//! Errors reported by the catalog store and the inventory service.

use thiserror::Error;

/// Failure of a catalog or inventory operation.
///
/// None of these are fatal: the caller reports them and the store is left as it
/// was before the operation started.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Nothing was selected, or every selected quantity adds up to zero
    #[error("no tickets selected")]
    EmptySelection,

    /// The request does not fit into the remaining seats
    #[error("not enough seats: requested {requested}, available {available}")]
    InsufficientSeats {
        /// Total tickets asked for
        requested: i64,
        /// Seats left at the time of the check
        available: i32,
    },

    /// Quantity was not a whole number above zero
    #[error("quantity must be a whole number of at least 1, got {0:?}")]
    InvalidQuantity(String),

    /// Referenced movie, ticket type or booking does not exist
    #[error("{kind} #{id} not found")]
    NotFound {
        /// What was looked up
        kind: &'static str,
        /// The id that was not found
        id: i32,
    },

    /// The store failed during the operation; the transaction was rolled back
    #[error("database error: {0}")]
    PersistenceFailure(#[from] diesel::result::Error),
}

impl InventoryError {
    pub fn not_found(kind: &'static str, id: i32) -> Self {
        InventoryError::NotFound { kind, id }
    }
}
