use thiserror::Error;

/// Error type shared by the gear locker core and its FFI surface.
#[derive(Error, Debug, Clone, PartialEq, uniffi::Error)]
pub enum GreerError {
    #[error("invalid weight {weight}: must be a finite, non-negative number")]
    InvalidWeight { weight: f64 },

    #[error("invalid quantity {quantity}: must be zero or more")]
    InvalidQuantity { quantity: i64 },

    #[error("invalid color '{value}': {message}")]
    InvalidColor { value: String, message: String },

    #[error("trip end date precedes start date")]
    InvalidTripDates,

    #[error("invalid identifier: {value}")]
    InvalidId { value: String },

    #[error("unknown weight unit: {value}")]
    UnknownUnit { value: String },

    #[error("gear not found: {id}")]
    GearNotFound { id: String },

    #[error("pack not found: {id}")]
    PackNotFound { id: String },

    #[error("pack item not found: {id}")]
    AssociationNotFound { id: String },

    #[error("gear {gear_id} is already in pack {pack_id}")]
    DuplicateGear { gear_id: String, pack_id: String },

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl From<serde_json::Error> for GreerError {
    fn from(err: serde_json::Error) -> Self {
        GreerError::Serialization {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GreerError>;
