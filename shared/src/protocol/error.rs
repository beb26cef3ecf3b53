use thiserror::Error;

/// Errors decoding change records and RPC records from JSON
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A record was not a JSON object
    #[error("{what} must be a JSON object")]
    NotAnObject { what: &'static str },

    /// A batch was not a JSON array
    #[error("{what} must be a JSON array")]
    NotAnArray { what: &'static str },

    /// A required key is absent
    #[error("{record} record is missing field '{field}'")]
    MissingField {
        record: String,
        field: &'static str,
    },

    /// A key is present but holds the wrong kind of value
    #[error("{record} record field '{field}' must be {expected}")]
    InvalidField {
        record: String,
        field: &'static str,
        expected: &'static str,
    },

    /// Two mutually exclusive payload keys are both present
    #[error("{record} record cannot carry both '{first}' and '{second}'")]
    ConflictingPayload {
        record: String,
        first: &'static str,
        second: &'static str,
    },

    /// The type discriminator is not known
    #[error("Unknown {what} type '{type_name}'")]
    UnknownType {
        what: &'static str,
        type_name: String,
    },
}
