//! Record validation and error attachment.

mod attach;
mod failure;
mod validator;

pub use attach::{annotate, attach, field_lookup, AnnotatedRow, ErrorTable};
pub use failure::ValidationFailure;
pub use validator::{
    RecordValidator, Validation, ValidationOutcome, ValidatorCache, ValidatorOptions,
};
