//! Schema-level validation rules shared across form payloads.
//!
//! These back the `validator` derive attributes on the forms; cross-field
//! checks live with the forms themselves.

pub mod rules;
