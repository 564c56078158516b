pub mod protected;
pub mod public;

use crate::database::DatabaseError;
use crate::error::ApiError;

/// Rewrite a repository-level NotFound into a domain-specific 404 message,
/// passing every other error through unchanged.
pub(crate) fn not_found_as(message: &'static str) -> impl Fn(DatabaseError) -> ApiError {
    move |err| match err {
        DatabaseError::NotFound(_) => ApiError::not_found(message),
        other => other.into(),
    }
}
