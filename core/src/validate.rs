//! Status acceptance.

use crate::types::StatusValidator;

/// `true` if `status` should resolve the request. A supplied validator is
/// authoritative; otherwise any 2xx status is accepted.
pub fn validate_status(status: u16, validator: Option<&StatusValidator>) -> bool {
    match validator {
        Some(accept) => accept(status),
        None => (200..300).contains(&status),
    }
}
