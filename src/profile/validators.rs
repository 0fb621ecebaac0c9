// src/profile/validators.rs

use super::models::IdentityAssertion;
use crate::common::{ValidationResult, Validator};

/// Rejects assertions that cannot key a profile: subject and email are mandatory,
/// the display name may be empty.
pub struct IdentityAssertionValidator;

impl Validator<IdentityAssertion> for IdentityAssertionValidator {
    fn validate(&self, data: &IdentityAssertion) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.external_id.trim().is_empty() {
            result.add_error("sub", "Subject identifier is required");
        }

        if data.email.trim().is_empty() {
            result.add_error("email", "Email is required");
        }

        result
    }
}
