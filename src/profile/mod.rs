// src/profile/mod.rs

pub mod models;
pub mod store;
pub mod validators;

#[cfg(test)]
mod tests;

pub use models::{IdentityAssertion, Profile};
pub use store::{find_profile_by_id, upsert_profile};
pub use validators::IdentityAssertionValidator;
