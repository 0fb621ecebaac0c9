// Helper functions for safe logging

use serde_json::Value;

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```ignore
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.chars().count() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if let [local, domain] = parts.as_slice() {
            if let Some(first) = local.chars().next() {
                return format!("{}***@{}", first, domain);
            }
        }
    }
    "***@***.***".to_string()
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 && token.is_ascii() {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Replaces every `access_token` string in a JSON document with its masked form
pub fn mask_access_tokens(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                match field {
                    Value::String(token) if key == "access_token" => {
                        *token = safe_token_log(token);
                    }
                    other => mask_access_tokens(other),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_access_tokens),
        _ => {}
    }
}
