//! Utility functions

use serde_json::Value;
use uuid::Uuid;

const MASKED: &str = "***masked***";
const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "password_temp",
    "code_verification",
    "token",
    "access_token",
    "refresh_token",
];

pub fn parse_uuid(s: &str) -> Option<Uuid> {
    Uuid::parse_str(s.trim()).ok()
}

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let visible = local.chars().take(2.min(local.chars().count().saturating_sub(1)).max(1));
        format!("{}***{}", visible.collect::<String>(), domain)
    } else {
        "***".to_string()
    }
}

/// Replaces credential-bearing fields anywhere in a JSON document before it is logged.
pub fn mask_sensitive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if SENSITIVE_FIELDS.contains(&key.as_str()) {
                    *field = Value::String(MASKED.to_string());
                } else {
                    mask_sensitive(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_sensitive),
        _ => {}
    }
}
