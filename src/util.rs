//! Small utility helpers shared across the crate.

use std::env;

/// Return the first non-empty environment variable from `keys`, or `None`.
pub fn env_first(keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Ok(value) = env::var(key) {
            if !value.trim().is_empty() {
                return Some(value);
            }
        }
    }
    None
}

/// Mask a credential down to a short hint suitable for a status bar.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_key_hides_middle() {
        assert_eq!(mask_key("AIzaSyExampleKey9876"), "AIza…9876");
    }

    #[test]
    fn mask_key_short_values_fully_masked() {
        assert_eq!(mask_key("secret"), "******");
        assert!(!mask_key("secret").contains('s'));
    }
}
