//! Credential resolution: explicit user input first, then the environment fallback.
//! The environment is read once at startup by the caller and passed in.

/// Returns the trimmed user input when non-empty, else the trimmed env value when non-empty.
pub fn resolve_credential(user_input: Option<&str>, env_value: Option<&str>) -> Option<String> {
    [user_input, env_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Log-safe rendering of a credential: only the last 4 characters survive.
pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
