use std::fmt;

/// Environment variable holding the completion API key
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// API key for the completion endpoint.
///
/// The secret is only readable through [`Credential::expose`], which is used
/// when building the `Authorization` header. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a user-supplied key. Blank input counts as no key at all.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value of the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Pick the first usable key: explicit input wins over the environment
    pub fn resolve(explicit: Option<&str>, from_env: Option<&str>) -> Option<Self> {
        explicit
            .and_then(Self::new)
            .or_else(|| from_env.and_then(Self::new))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tail: String = self
            .0
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if self.0.chars().count() > 8 {
            write!(f, "Credential(***{})", tail)
        } else {
            f.write_str("Credential(***)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_absent() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   \t").is_none());
    }

    #[test]
    fn test_key_is_trimmed() {
        let key = Credential::new("  sk-abc \n").unwrap();
        assert_eq!(key.expose(), "sk-abc");
        assert_eq!(key.bearer(), "Bearer sk-abc");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key = Credential::new("sk-0123456789abcdef").unwrap();
        let printed = format!("{:?}", key);
        assert!(!printed.contains("0123456789"));
        assert!(printed.ends_with("cdef)"));

        let short = Credential::new("sk-1").unwrap();
        assert_eq!(format!("{:?}", short), "Credential(***)");
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let key = Credential::resolve(Some("sk-cli"), Some("sk-env")).unwrap();
        assert_eq!(key.expose(), "sk-cli");

        let key = Credential::resolve(Some("  "), Some("sk-env")).unwrap();
        assert_eq!(key.expose(), "sk-env");

        assert!(Credential::resolve(None, None).is_none());
    }
}
