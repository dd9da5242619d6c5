use crate::error::{PrintError, Result};
use crate::platform::profile::PlatformProfile;
use indexmap::IndexMap;
use std::path::Path;

/// A profile selected for a host
#[derive(Debug, Clone, Copy)]
pub struct ResolvedPlatform<'a> {
    /// Registry key that matched
    pub key: &'a str,
    pub profile: &'a PlatformProfile,
}

/// Immutable mapping from site identifier to platform profile.
///
/// Keys keep their insertion order so the supported-platform list is stable.
/// No key may be a substring of another, so at most one key matches a host.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    profiles: IndexMap<String, PlatformProfile>,
}

impl PlatformRegistry {
    /// Build a registry from `(key, profile)` entries
    pub fn new<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, PlatformProfile)>,
        K: Into<String>,
    {
        let mut profiles = IndexMap::new();
        for (key, profile) in entries {
            let key = key.into().trim().to_ascii_lowercase();
            if key.is_empty() {
                return Err(PrintError::ProfileConfig("registry key must not be empty".to_string()));
            }
            profile.validate()?;
            if profiles.insert(key.clone(), profile).is_some() {
                return Err(PrintError::ProfileConfig(format!("duplicate registry key '{}'", key)));
            }
        }

        let registry = Self { profiles };
        registry.check_overlaps()?;
        Ok(registry)
    }

    /// The platforms supported out of the box
    pub fn builtin() -> Self {
        let profiles = builtin_profiles()
            .into_iter()
            .map(|(key, profile)| (key.to_string(), profile))
            .collect();
        Self { profiles }
    }

    /// Parse a registry from a JSON object keyed by site identifier
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: IndexMap<String, PlatformProfile> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Load a registry from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// New registry with `other`'s entries added; entries with the same key are replaced
    pub fn merged(&self, other: &PlatformRegistry) -> Result<Self> {
        let mut profiles = self.profiles.clone();
        for (key, profile) in &other.profiles {
            profiles.insert(key.clone(), profile.clone());
        }
        let registry = Self { profiles };
        registry.check_overlaps()?;
        Ok(registry)
    }

    fn check_overlaps(&self) -> Result<()> {
        for a in self.profiles.keys() {
            for b in self.profiles.keys() {
                if a != b && a.contains(b.as_str()) {
                    return Err(PrintError::ProfileConfig(format!(
                        "registry keys '{}' and '{}' overlap",
                        a, b
                    )));
                }
            }
        }
        Ok(())
    }

    /// Find the unique profile whose key is a substring of `host`
    pub fn resolve(&self, host: &str) -> Result<ResolvedPlatform<'_>> {
        let host = host.to_ascii_lowercase();
        self.profiles
            .iter()
            .find(|(key, _)| host.contains(key.as_str()))
            .map(|(key, profile)| {
                log::info!("Host '{}' resolved to platform '{}'", host, key);
                ResolvedPlatform { key, profile }
            })
            .ok_or_else(|| PrintError::UnsupportedPlatform {
                host: host.clone(),
                supported: self.keys().map(str::to_string).collect(),
            })
    }

    /// Get a profile by exact key
    pub fn get(&self, key: &str) -> Option<&PlatformProfile> {
        self.profiles.get(key)
    }

    /// All registered keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Iterate over all (key, profile) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PlatformProfile)> {
        self.profiles.iter()
    }

    /// Get the number of registered platforms
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.profiles)?)
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_profiles() -> Vec<(&'static str, PlatformProfile)> {
    vec![
        (
            "claude.ai",
            PlatformProfile::new("Claude", r#"[class*="message"], [role="dialog"], .message"#)
                .with_timestamp(r#"[class*="timestamp"], time, [datetime]"#)
                .with_human(r#"human-message, .user-message, [class*="human"], [class*="user"]"#)
                .with_clean_selectors(["button", ".copy-btn"]),
        ),
        (
            "chatgpt.com",
            PlatformProfile::new("ChatGPT", ".text-base")
                .with_timestamp(r#"[class*="timestamp"], time, [datetime]"#)
                .with_human(".text-base:has(.whitespace-pre-wrap)")
                .with_assistant(".text-base:has(.prose)")
                .with_clean_selectors(["button", ".copy-code-button"]),
        ),
        (
            "chat.deepseek.com",
            PlatformProfile::new("DeepSeek", r#"[class*="message-container"]"#)
                .with_content(r#"[class*="markdown"]"#)
                .with_timestamp(r#"[class*="title_date"]"#)
                .with_human(r#"[class*="question"]"#)
                .with_clean_selectors([".copy-button", ".code-header", ".flex.items-center"]),
        ),
        (
            "www.perplexity.ai",
            PlatformProfile::new(
                "Perplexity",
                r#"div[data-testid="user-message"], div[data-testid="assistant-message"]"#,
            )
            .with_timestamp(r#"div[data-testid="thread-timestamp"]"#)
            .with_human(r#"div[data-testid="user-message"]"#)
            .with_clean_selectors(["button", ".copy-button"]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = PlatformRegistry::builtin();
        let keys: Vec<_> = registry.keys().collect();
        assert_eq!(keys, vec!["claude.ai", "chatgpt.com", "chat.deepseek.com", "www.perplexity.ai"]);
        assert!(registry.check_overlaps().is_ok());
    }

    #[test]
    fn test_builtin_profiles_compile() {
        for (key, profile) in PlatformRegistry::builtin().iter() {
            let compiled = profile.compile();
            assert!(compiled.is_ok(), "profile {} failed to compile", key);
            let compiled = compiled.unwrap();
            assert_eq!(compiled.clean.len(), profile.clean_selectors.len());
        }
    }

    #[test]
    fn test_resolve_supported_hosts() {
        let registry = PlatformRegistry::builtin();

        for key in ["claude.ai", "chatgpt.com", "chat.deepseek.com", "www.perplexity.ai"] {
            let resolved = registry.resolve(key).unwrap();
            assert_eq!(resolved.key, key);
        }

        let resolved = registry.resolve("CLAUDE.ai").unwrap();
        assert_eq!(resolved.profile.display_name, "Claude");
    }

    #[test]
    fn test_resolve_unsupported_host_lists_every_key() {
        let registry = PlatformRegistry::builtin();

        match registry.resolve("example.com") {
            Err(PrintError::UnsupportedPlatform { host, supported }) => {
                assert_eq!(host, "example.com");
                assert_eq!(supported.len(), registry.len());
                assert!(supported.contains(&"claude.ai".to_string()));
                assert!(supported.contains(&"chatgpt.com".to_string()));
            }
            other => panic!("Expected UnsupportedPlatform, got {:?}", other),
        }
    }

    #[test]
    fn test_overlapping_keys_are_rejected() {
        let result = PlatformRegistry::new([
            ("claude.ai", PlatformProfile::new("A", ".m")),
            ("ai", PlatformProfile::new("B", ".m")),
        ]);
        assert!(matches!(result, Err(PrintError::ProfileConfig(_))));
    }

    #[test]
    fn test_duplicate_and_empty_keys_are_rejected() {
        let duplicate = PlatformRegistry::new([
            ("a.com", PlatformProfile::new("A", ".m")),
            ("A.com", PlatformProfile::new("B", ".m")),
        ]);
        assert!(duplicate.is_err());

        let empty = PlatformRegistry::new([(" ", PlatformProfile::new("A", ".m"))]);
        assert!(empty.is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "gemini.google.com": {
                "display_name": "Gemini",
                "message_selector": "message-content",
                "human_predicate": ".query"
            }
        }"#;

        let registry = PlatformRegistry::from_json(json).unwrap();
        let resolved = registry.resolve("gemini.google.com").unwrap();
        assert_eq!(resolved.profile.display_name, "Gemini");
        assert_eq!(resolved.profile.clean_selectors.len(), 2);
    }

    #[test]
    fn test_merged_overrides_and_appends() {
        let extra = PlatformRegistry::new([
            ("claude.ai", PlatformProfile::new("Claude Custom", ".msg")),
            ("gemini.google.com", PlatformProfile::new("Gemini", ".msg")),
        ])
        .unwrap();

        let merged = PlatformRegistry::builtin().merged(&extra).unwrap();
        assert_eq!(merged.len(), 5);
        assert_eq!(merged.get("claude.ai").unwrap().display_name, "Claude Custom");
        assert_eq!(merged.keys().last(), Some("gemini.google.com"));
    }

    #[test]
    fn test_to_json_round_trip() {
        let registry = PlatformRegistry::builtin();
        let json = registry.to_json().unwrap();
        let parsed = PlatformRegistry::from_json(&json).unwrap();

        assert_eq!(parsed.len(), registry.len());
        assert_eq!(parsed.get("chatgpt.com"), registry.get("chatgpt.com"));
    }
}
