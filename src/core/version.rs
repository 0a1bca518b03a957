use std::cmp::Ordering;
use std::fmt;

/// A TeamTalk SDK release name such as `v5.15` or `v5.8.1a`.
///
/// Ordering compares the numeric components first, then the alphabetic
/// suffix, so `v5.15 < v5.15a < v5.16`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkVersion {
    components: Vec<u32>,
    suffix: String,
}

impl SdkVersion {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        if body.is_empty() {
            return None;
        }

        let parts: Vec<&str> = body.split('.').collect();
        let mut components = Vec::with_capacity(parts.len());
        let mut suffix = String::new();

        for (i, part) in parts.iter().enumerate() {
            let digits_end = part
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(part.len());
            let (digits, rest) = part.split_at(digits_end);
            if digits.is_empty() {
                return None;
            }
            if !rest.is_empty() {
                // Only the last component may carry a letter suffix.
                if i != parts.len() - 1 || !rest.chars().all(|c| c.is_ascii_alphabetic()) {
                    return None;
                }
                suffix = rest.to_ascii_lowercase();
            }
            components.push(digits.parse().ok()?);
        }

        Some(SdkVersion { components, suffix })
    }

    pub fn components(&self) -> &[u32] {
        &self.components
    }
}

impl Ord for SdkVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components
            .cmp(&other.components)
            .then_with(|| self.suffix.cmp(&other.suffix))
    }
}

impl PartialOrd for SdkVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "v{}{}", joined.join("."), self.suffix)
    }
}
