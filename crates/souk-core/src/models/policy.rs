use crate::content_types::{format_label, normalize};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Size and type limits applied to a file before any other work happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl ValidationPolicy {
    pub const DEFAULT_ALLOWED_CONTENT_TYPES: &'static [&'static str] =
        &["image/jpeg", "image/png", "image/webp"];

    pub fn new(max_bytes: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_bytes,
            allowed_content_types: allowed_content_types
                .iter()
                .map(|ct| normalize(ct))
                .collect(),
        }
    }

    pub fn from_megabytes(max_mb: u64, allowed_content_types: Vec<String>) -> Self {
        Self::new(max_mb * BYTES_PER_MB, allowed_content_types)
    }

    /// Default policy for listing images: 10 MB, JPEG/PNG/WebP.
    pub fn listing_default() -> Self {
        Self::from_megabytes(10, Self::default_types())
    }

    /// Default policy for profile photos: 5 MB, JPEG/PNG/WebP.
    pub fn profile_default() -> Self {
        Self::from_megabytes(5, Self::default_types())
    }

    /// Limit expressed in MB for error messages (one decimal when not whole).
    pub fn max_megabytes(&self) -> String {
        if self.max_bytes % BYTES_PER_MB == 0 {
            (self.max_bytes / BYTES_PER_MB).to_string()
        } else {
            format!("{:.1}", self.max_bytes as f64 / BYTES_PER_MB as f64)
        }
    }

    /// Accepted formats as a readable list, e.g. "JPEG, PNG, WebP".
    pub fn allowed_formats(&self) -> String {
        self.allowed_content_types
            .iter()
            .map(|ct| format_label(ct))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn allows(&self, content_type: &str) -> bool {
        let normalized = normalize(content_type);
        self.allowed_content_types.iter().any(|ct| *ct == normalized)
    }

    fn default_types() -> Vec<String> {
        Self::DEFAULT_ALLOWED_CONTENT_TYPES
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let listing = ValidationPolicy::listing_default();
        assert_eq!(listing.max_bytes, 10 * 1024 * 1024);
        assert_eq!(listing.max_megabytes(), "10");
        assert_eq!(listing.allowed_formats(), "JPEG, PNG, WebP");

        let profile = ValidationPolicy::profile_default();
        assert_eq!(profile.max_megabytes(), "5");
    }

    #[test]
    fn fractional_megabytes() {
        let policy = ValidationPolicy::new(1536 * 1024, vec!["image/png".into()]);
        assert_eq!(policy.max_megabytes(), "1.5");
    }

    #[test]
    fn allows_is_case_insensitive() {
        let policy = ValidationPolicy::listing_default();
        assert!(policy.allows("IMAGE/JPEG"));
        assert!(policy.allows("image/png; charset=binary"));
        assert!(!policy.allows("image/gif"));
    }
}
