use souk_core::{MediaFile, ValidationError, ValidationPolicy};

/// Media file validator
///
/// Fails closed: a file is rejected before any network or CPU-heavy work when it
/// is empty, larger than the policy allows, or of a type the policy does not list.
pub struct MediaValidator<'a> {
    policy: &'a ValidationPolicy,
}

impl<'a> MediaValidator<'a> {
    pub fn new(policy: &'a ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.policy.max_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                max_mb: self.policy.max_megabytes(),
            });
        }

        Ok(())
    }

    /// Validate content type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        if !self.policy.allows(content_type) {
            return Err(ValidationError::UnsupportedType {
                content_type: content_type.to_string(),
                allowed: self.policy.allowed_formats(),
            });
        }

        Ok(())
    }

    pub fn validate(&self, file: &MediaFile) -> Result<(), ValidationError> {
        self.validate_file_size(file.size())?;
        self.validate_content_type(&file.content_type)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_policy() -> ValidationPolicy {
        ValidationPolicy::from_megabytes(
            1,
            vec!["image/jpeg".to_string(), "image/png".to_string()],
        )
    }

    #[test]
    fn test_validate_file_size_ok() {
        let policy = test_policy();
        assert!(MediaValidator::new(&policy)
            .validate_file_size(512 * 1024)
            .is_ok());
    }

    #[test]
    fn test_validate_file_size_too_large_names_limit() {
        let policy = test_policy();
        let err = MediaValidator::new(&policy)
            .validate_file_size(2 * 1024 * 1024)
            .unwrap_err();
        assert!(err.to_string().contains("1MB"));
    }

    #[test]
    fn test_validate_file_size_exact_limit_is_allowed() {
        let policy = test_policy();
        assert!(MediaValidator::new(&policy)
            .validate_file_size(1024 * 1024)
            .is_ok());
    }

    #[test]
    fn test_validate_file_size_empty() {
        let policy = test_policy();
        assert_eq!(
            MediaValidator::new(&policy).validate_file_size(0),
            Err(ValidationError::EmptyFile)
        );
    }

    #[test]
    fn test_validate_content_type_lists_allowed_formats() {
        let policy = test_policy();
        let err = MediaValidator::new(&policy)
            .validate_content_type("image/gif")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("image/gif"));
        assert!(message.contains("JPEG, PNG"));
    }

    #[test]
    fn test_validate_content_type_case_insensitive() {
        let policy = test_policy();
        assert!(MediaValidator::new(&policy)
            .validate_content_type("IMAGE/PNG")
            .is_ok());
    }

    #[test]
    fn test_validate_checks_size_before_type() {
        let policy = test_policy();
        let file = MediaFile::new("big.gif", "image/gif", vec![0u8; 2 * 1024 * 1024]);
        assert!(matches!(
            MediaValidator::new(&policy).validate(&file),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }
}
