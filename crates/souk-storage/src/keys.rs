//! Storage key generation and path sanitization.
//!
//! Path format: `{owner_id}/{listings|profile}/{millis}-{token}.{ext}`.

use rand::Rng;
use souk_core::content_types::extension_for_content_type;
use souk_core::UploadPurpose;

const TOKEN_LEN: usize = 8;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a collision-resistant filename: `{millis}-{token}.{ext}`.
///
/// No uniqueness check against the store is made; the millisecond timestamp
/// plus a random base36 token is enough for a single user's upload rate.
pub fn generate_filename(content_type: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    format!(
        "{}-{}.{}",
        millis,
        random_token(TOKEN_LEN),
        extension_for_content_type(content_type)
    )
}

fn random_token(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

/// Build the sanitized object path for an upload.
pub fn storage_path(owner_id: &str, purpose: UploadPurpose, filename: &str) -> String {
    sanitize_path(&format!(
        "{}/{}/{}",
        owner_id,
        purpose.path_segment(),
        filename
    ))
}

/// Sanitize a storage path.
///
/// Steps run in this order: drop every character outside `[a-zA-Z0-9-_./]`,
/// collapse runs of `.` to one `.`, collapse runs of `/` to one `/`, then trim
/// leading and trailing `/`. Stripping first means removed characters cannot
/// leave behind a `..` that a later step would miss.
pub fn sanitize_path(path: &str) -> String {
    let allowed: String = path
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
        .collect();

    let dots = collapse_runs(&allowed, '.');
    let slashes = collapse_runs(&dots, '/');
    slashes.trim_matches('/').to_string()
}

fn collapse_runs(input: &str, ch: char) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous = None;
    for c in input.chars() {
        if c == ch && previous == Some(ch) {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_sequences_are_removed() {
        let sanitized = sanitize_path("abc/../../etc/passwd");
        assert!(!sanitized.contains(".."));
        assert!(!sanitized.starts_with('/'));
        assert_eq!(sanitized, "abc/././etc/passwd");
    }

    #[test]
    fn strips_illegal_characters_before_collapsing() {
        // ". ." only becomes ".." once the space is stripped
        assert_eq!(sanitize_path("a/. ./b"), "a/./b");
        assert_eq!(sanitize_path("owner id/listings/x.jpg"), "ownerid/listings/x.jpg");
        assert_eq!(sanitize_path("é/ü?x#.png"), "x.png");
    }

    #[test]
    fn collapses_and_trims_slashes() {
        assert_eq!(sanitize_path("//owner///profile//f.png/"), "owner/profile/f.png");
        assert_eq!(sanitize_path("/"), "");
    }

    #[test]
    fn filename_shape() {
        let name = generate_filename("image/jpeg");
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "jpg");
        let (millis, token) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn filenames_generated_back_to_back_differ() {
        let first = generate_filename("image/png");
        let second = generate_filename("image/png");
        assert_ne!(first, second);
    }

    #[test]
    fn storage_path_layout() {
        let path = storage_path("user-42", UploadPurpose::Listing, "1700000000000-abc.jpg");
        assert_eq!(path, "user-42/listings/1700000000000-abc.jpg");

        let path = storage_path("../user", UploadPurpose::Profile, "f.png");
        assert_eq!(path, "./user/profile/f.png");
        assert!(!path.contains(".."));
    }
}
