//! MIME type helpers shared by validation, naming and the CLI.

/// File extension used for stored objects of the given MIME type.
///
/// Unknown types fall back to `bin` so a name can always be produced.
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match normalize(content_type).as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/avif" => "avif",
        _ => "bin",
    }
}

/// Guess a MIME type from a filename's extension.
pub fn content_type_for_filename(filename: &str) -> Option<&'static str> {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())?;

    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "avif" => Some("image/avif"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Human-readable label for a MIME type, used in validation messages.
pub fn format_label(content_type: &str) -> String {
    match normalize(content_type).as_str() {
        "image/jpeg" | "image/jpg" => "JPEG".to_string(),
        "image/png" => "PNG".to_string(),
        "image/webp" => "WebP".to_string(),
        "image/gif" => "GIF".to_string(),
        "image/avif" => "AVIF".to_string(),
        other => other
            .rsplit('/')
            .next()
            .unwrap_or(other)
            .to_uppercase(),
    }
}

/// Lowercase a MIME type and drop any parameters (`; charset=...`).
pub fn normalize(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_maps_to_jpg_extension() {
        assert_eq!(extension_for_content_type("image/jpeg"), "jpg");
        assert_eq!(extension_for_content_type("IMAGE/JPEG; q=1"), "jpg");
        assert_eq!(extension_for_content_type("application/zip"), "bin");
    }

    #[test]
    fn guesses_content_type_from_extension() {
        assert_eq!(content_type_for_filename("photo.JPG"), Some("image/jpeg"));
        assert_eq!(content_type_for_filename("a/b/c.webp"), Some("image/webp"));
        assert_eq!(content_type_for_filename("notes.txt"), None);
        assert_eq!(content_type_for_filename("noextension"), None);
    }

    #[test]
    fn labels_are_human_readable() {
        assert_eq!(format_label("image/webp"), "WebP");
        assert_eq!(format_label("image/heic"), "HEIC");
    }
}
