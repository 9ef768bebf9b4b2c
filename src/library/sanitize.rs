/// Characters permitted in a track name, compared after ASCII lowercasing.
const ALLOWED_CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789_-()!?,. &";

/// Decide whether an untrusted name may be used as a single path segment
/// under the data directory.
///
/// Every character must be in [`ALLOWED_CHARS`] (case-insensitive, ASCII
/// only). The empty name, `.` and anything containing `..` are rejected too,
/// since they would resolve to the data directory itself or its parent.
pub fn is_allowed_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name.contains("..") {
        return false;
    }

    name.chars()
        .all(|c| c.is_ascii() && ALLOWED_CHARS.contains(c.to_ascii_lowercase()))
}
