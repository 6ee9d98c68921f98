//! Naming function
//!
//! Maps an entry's metadata, its position in the batch and the batch-wide
//! prefix onto the filename it will be renamed to. Everything here is pure:
//! the same inputs always produce byte-identical output.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Fixed letter every prefix starts with
pub const PREFIX_LETTER: char = 'C';

/// Tag segment used when an entry carries no tags
pub const NO_TAGS: &str = "NOTAGS";

/// Characters that cannot appear in a filename on at least one platform
pub const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Build the effective prefix for a user-supplied code.
///
/// Non-alphanumeric characters are dropped from the code before it is joined
/// to [`PREFIX_LETTER`], so `"4-2"` and `"42"` both yield `"C42"`.
#[must_use]
pub fn prefix_for(code: &str) -> String {
    format!("{PREFIX_LETTER}{}", sanitize_code(code))
}

/// Keep only the ASCII alphanumerics of a prefix code.
#[must_use]
pub fn sanitize_code(code: &str) -> String {
    code.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Remove filesystem-illegal characters from a suffix.
#[must_use]
pub fn sanitize_suffix(input: &str) -> String {
    input
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Tags end up in the file name, so they obey the suffix rules.
#[must_use]
pub fn sanitize_tag(input: &str) -> String {
    sanitize_suffix(input)
}

/// Format a capture date as `YYYYMMDD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Compute the new base name (without extension) for one entry.
///
/// `index` is the zero-based position of the entry in the batch and `total`
/// the batch size. A batch of one never carries an index segment.
#[must_use]
pub fn compute_name(
    prefix: &str,
    tags: &[String],
    date: NaiveDate,
    suffix: &str,
    index: usize,
    total: usize,
) -> String {
    let mut name = String::with_capacity(prefix.len() + 32);
    name.push_str(prefix);
    name.push('_');

    if tags.is_empty() {
        name.push_str(NO_TAGS);
    } else {
        name.push_str(&tags.join("-"));
    }

    name.push('_');
    name.push_str(&format_date(date));

    if total > 1 {
        name.push('_');
        name.push_str(&(index + 1).to_string());
    }

    if !suffix.is_empty() {
        name.push('_');
        name.push_str(suffix);
    }

    name
}

/// Path a file ends up at once renamed: same directory, new base name,
/// original extension.
#[must_use]
pub fn target_path(source: &Path, computed_name: &str) -> PathBuf {
    let file_name = match source.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{computed_name}.{ext}"),
        _ => computed_name.to_string(),
    };

    source.with_file_name(file_name)
}
