//! Name normalization shared by the index, the resolver and the matcher.

/// Separator that replaces every run of non-alphanumeric characters.
pub const SEPARATOR: char = '_';

/// Canonicalize text for case/punctuation-insensitive comparison.
///
/// Lowercases, turns every run of non-alphanumeric characters into a single
/// [`SEPARATOR`] and strips leading/trailing separators. Idempotent.
///
/// ```
/// use homeref_domain::name::normalize;
///
/// assert_eq!(normalize("Living Room"), "living_room");
/// assert_eq!(normalize("light.Office--Tube "), "light_office_tube");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_separator = false;

    for ch in text.chars() {
        if !ch.is_alphanumeric() {
            pending_separator = true;
            continue;
        }
        if pending_separator && !out.is_empty() {
            out.push(SEPARATOR);
        }
        pending_separator = false;
        // Some lowercase mappings expand to combining marks; drop those so a
        // second pass sees the same characters.
        out.extend(ch.to_lowercase().filter(|c| c.is_alphanumeric()));
    }

    out
}

/// Split an already-normalized token into its words.
pub fn words(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(SEPARATOR).filter(|word| !word.is_empty())
}
