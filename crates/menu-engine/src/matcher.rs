//! Keyword containment matching.

/// Check whether `text` contains any of the keywords (case-insensitive).
///
/// An empty keyword list never matches, and blank keywords are skipped.
pub fn matches_keywords<K: AsRef<str>>(text: &str, keywords: &[K]) -> bool {
    if keywords.is_empty() {
        return false;
    }

    let haystack = text.trim().to_lowercase();
    keywords.iter().any(|kw| {
        let kw = kw.as_ref().trim();
        !kw.is_empty() && haystack.contains(&kw.to_lowercase())
    })
}
