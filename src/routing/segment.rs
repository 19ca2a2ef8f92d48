//! Identifier segmentation.
//!
//! # Responsibilities
//! - Split an upper-camel-case identifier into lowercase path segments
//! - Keep acronym runs (`JSON`, `ABBR`) together as one segment
//!
//! # Design Decisions
//! - Byte-wise walk: callers only pass ASCII identifiers (the name grammar
//!   rejects anything else before segmentation)
//! - A boundary is placed before an uppercase character unless it sits
//!   inside an acronym run, i.e. the previous character is uppercase and
//!   the next one is uppercase (or the end of the identifier)

/// Splits `ident` into lowercase segments.
///
/// ```
/// use wish::routing::segment::segments;
///
/// assert_eq!(segments("MultiPartRoute"), vec!["multi", "part", "route"]);
/// assert_eq!(segments("OtherJSON"), vec!["other", "json"]);
/// assert_eq!(segments("ABBRIncluded"), vec!["abbr", "included"]);
/// ```
pub fn segments(ident: &str) -> Vec<String> {
    let bytes = ident.as_bytes();
    if bytes.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut start = 0;

    // The character before index 0 counts as uppercase so the first
    // character never opens a boundary.
    let mut is_upper = true;
    let mut next_upper = bytes[0].is_ascii_uppercase();

    for i in 0..bytes.len() {
        let last_upper = is_upper;
        is_upper = next_upper;
        next_upper = i + 1 >= bytes.len() || bytes[i + 1].is_ascii_uppercase();

        if i > 0 && is_upper && (!last_upper || !next_upper) {
            out.push(ident[start..i].to_ascii_lowercase());
            start = i;
        }
    }

    out.push(ident[start..].to_ascii_lowercase());
    out
}

/// Strips a leading `Root` token.
///
/// `Root` only counts as a token when it is followed by the end of the
/// identifier or by the start of another word, so `Rooted` is left alone.
pub fn strip_root(ident: &str) -> &str {
    match ident.strip_prefix("Root") {
        Some(rest) if rest.is_empty() => rest,
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase() || c.is_ascii_digit()) => {
            rest
        }
        _ => ident,
    }
}
