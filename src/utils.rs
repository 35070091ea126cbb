//! Text normalization helpers shared by the normalizer and the classifier.

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_inline_whitespace<T: AsRef<str>>(text: T) -> String {
    let mut normalized = String::new();
    let mut seen_space = false;
    for ch in text.as_ref().chars() {
        if ch.is_whitespace() {
            if !seen_space {
                normalized.push(' ');
                seen_space = true;
            }
        } else {
            normalized.push(ch);
            seen_space = false;
        }
    }
    normalized.trim().to_string()
}

/// Reduce free text to a lowercase `[a-z ]` key for keyword matching.
///
/// `&` is spelled out as `and`; every other non-letter becomes a space and
/// runs of spaces are collapsed.
pub fn normalize_key<T: AsRef<str>>(text: T) -> String {
    let lowered = text.as_ref().to_lowercase().replace('&', " and ");
    let mut key = String::with_capacity(lowered.len());
    let mut seen_space = true;
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() {
            key.push(ch);
            seen_space = false;
        } else if !seen_space {
            key.push(' ');
            seen_space = true;
        }
    }
    if key.ends_with(' ') {
        key.pop();
    }
    key
}

/// Clean a raw header cell: trim, newlines to spaces, collapse double spaces.
pub fn clean_header<T: AsRef<str>>(header: T) -> String {
    normalize_inline_whitespace(header.as_ref().replace(['\n', '\r'], " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_inline_whitespace_collapses_runs() {
        let input = "Alpha\n\n  Beta\tGamma";
        assert_eq!(normalize_inline_whitespace(input), "Alpha Beta Gamma");
    }

    #[test]
    fn normalize_key_keeps_only_letters_and_single_spaces() {
        assert_eq!(normalize_key("Solar-Wind Hybrid Park"), "solar wind hybrid park");
        assert_eq!(normalize_key("  NTPC  REL (100 MW) "), "ntpc rel mw");
        assert_eq!(normalize_key("Coal & India"), "coal and india");
        assert_eq!(normalize_key("12345"), "");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn clean_header_flattens_multiline_headers() {
        assert_eq!(clean_header(" Capacity\n(MW) "), "Capacity (MW)");
        assert_eq!(clean_header("Name of  the Developer"), "Name of the Developer");
    }
}
