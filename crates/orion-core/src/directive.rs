//! Detection of explicit memory-storage directives in user input.

/// Fragment kinds recognized in a storage directive, longest phrasing first
/// so "journal entry" is not split by a shorter match.
const MEMORY_KINDS: &[&str] = &[
    "journal entry",
    "voice log",
    "key event",
    "thought",
    "dream",
    "goal",
];

/// Extracts the content of a "store this thought about ..." style directive
/// from the normalized input. Returns `None` when the input is not a storage
/// directive or nothing remains after stripping the framing words.
pub fn memory_directive(normalized: &str) -> Option<String> {
    if !normalized.contains("store") {
        return None;
    }

    let mut rest = normalized.to_string();
    for kind in MEMORY_KINDS {
        let long = format!("store this {kind} about");
        let short = format!("store {kind} about");
        if rest.contains(&long) {
            rest = rest.replacen(&long, "", 1);
            break;
        }
        if rest.contains(&short) {
            rest = rest.replacen(&short, "", 1);
            break;
        }
    }
    // drop a bare leading "store" for directives without a kind
    rest = rest.replacen("store", "", 1);
    let rest = rest.trim();

    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_kinded_directive() {
        assert_eq!(
            memory_directive("store this thought about the launch"),
            Some("the launch".to_string())
        );
        assert_eq!(
            memory_directive("store dream about flying over neo-tokyo"),
            Some("flying over neo-tokyo".to_string())
        );
        assert_eq!(
            memory_directive("store this journal entry about day one"),
            Some("day one".to_string())
        );
    }

    #[test]
    fn extracts_bare_store_directive() {
        assert_eq!(
            memory_directive("store the coordinates"),
            Some("the coordinates".to_string())
        );
    }

    #[test]
    fn non_directives_pass_through() {
        assert_eq!(memory_directive("tell me about the weather"), None);
        assert_eq!(memory_directive("what is in the app store"), Some("what is in the app".to_string()));
    }

    #[test]
    fn empty_remainder_is_not_a_directive() {
        assert_eq!(memory_directive("store"), None);
        assert_eq!(memory_directive("store this thought about"), None);
    }
}
