use regex::Regex;
use std::sync::OnceLock;

fn reasoning_block() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<think>.*?</think>").expect("regex for reasoning blocks")
    })
}

/// Remove every well-formed `<think>…</think>` span (any case, across lines)
/// and trim the result. Unterminated tags are left alone.
pub fn strip_reasoning(text: &str) -> String {
    reasoning_block().replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_inline_block() {
        assert_eq!(strip_reasoning("A<think>secret</think>B"), "AB");
    }

    #[test]
    fn removes_multiple_multiline_blocks_case_insensitively() {
        let raw = "<THINK>\nplan\n</Think>\n# Report\n<think>more</think>\nbody\n";
        assert_eq!(strip_reasoning(raw), "# Report\n\nbody");
    }

    #[test]
    fn text_without_tags_is_only_trimmed() {
        assert_eq!(strip_reasoning("  # Title\n\nbody \n"), "# Title\n\nbody");
    }

    #[test]
    fn unterminated_tag_is_kept() {
        assert_eq!(strip_reasoning("A<think>B"), "A<think>B");
    }
}
