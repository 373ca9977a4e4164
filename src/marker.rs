//! Line grammar for snippet and cut annotations.
//!
//! Annotations are `//` line comments of the form `snippet-start: <name>`,
//! `snippet-end: <name>`, `cut-start: <name>` and `cut-end: <name>`.
//! Whitespace around the comment marker, keyword and colon is insignificant.

use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_NAMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*//\s*(snippet|cut)-(start|end)\s*:\s*(\S+)\s*$").unwrap()
});

// Any snippet-start/end line, named or not. Used to drop scaffolding.
static RE_SNIPPET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*//\s*snippet-(?:start|end)\s*:").unwrap());

/// Kind of annotation a line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    SnippetStart,
    SnippetEnd,
    CutStart,
    CutEnd,
}

/// A classified annotation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation<'a> {
    pub kind: Kind,
    pub name: &'a str,
}

impl Annotation<'_> {
    /// True when this annotation is of `kind` and names exactly `marker`.
    pub fn is(&self, kind: Kind, marker: &str) -> bool {
        self.kind == kind && self.name == marker
    }
}

/// Classify a line as a named annotation.
pub fn classify(line: &str) -> Option<Annotation<'_>> {
    let caps = RE_NAMED.captures(line)?;
    let kind = match (&caps[1], &caps[2]) {
        ("snippet", "start") => Kind::SnippetStart,
        ("snippet", "end") => Kind::SnippetEnd,
        ("cut", "start") => Kind::CutStart,
        _ => Kind::CutEnd,
    };
    let name = caps.get(3).map(|m| m.as_str())?;
    Some(Annotation { kind, name })
}

/// True for any `snippet-start:` / `snippet-end:` line, whatever follows the colon.
pub fn is_snippet_annotation(line: &str) -> bool {
    RE_SNIPPET_PREFIX.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_snippet_start() {
        let a = classify("// snippet-start: handler").unwrap();
        assert_eq!(a.kind, Kind::SnippetStart);
        assert_eq!(a.name, "handler");
    }

    #[test]
    fn classifies_cut_end_with_loose_spacing() {
        let a = classify("    //cut-end :   id   ").unwrap();
        assert_eq!(a.kind, Kind::CutEnd);
        assert_eq!(a.name, "id");
    }

    #[test]
    fn tolerates_carriage_return() {
        let a = classify("// snippet-end: test\r").unwrap();
        assert_eq!(a.kind, Kind::SnippetEnd);
        assert_eq!(a.name, "test");
    }

    #[test]
    fn name_must_be_single_token() {
        assert!(classify("// snippet-start: two words").is_none());
    }

    #[test]
    fn name_is_required() {
        assert!(classify("// snippet-start:").is_none());
    }

    #[test]
    fn ignores_ordinary_comments() {
        assert!(classify("// just a comment").is_none());
        assert!(classify("# snippet-start: shell").is_none());
        assert!(classify("let x = 1; // snippet-start: trailing").is_none());
    }

    #[test]
    fn exact_name_match() {
        let a = classify("// snippet-start: test1").unwrap();
        assert!(a.is(Kind::SnippetStart, "test1"));
        assert!(!a.is(Kind::SnippetStart, "test"));
        assert!(!a.is(Kind::SnippetEnd, "test1"));
    }

    #[test]
    fn generic_prefix_matches_any_name() {
        assert!(is_snippet_annotation("// snippet-start: a"));
        assert!(is_snippet_annotation("  // snippet-end: two words"));
        assert!(is_snippet_annotation("// snippet-end:"));
        assert!(!is_snippet_annotation("// cut-start: a"));
        assert!(!is_snippet_annotation("console.log('snippet-start:')"));
    }
}
