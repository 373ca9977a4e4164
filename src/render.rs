//! Docusaurus code-block rendering.
//!
//! Produces the fenced block MDX pages embed: a backtick fence, the language
//! tag and an optional `title="..."` attribute, then the snippet.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Languages the documentation highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Language {
    Go,
    TypeScript,
}

impl Language {
    /// Infer the language from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("go") => Some(Language::Go),
            Some("ts" | "tsx" | "mts" | "cts") => Some(Language::TypeScript),
            _ => None,
        }
    }

    /// Info-string tag used after the opening fence.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::TypeScript => "typescript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "go" | "golang" => Ok(Language::Go),
            "typescript" | "ts" => Ok(Language::TypeScript),
            other => Err(format!(
                "unknown language: {}. Use go or typescript",
                other
            )),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Wrap `snippet` in a fenced code block with an optional title.
pub fn render_code_block(snippet: &str, language: Language, title: Option<&str>) -> String {
    let fence = "`".repeat(fence_len(snippet));

    let mut out = String::new();
    out.push_str(&fence);
    out.push_str(language.tag());
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        out.push_str(&format!(" title=\"{}\"", escape_title(title)));
    }
    out.push('\n');
    if !snippet.is_empty() {
        out.push_str(snippet);
        out.push('\n');
    }
    out.push_str(&fence);
    out.push('\n');
    out
}

/// Three backticks, or one more than the longest run inside the snippet.
fn fence_len(snippet: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for c in snippet.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    (longest + 1).max(3)
}

fn escape_title(title: &str) -> String {
    title.replace('\\', "\\\\").replace('"', "\\\"")
}
