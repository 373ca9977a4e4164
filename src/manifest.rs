//! Build manifest (`docsnip.toml`) listing the snippets a docs build renders.

use std::collections::HashSet;
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::extract::extract;
use crate::render::{render_code_block, Language};

pub const DEFAULT_MANIFEST: &str = "docsnip.toml";
const OUTPUT_ENV: &str = "DOCSNIP_OUTPUT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default, rename = "snippet")]
    pub snippets: Vec<SnippetSpec>,
    /// Directory relative paths resolve against. Set by [`Manifest::load`].
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Defaults {
    #[serde(default = "Defaults::default_output")]
    pub output: PathBuf,
    #[serde(default = "Defaults::default_extension")]
    pub extension: String,
}

impl Defaults {
    fn default_output() -> PathBuf {
        PathBuf::from("snippets")
    }

    fn default_extension() -> String {
        "mdx".into()
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: Self::default_output(),
            extension: Self::default_extension(),
        }
    }
}

/// One `[[snippet]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnippetSpec {
    pub name: String,
    pub source: PathBuf,
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub title: Option<String>,
}

/// A rendered snippet waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub name: String,
    pub path: PathBuf,
    pub contents: String,
}

impl Manifest {
    /// Load a manifest file, applying the `DOCSNIP_OUTPUT` override.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        let mut manifest = Self::from_str(&data)
            .with_context(|| format!("invalid manifest: {}", path.display()))?;
        manifest.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(apply_env_override(manifest, env::var(OUTPUT_ENV).ok()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse TOML manifest")?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for spec in &self.snippets {
            if spec.name.trim().is_empty() {
                bail!("snippet with source {} has an empty name", spec.source.display());
            }
            if Path::new(&spec.name).file_name() != Some(OsStr::new(&spec.name)) {
                bail!("snippet name must be a plain file stem: {}", spec.name);
            }
            if !seen.insert(spec.name.as_str()) {
                bail!("duplicate snippet name: {}", spec.name);
            }
        }
        Ok(())
    }

    /// Output directory, resolved against the manifest root unless overridden.
    pub fn output_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => self.root.join(&self.defaults.output),
        }
    }

    /// Render every entry. Nothing is returned unless all entries succeed.
    pub fn render_all(&self, output_dir: &Path) -> Result<Vec<Rendered>> {
        self.snippets
            .iter()
            .map(|spec| self.render_one(spec, output_dir))
            .collect()
    }

    fn render_one(&self, spec: &SnippetSpec, output_dir: &Path) -> Result<Rendered> {
        let source_path = self.root.join(&spec.source);
        let source = fs::read_to_string(&source_path).with_context(|| {
            format!(
                "snippet {}: failed to read {}",
                spec.name,
                source_path.display()
            )
        })?;

        let language = match spec.language {
            Some(language) => language,
            None => Language::from_path(&spec.source).with_context(|| {
                format!(
                    "snippet {}: cannot infer language from {}; set `language`",
                    spec.name,
                    spec.source.display()
                )
            })?,
        };

        let snippet = extract(&source, spec.marker.as_deref())
            .with_context(|| format!("snippet {}: {}", spec.name, source_path.display()))?;

        tracing::debug!(snippet = %spec.name, source = %source_path.display(), "rendered");

        Ok(Rendered {
            name: spec.name.clone(),
            path: output_dir.join(format!("{}.{}", spec.name, self.defaults.extension)),
            contents: render_code_block(&snippet, language, spec.title.as_deref()),
        })
    }
}

fn apply_env_override(mut manifest: Manifest, output: Option<String>) -> Manifest {
    if let Some(output) = output.filter(|o| !o.is_empty()) {
        manifest.defaults.output = PathBuf::from(output);
    }
    manifest
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[defaults]
output = "docs/snippets"

[[snippet]]
name = "hello"
source = "src/hello.go"
marker = "hello"
title = "hello.go"

[[snippet]]
name = "whole"
source = "src/index.ts"
language = "typescript"
"#;

    #[test]
    fn parses_entries_and_defaults() {
        let m = Manifest::from_str(MANIFEST).unwrap();
        assert_eq!(m.defaults.output, PathBuf::from("docs/snippets"));
        assert_eq!(m.defaults.extension, "mdx");
        assert_eq!(m.snippets.len(), 2);
        assert_eq!(m.snippets[0].marker.as_deref(), Some("hello"));
        assert_eq!(m.snippets[0].language, None);
        assert_eq!(m.snippets[1].language, Some(Language::TypeScript));
    }

    #[test]
    fn empty_manifest_uses_defaults() {
        let m = Manifest::from_str("").unwrap();
        assert_eq!(m.defaults, Defaults::default());
        assert!(m.snippets.is_empty());
    }

    #[test]
    fn rejects_duplicate_names() {
        let toml = r#"
[[snippet]]
name = "a"
source = "x.go"

[[snippet]]
name = "a"
source = "y.go"
"#;
        let err = Manifest::from_str(toml).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate snippet name: a"));
    }

    #[test]
    fn rejects_path_like_names() {
        for name in ["../../escaped", "/tmp/abs", "nested/name", "..", "."] {
            let toml = format!("[[snippet]]\nname = \"{name}\"\nsource = \"x.go\"\n");
            let err = Manifest::from_str(&toml).unwrap_err();
            assert!(
                format!("{err:#}").contains("plain file stem"),
                "{name} accepted: {err:#}"
            );
        }
    }

    #[test]
    fn rejects_unknown_language() {
        let toml = r#"
[[snippet]]
name = "a"
source = "x.py"
language = "python"
"#;
        assert!(Manifest::from_str(toml).is_err());
    }

    #[test]
    fn env_override_replaces_output() {
        let m = Manifest::from_str(MANIFEST).unwrap();
        let m = apply_env_override(m, Some("out".into()));
        assert_eq!(m.defaults.output, PathBuf::from("out"));
    }

    #[test]
    fn empty_env_override_is_ignored() {
        let m = Manifest::from_str(MANIFEST).unwrap();
        let m = apply_env_override(m, Some(String::new()));
        assert_eq!(m.defaults.output, PathBuf::from("docs/snippets"));
    }

    #[test]
    fn renders_entries_relative_to_root() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::create_dir_all(temp.path().join("src"))?;
        fs::write(
            temp.path().join("src/hello.go"),
            "package main\n\nfunc main() {\n\t// snippet-start: hello\n\tfmt.Println(\"hello\")\n\t// snippet-end: hello\n}\n",
        )?;
        fs::write(
            temp.path().join("src/index.ts"),
            "// snippet-start: a\nconst a = 1;\n// snippet-end: a\n",
        )?;

        let mut m = Manifest::from_str(MANIFEST)?;
        m.root = temp.path().to_path_buf();
        let out = m.output_dir(None);
        let rendered = m.render_all(&out)?;

        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].path, temp.path().join("docs/snippets/hello.mdx"));
        assert_eq!(
            rendered[0].contents,
            "```go title=\"hello.go\"\nfmt.Println(\"hello\")\n```\n"
        );
        assert_eq!(rendered[1].contents, "```typescript\nconst a = 1;\n```\n");
        Ok(())
    }

    #[test]
    fn broken_entry_names_the_snippet() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join("a.go"), "// snippet-start: x\nbody\n")?;
        let mut m = Manifest::from_str(
            "[[snippet]]\nname = \"broken\"\nsource = \"a.go\"\nmarker = \"x\"\n",
        )?;
        m.root = temp.path().to_path_buf();

        let err = m.render_all(temp.path()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("snippet broken"), "got: {msg}");
        assert!(msg.contains("End marker not found: x"), "got: {msg}");
        Ok(())
    }

    #[test]
    fn missing_language_is_an_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join("notes.txt"), "hello")?;
        let mut m =
            Manifest::from_str("[[snippet]]\nname = \"n\"\nsource = \"notes.txt\"\n")?;
        m.root = temp.path().to_path_buf();

        let err = m.render_all(temp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("cannot infer language"));
        Ok(())
    }
}
