//! docsnip — extract and render documentation snippets from example sources.
//!
//! Subcommands:
//!
//! - `docsnip extract main.go -m handler` prints the snippet
//! - `docsnip render main.go -m handler -t main.go` prints a fenced code block
//! - `docsnip list examples/*.go` lists markers with line numbers
//! - `docsnip check examples/` reports every broken marker
//! - `docsnip build -c docsnip.toml` renders every manifest entry to disk

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use docsnip::manifest::{Manifest, DEFAULT_MANIFEST};
use docsnip::render::{render_code_block, Language};
use docsnip::scan;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "docsnip",
    about = "Extract marker-delimited snippets from example sources for documentation"
)]
struct Cli {
    /// Log progress to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a snippet. Reads stdin when no file is given.
    Extract {
        file: Option<PathBuf>,

        /// Marker name. Without it the whole file is printed minus snippet annotations.
        #[arg(short = 'm', long)]
        marker: Option<String>,
    },

    /// Print a snippet wrapped in a fenced code block.
    Render {
        file: Option<PathBuf>,

        #[arg(short = 'm', long)]
        marker: Option<String>,

        /// go or typescript. Inferred from the file extension when omitted.
        #[arg(short = 'l', long)]
        language: Option<Language>,

        /// Title shown above the code block
        #[arg(short = 't', long)]
        title: Option<String>,
    },

    /// List snippet markers with their line numbers.
    List {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit JSON instead of tab-separated lines
        #[arg(long)]
        json: bool,
    },

    /// Validate every marker in the given files, directories or glob patterns.
    Check {
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Render every snippet listed in a manifest.
    Build {
        /// Manifest file
        #[arg(short = 'c', long, default_value = DEFAULT_MANIFEST)]
        config: PathBuf,

        /// Output directory (overrides the manifest and DOCSNIP_OUTPUT)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Extract { file, marker } => {
            let source = read_source(file.as_deref())?;
            let snippet = docsnip::extract(&source, marker.as_deref())?;
            println!("{}", snippet);
        }
        Command::Render {
            file,
            marker,
            language,
            title,
        } => {
            let language = match language {
                Some(language) => language,
                None => infer_language(file.as_deref())?,
            };
            let source = read_source(file.as_deref())?;
            let snippet = docsnip::extract(&source, marker.as_deref())?;
            print!("{}", render_code_block(&snippet, language, title.as_deref()));
        }
        Command::List { files, json } => list(&files, json)?,
        Command::Check { patterns } => check(&patterns)?,
        Command::Build { config, output } => build(&config, output.as_deref())?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

/// Read a source file, or stdin when no path is given.
fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn infer_language(file: Option<&Path>) -> Result<Language> {
    let path = file.context("--language is required when reading from stdin")?;
    Language::from_path(path).with_context(|| {
        format!(
            "cannot infer language from {}; pass --language",
            path.display()
        )
    })
}

fn list(files: &[PathBuf], json: bool) -> Result<()> {
    let mut listed = Vec::new();
    for path in files {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        listed.push((path, scan::scan_markers(&source)));
    }

    if json {
        let value: Vec<_> = listed
            .iter()
            .map(|(path, markers)| {
                serde_json::json!({
                    "file": path.display().to_string(),
                    "markers": markers,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let many = listed.len() > 1;
    for (path, markers) in &listed {
        for m in markers {
            if many {
                print!("{}\t", path.display());
            }
            println!(
                "{}\t{}\t{}",
                m.name,
                line_or_dash(m.start_line),
                line_or_dash(m.end_line)
            );
        }
    }
    Ok(())
}

fn line_or_dash(line: Option<usize>) -> String {
    line.map(|n| n.to_string()).unwrap_or_else(|| "-".into())
}

fn check(patterns: &[String]) -> Result<()> {
    let files = expand_globs(patterns)?;
    if files.is_empty() {
        bail!("no source files found");
    }

    let mut broken = 0usize;
    for path in &files {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let failures = scan::check_source(&source);
        tracing::debug!(file = %path.display(), failures = failures.len(), "checked");
        for (name, err) in failures {
            eprintln!("{}: {}: {}", path.display(), name, err);
            broken += 1;
        }
    }

    if broken > 0 {
        bail!("{} broken snippet marker(s) in {} file(s) checked", broken, files.len());
    }
    Ok(())
}

fn build(config: &Path, output: Option<&Path>) -> Result<()> {
    let manifest = Manifest::load(config)?;
    let output_dir = manifest.output_dir(output);
    let rendered = manifest.render_all(&output_dir)?;

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory: {}", output_dir.display())
    })?;
    for snippet in &rendered {
        fs::write(&snippet.path, &snippet.contents)
            .with_context(|| format!("failed to write {}", snippet.path.display()))?;
        tracing::debug!(snippet = %snippet.name, path = %snippet.path.display(), "wrote");
    }
    Ok(())
}

/// Expand glob patterns into a list of real file paths.
/// Bare directories are scanned (non-recursively) for sources `render` can highlight.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            files.extend(highlightable_sources(path)?);
        } else {
            files.extend(glob_files(pattern)?);
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn highlightable_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;
    Ok(entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && Language::from_path(p).is_some())
        .collect())
}

fn glob_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let matches: Vec<_> = glob::glob(pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    if matches.is_empty() {
        tracing::warn!("no files matched: {}", pattern);
    }
    Ok(matches)
}
