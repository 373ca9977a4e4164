//! Snippet extraction — single pass over the source lines.
//!
//! Locates the requested marker pair, walks the lines between them while
//! tracking cut regions, then strips the indentation shared by the kept lines.

use crate::error::{Boundary, SnippetError};
use crate::marker::{self, Kind};

/// Extract a snippet from `source`.
///
/// With no marker (or an empty one) the whole source is returned with every
/// `snippet-start:`/`snippet-end:` line removed. With a marker, only the lines
/// between its start and end annotations are returned, minus cut regions and
/// shared indentation.
pub fn extract(source: &str, marker: Option<&str>) -> Result<String, SnippetError> {
    let lines = split_lines(source);

    match marker {
        Some(name) if !name.is_empty() => extract_marker(&lines, name),
        _ => Ok(strip_annotations(&lines)),
    }
}

/// Split on `\n`, ignoring a leading byte-order mark.
pub(crate) fn split_lines(source: &str) -> Vec<&str> {
    source
        .strip_prefix('\u{feff}')
        .unwrap_or(source)
        .split('\n')
        .collect()
}

fn strip_annotations(lines: &[&str]) -> String {
    lines
        .iter()
        .copied()
        .filter(|line| !marker::is_snippet_annotation(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn extract_marker(lines: &[&str], name: &str) -> Result<String, SnippetError> {
    let (start, end) = locate(lines, name)?;

    let mut kept: Vec<&str> = Vec::new();
    let mut in_cut = false;

    // An end before the start leaves nothing to walk.
    let body = lines.get(start + 1..end).unwrap_or(&[]);
    for &line in body {
        match marker::classify(line) {
            Some(a) if a.is(Kind::CutStart, name) => {
                if in_cut {
                    return Err(SnippetError::DuplicateCutStart {
                        marker: name.to_string(),
                    });
                }
                in_cut = true;
            }
            Some(a) if a.is(Kind::CutEnd, name) => {
                if !in_cut {
                    return Err(SnippetError::UnmatchedCutEnd {
                        marker: name.to_string(),
                    });
                }
                in_cut = false;
            }
            _ => {
                if !in_cut && !marker::is_snippet_annotation(line) {
                    kept.push(line);
                }
            }
        }
    }

    if in_cut {
        return Err(SnippetError::UnclosedCutRegion {
            marker: name.to_string(),
        });
    }

    Ok(dedent(&kept).join("\n").trim().to_string())
}

/// Find the first start and end lines of `name`, enforcing exactly one of each.
fn locate(lines: &[&str], name: &str) -> Result<(usize, usize), SnippetError> {
    let mut start: Option<usize> = None;
    let mut end: Option<usize> = None;
    let mut start_count = 0usize;
    let mut end_count = 0usize;

    for (i, line) in lines.iter().enumerate() {
        let Some(a) = marker::classify(line) else {
            continue;
        };
        if a.is(Kind::SnippetStart, name) {
            start_count += 1;
            start.get_or_insert(i);
        } else if a.is(Kind::SnippetEnd, name) {
            end_count += 1;
            end.get_or_insert(i);
        }
    }

    let not_found = |boundary| SnippetError::MarkerNotFound {
        marker: name.to_string(),
        boundary,
    };
    let start = start.ok_or_else(|| not_found(Boundary::Start))?;
    let end = end.ok_or_else(|| not_found(Boundary::End))?;

    if start_count > 1 || end_count > 1 {
        return Err(SnippetError::DuplicateMarker {
            marker: name.to_string(),
        });
    }

    Ok((start, end))
}

/// Remove the leading whitespace shared by all non-blank lines.
fn dedent<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|&line| leading_whitespace(line))
        .min()
        .unwrap_or(0);

    lines.iter().map(|&line| skip_chars(line, indent)).collect()
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Drop the first `n` characters, or everything if the line is shorter.
fn skip_chars(line: &str, n: usize) -> &str {
    match line.char_indices().nth(n) {
        Some((offset, _)) => &line[offset..],
        None => "",
    }
}
