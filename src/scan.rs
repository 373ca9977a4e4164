//! Marker inventory and whole-file validation.

use crate::error::SnippetError;
use crate::extract::{extract, split_lines};
use crate::marker::{self, Kind};
use serde::Serialize;

/// A snippet marker found in a source file. Line numbers are 1-based and
/// point at the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerInfo {
    pub name: String,
    pub start_line: Option<usize>,
    pub end_line: Option<usize>,
    pub starts: usize,
    pub ends: usize,
}

impl MarkerInfo {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start_line: None,
            end_line: None,
            starts: 0,
            ends: 0,
        }
    }
}

/// List every snippet name in `source`, in order of first appearance.
pub fn scan_markers(source: &str) -> Vec<MarkerInfo> {
    let mut markers: Vec<MarkerInfo> = Vec::new();

    for (i, line) in split_lines(source).into_iter().enumerate() {
        let Some(a) = marker::classify(line) else {
            continue;
        };
        if !matches!(a.kind, Kind::SnippetStart | Kind::SnippetEnd) {
            continue;
        }

        let pos = match markers.iter().position(|m| m.name == a.name) {
            Some(pos) => pos,
            None => {
                markers.push(MarkerInfo::new(a.name));
                markers.len() - 1
            }
        };
        let info = &mut markers[pos];
        if a.kind == Kind::SnippetStart {
            info.starts += 1;
            info.start_line.get_or_insert(i + 1);
        } else {
            info.ends += 1;
            info.end_line.get_or_insert(i + 1);
        }
    }

    markers
}

/// Extract every marker in `source` and collect the failures.
pub fn check_source(source: &str) -> Vec<(String, SnippetError)> {
    scan_markers(source)
        .into_iter()
        .filter_map(|m| extract(source, Some(&m.name)).err().map(|e| (m.name, e)))
        .collect()
}
