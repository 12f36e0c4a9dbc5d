// # Hosts File Parser
//
// Turns raw hosts text into a list of typed lines. Parsing is total: every
// input produces a line list, and the only failure mode of the file-based
// entry point is the read itself.
//
// ## Classification (first match wins)
//
// 1. trimmed line starts with `#`  -> Comment
// 2. trimmed line is empty         -> Empty
// 3. content before the first unescaped `#` has two or more
//    whitespace-separated tokens   -> Address
// 4. anything else                 -> Unknown

use std::path::Path;

use super::line::{AddressEntry, Line, LineKind};
use crate::error::{Error, Result};

/// Parse hosts file content from a string
pub fn parse_str(input: &str) -> Vec<Line> {
    let normalized = input.replace("\r\n", "\n");

    let mut raw_lines: Vec<&str> = normalized.split('\n').collect();
    // A trailing newline leaves an empty final element that is not a line.
    if raw_lines.last().is_some_and(|l| l.is_empty()) {
        raw_lines.pop();
    }

    raw_lines
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| parse_line(idx, raw))
        .collect()
}

/// Read and parse a hosts file
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Line>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let lines = parse_str(&content);
    tracing::debug!("Parsed {}: {} lines", path.display(), lines.len());
    Ok(lines)
}

fn parse_line(idx: usize, raw: &str) -> Line {
    let trimmed = raw.trim();

    let kind = if trimmed.starts_with('#') {
        LineKind::Comment
    } else if trimmed.is_empty() {
        LineKind::Empty
    } else {
        let (content, comment) = split_comment(trimmed);
        let mut tokens = content.split_whitespace();
        match (tokens.next(), tokens.clone().next()) {
            (Some(address), Some(_)) => LineKind::Address(AddressEntry {
                address: address.to_lowercase(),
                hostnames: tokens.map(str::to_lowercase).collect(),
                comment: comment.unwrap_or_default().to_string(),
            }),
            _ => LineKind::Unknown,
        }
    };

    Line {
        original_index: Some(idx),
        raw: raw.to_string(),
        kind,
    }
}

/// Split at the first `#` that is not preceded by a backslash.
///
/// Returns the content part and the trimmed comment, if any.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let mut prev = None;
    for (idx, ch) in line.char_indices() {
        if ch == '#' && prev != Some('\\') {
            return (&line[..idx], Some(line[idx + 1..].trim()));
        }
        prev = Some(ch);
    }
    (line, None)
}
