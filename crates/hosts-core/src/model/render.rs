//! Line model → hosts file text

use super::line::{AddressEntry, Line, LineKind};

/// Column width addresses are padded to
const ADDRESS_COLUMN_WIDTH: usize = 15;

/// Render lines back into hosts file text, one `\n`-terminated line each
pub fn render(lines: &[Line]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.raw.len() + 1).sum());
    for line in lines {
        out.push_str(&render_line(line));
        out.push('\n');
    }
    out
}

/// Render a single line without its terminator
pub fn render_line(line: &Line) -> String {
    match &line.kind {
        LineKind::Address(entry) => render_entry(entry),
        LineKind::Comment | LineKind::Empty | LineKind::Unknown => line.raw.clone(),
    }
}

fn render_entry(entry: &AddressEntry) -> String {
    let mut out = format!(
        "{:<width$} {}",
        entry.address,
        entry.hostnames.join(" "),
        width = ADDRESS_COLUMN_WIDTH
    );
    if !entry.comment.is_empty() {
        out.push_str(" # ");
        out.push_str(&entry.comment);
    }
    out
}
