//! Fixed-width text report of factory state.
//!
//! Presentation only: nothing parses this text back.

use crate::factory::Factory;
use std::fmt::Write;

const HEADERS: [&str; 4] = ["Factory", "InputInv", "OutputInv", "Progress"];

/// Render one row per factory: label, input inventory, output inventory and
/// `current/duration` (or `-` without a recipe).
///
/// Column widths follow the widest header or value so the table stays
/// aligned. An empty factory list renders as the empty string.
pub fn format_report<'a>(factories: impl IntoIterator<Item = &'a Factory>) -> String {
    let rows: Vec<[String; 4]> = factories
        .into_iter()
        .enumerate()
        .map(|(index, factory)| {
            [
                factory.label(index),
                factory.input.to_string(),
                factory.output.to_string(),
                factory.progress_display(),
            ]
        })
        .collect();

    if rows.is_empty() {
        return String::new();
    }

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS, &widths);
    let dashes = widths.map(|w| "-".repeat(w));
    let _ = writeln!(out, "{}", dashes.join("-|-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S; 4], widths: &[usize; 4]) {
    let [name, input, output, progress] = cells;
    let _ = writeln!(
        out,
        "{:<w0$} | {:<w1$} | {:<w2$} | {}",
        name.as_ref(),
        input.as_ref(),
        output.as_ref(),
        progress.as_ref(),
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    );
}
