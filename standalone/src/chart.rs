//! Output consumers for a ranked word list.

use std::io::{self, Write};

use common::RankedEntry;

/// Width, in characters, of the longest bar.
const BAR_WIDTH: usize = 50;

/// Draw a horizontal bar chart, one row per entry, bars scaled to the
/// largest total.
pub fn render_bar_chart<W: Write>(entries: &[RankedEntry], out: &mut W) -> io::Result<()> {
    writeln!(out, "Top {} Words by Frequency", entries.len())?;
    if entries.is_empty() {
        writeln!(out, "(no words)")?;
        return Ok(());
    }

    let label_width = entries
        .iter()
        .map(|e| e.word.chars().count())
        .max()
        .unwrap_or(0);
    let max_total = entries.iter().map(|e| e.total).max().unwrap_or(0).max(1);
    let count_width = max_total.to_string().len();

    for entry in entries {
        writeln!(
            out,
            "{:<label_width$} | {:>count_width$} {}",
            entry.word,
            entry.total,
            "#".repeat(bar_len(entry.total, max_total))
        )?;
    }
    Ok(())
}

/// Write the entries as a JSON array of `{"word", "total"}` objects.
pub fn render_json<W: Write>(entries: &[RankedEntry], out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, entries)?;
    writeln!(out)
}

fn bar_len(total: u64, max_total: u64) -> usize {
    let scaled = u128::from(total) * BAR_WIDTH as u128 / u128::from(max_total);
    (scaled as usize).max(1)
}
