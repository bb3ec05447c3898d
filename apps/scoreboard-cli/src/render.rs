use std::fmt::Write;

use scoreboard_backend::sync::{EditState, Editable, ScoreField, StatField, Totals};
use scoreboard_backend::{PlayerStat, Score};
use unicode_width::UnicodeWidthStr;

const EDIT_MARK: &str = "*";

/// Terminal columns: wide for CJK, zero for combining marks.
fn width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn pad(cell: &str, w: usize) -> String {
    let fill = w.saturating_sub(width(cell));
    format!("{}{cell}", " ".repeat(fill))
}

fn table(header: Vec<String>, body: Vec<Vec<String>>, footer: Option<Vec<String>>) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| width(h)).collect();
    for cells in body.iter().chain(footer.iter()) {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(width(cell));
        }
    }
    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell, *w))
            .collect::<Vec<_>>()
            .join(" | ")
    };
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-");

    let mut out = String::new();
    let _ = writeln!(out, "{}", line(&header));
    let _ = writeln!(out, "{rule}");
    for cells in &body {
        let _ = writeln!(out, "{}", line(cells));
    }
    if let Some(footer) = footer {
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{}", line(&footer));
    }
    out
}

/// Rounds with a Total footer. The row being edited shows its buffer and a `*`.
pub fn scores_table(rows: &[Score], edit: &EditState<Score>, totals: Totals) -> String {
    let mut header = vec!["Round".to_string()];
    header.extend(ScoreField::ALL.iter().map(|f| f.label().to_string()));

    let body = rows
        .iter()
        .map(|stored| {
            let shown = edit.display(stored);
            let mark = if edit.editing_id() == Some(stored.id) { EDIT_MARK } else { "" };
            let mut cells = vec![format!("{mark}{}", stored.round_number)];
            cells.extend(ScoreField::ALL.iter().map(|f| shown.get(*f).to_string()));
            cells
        })
        .collect();

    let footer = vec![
        "Total".to_string(),
        totals.tsim.to_string(),
        totals.jason.to_string(),
        totals.wai.to_string(),
        totals.mum_soup.to_string(),
    ];
    table(header, body, Some(footer))
}

pub fn stats_table(rows: &[PlayerStat], edit: &EditState<PlayerStat>) -> String {
    let mut header = vec!["Player".to_string()];
    header.extend(StatField::ALL.iter().map(|f| f.label().to_string()));

    let body = rows
        .iter()
        .map(|stored| {
            let shown = edit.display(stored);
            let mark = if edit.editing_id() == Some(stored.id) { EDIT_MARK } else { "" };
            let mut cells = vec![format!("{mark}{}", shown.player_name)];
            cells.extend(StatField::ALL.iter().map(|f| shown.get(*f).to_string()));
            cells
        })
        .collect();
    table(header, body, None)
}
