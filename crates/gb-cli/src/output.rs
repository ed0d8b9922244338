//! Plain-text tables for list commands.

use std::io::{self, Write};

use gb_core::{Collaborator, Issue, Label, Project, Repository, User};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a single cell may render before it is cut with an ellipsis.
const MAX_CELL_WIDTH: usize = 48;

/// An entity that can be printed as one table row.
pub trait Row {
    /// Column headers.
    const HEADERS: &'static [&'static str];

    /// One cell per header.
    fn cells(&self) -> Vec<String>;
}

impl Row for Project {
    const HEADERS: &'static [&'static str] = &["ID", "#", "TITLE", "STATE", "ITEMS", "COLUMNS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.number.to_string(),
            self.title.clone(),
            if self.closed { "closed" } else { "open" }.to_owned(),
            self.item_count.to_string(),
            self.columns
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ]
    }
}

impl Row for Repository {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "REPOSITORY",
        "VISIBILITY",
        "STARS",
        "ARCHIVED",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name_with_owner.clone(),
            if self.is_private { "private" } else { "public" }.to_owned(),
            self.stargazer_count.to_string(),
            if self.is_archived { "yes" } else { "" }.to_owned(),
        ]
    }
}

impl Row for Issue {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "#",
        "TITLE",
        "STATE",
        "REPOSITORY",
        "LABELS",
        "COLUMN",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.number.to_string(),
            self.title.clone(),
            self.state.as_str().to_lowercase(),
            self.repository.name_with_owner.clone(),
            self.labels
                .iter()
                .map(|l| l.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            self.project_items
                .iter()
                .filter_map(|item| item.column.as_deref())
                .collect::<Vec<_>>()
                .join(", "),
        ]
    }
}

impl Row for Label {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "COLOR", "DESCRIPTION"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            format!("#{}", self.color),
            self.description.clone().unwrap_or_default(),
        ]
    }
}

impl Row for User {
    const HEADERS: &'static [&'static str] = &["ID", "LOGIN", "NAME", "EMAIL"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.login.clone(),
            self.name.clone().unwrap_or_default(),
            self.email.clone().unwrap_or_default(),
        ]
    }
}

impl Row for Collaborator {
    const HEADERS: &'static [&'static str] = &["ID", "LOGIN", "MAX PERMISSION", "REPOSITORIES"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.login.clone(),
            self.max_permission()
                .map(|p| p.as_str().to_lowercase())
                .unwrap_or_default(),
            self.grants
                .iter()
                .map(|g| {
                    format!(
                        "{} ({})",
                        g.repository.name_with_owner,
                        g.permission.as_str().to_lowercase()
                    )
                })
                .collect::<Vec<_>>()
                .join(", "),
        ]
    }
}

/// Cuts `text` to `max` display columns, ending with `…` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_owned();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

/// Writes `rows` under `headers`, each column padded to its widest cell.
pub fn write_table<W: Write>(
    out: &mut W,
    headers: &[&str],
    rows: &[Vec<String>],
) -> io::Result<()> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate(cell, MAX_CELL_WIDTH)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    write_line(out, headers.iter().copied(), &widths)?;
    for row in &rows {
        write_line(out, row.iter().map(String::as_str), &widths)?;
    }
    Ok(())
}

fn write_line<'a, W: Write>(
    out: &mut W,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> io::Result<()> {
    let mut line = String::new();
    for (i, (cell, width)) in cells.zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        if i + 1 < widths.len() {
            line.extend(std::iter::repeat_n(' ', width.saturating_sub(cell.width())));
        }
    }
    writeln!(out, "{}", line.trim_end())
}
