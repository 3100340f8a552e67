use std::path::Path;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{DateTime, Local};
use regex::Regex;

static HYPERLINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)HYPERLINK\(\s*"([^"]*)""#).unwrap());

/// The written sheet, header row split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read the first worksheet of `path`. `None` when the file does not exist.
pub fn load(path: &Path) -> Result<Option<SheetView>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .with_context(|| format!("{} has no worksheets", path.display()))?;
    let range = workbook.worksheet_range(&sheet)?;
    // formulas are only needed to recover link targets
    let formulas = workbook.worksheet_formula(&sheet).ok();

    let (row0, col0) = range.start().unwrap_or((0, 0));
    let mut rows = range.rows().enumerate().map(|(r, cells)| {
        cells
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                let pos = (row0 + r as u32, col0 + c as u32);
                let target = formulas
                    .as_ref()
                    .and_then(|f| f.get_value(pos))
                    .and_then(|f| link_target(f));
                render_cell(cell, target)
            })
            .collect::<Vec<_>>()
    });

    let headers = rows.next().unwrap_or_default();
    Ok(Some(SheetView {
        headers,
        rows: rows.collect(),
    }))
}

fn render_cell(cell: &Data, link_target: Option<&str>) -> String {
    let text = cell.to_string();
    match link_target {
        Some(url) if text.is_empty() => url.to_string(),
        Some(url) => format!("{} <{}>", text, url),
        None => text,
    }
}

/// URL argument of a `HYPERLINK("url", "title")` formula.
pub fn link_target(formula: &str) -> Option<&str> {
    HYPERLINK_RE
        .captures(formula)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

impl SheetView {
    pub fn column_index(&self, name: &str) -> Result<usize> {
        match self.headers.iter().position(|h| h.eq_ignore_ascii_case(name)) {
            Some(i) => Ok(i),
            None => bail!(
                "Unknown column {:?} (available: {})",
                name,
                self.headers.join(", ")
            ),
        }
    }

    /// Keep rows containing `needle` (case-insensitive), in `column` or in any cell.
    pub fn filter(&mut self, needle: &str, column: Option<&str>) -> Result<()> {
        let needle = needle.to_lowercase();
        let column = column.map(|c| self.column_index(c)).transpose()?;
        self.rows.retain(|row| match column {
            Some(i) => row.get(i).is_some_and(|cell| cell.to_lowercase().contains(&needle)),
            None => row.iter().any(|cell| cell.to_lowercase().contains(&needle)),
        });
        Ok(())
    }

    /// Stable sort by one column, case-insensitive.
    pub fn sort_by(&mut self, column: &str, descending: bool) -> Result<()> {
        let i = self.column_index(column)?;
        let key = |row: &Vec<String>| row.get(i).map(|c| c.to_lowercase()).unwrap_or_default();
        self.rows.sort_by(|a, b| {
            let ord = key(a).cmp(&key(b));
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
        Ok(())
    }
}

pub struct DashboardOptions<'a> {
    pub input: &'a Path,
    pub sort: Option<&'a str>,
    pub descending: bool,
    pub filter: Option<&'a str>,
    pub column: Option<&'a str>,
    pub limit: usize,
    pub download: Option<&'a Path>,
    pub cell_width: usize,
}

/// Print the sheet. A missing file is reported, not treated as an error.
pub fn show(opts: &DashboardOptions<'_>) -> Result<()> {
    let Some(mut view) = load(opts.input)? else {
        println!(
            "Data file not found: {}. Run `careers_scraper scrape` to generate it.",
            opts.input.display()
        );
        return Ok(());
    };

    if let Ok(modified) = std::fs::metadata(opts.input).and_then(|m| m.modified()) {
        let modified: DateTime<Local> = modified.into();
        println!("Last updated: {}", modified.format("%Y-%m-%d %H:%M"));
    }
    println!("Total Jobs: {}", view.rows.len());

    if let Some(needle) = opts.filter {
        view.filter(needle, opts.column)?;
        println!("Matching \"{}\": {}", needle, view.rows.len());
    }
    if let Some(column) = opts.sort {
        view.sort_by(column, opts.descending)?;
    }

    println!();
    print_table(&view, opts.limit, opts.cell_width);

    if let Some(dest) = opts.download {
        std::fs::copy(opts.input, dest).with_context(|| {
            format!("Failed to copy {} to {}", opts.input.display(), dest.display())
        })?;
        println!("\nSaved a copy to {}", dest.display());
    }
    Ok(())
}

fn print_table(view: &SheetView, limit: usize, width: usize) {
    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .map(|c| format!("{:<width$}", truncate(&one_line(c), width), width = width))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{:>3} | {}", "#", line(&view.headers));
    println!("{}", "-".repeat(6 + view.headers.len() * (width + 3)));
    for (i, row) in view.rows.iter().take(limit).enumerate() {
        println!("{:>3} | {}", i + 1, line(row));
    }
    if view.rows.len() > limit {
        println!("... {} more rows", view.rows.len() - limit);
    }
}

fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──
