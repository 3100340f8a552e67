use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, FormatAlign, Formula, Workbook};
use tracing::info;

use crate::config::Column;
use crate::parser::JobListing;

/// Longest string Excel stores in one cell.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Replace `"` so a title can sit inside a quoted formula argument.
pub fn excel_safe_title(title: &str) -> String {
    title.replace('"', "''")
}

pub fn hyperlink_formula(url: &str, title: &str) -> String {
    format!("=HYPERLINK(\"{}\", \"{}\")", url, excel_safe_title(title))
}

fn cell_text(job: &JobListing, column: Column) -> String {
    match column {
        Column::Title => job.title.clone(),
        Column::Description => job.description.clone(),
        Column::HowToApply => job.how_to_apply.clone(),
        Column::MatchedVertical => job.verticals.to_string(),
        Column::ClickableLink | Column::ApplyLink => job.title.clone(),
    }
}

/// First column whose text for `job` does not fit in a cell.
pub fn oversized_column(job: &JobListing, columns: &[(Column, f64)]) -> Option<Column> {
    columns
        .iter()
        .map(|(column, _)| *column)
        .find(|column| cell_text(job, *column).chars().count() > MAX_CELL_CHARS)
}

fn header_format() -> Format {
    Format::new().set_bold()
}

fn data_format() -> Format {
    Format::new().set_text_wrap().set_align(FormatAlign::Top)
}

/// Write `jobs` to a fresh workbook at `path`, one row per job.
///
/// Link columns hold a HYPERLINK formula whose cached value is the title.
/// Data cells wrap and align to the top.
pub fn write_jobs(path: &Path, columns: &[(Column, f64)], jobs: &[JobListing]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header = header_format();
    let wrap = data_format();

    for (col, (column, width)) in columns.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)?;
        worksheet.write_string_with_format(0, col, column.header(), &header)?;
    }

    for (i, job) in jobs.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, (column, _)) in columns.iter().enumerate() {
            let col = col as u16;
            if column.is_link() {
                let formula = Formula::new(hyperlink_formula(&job.apply_link, &job.title))
                    .set_result(cell_text(job, *column));
                worksheet.write_formula_with_format(row, col, formula, &wrap)?;
            } else {
                worksheet.write_string_with_format(row, col, cell_text(job, *column), &wrap)?;
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} rows to {}", jobs.len(), path.display());
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Site;
    use crate::parser::verticals::Verticals;
    use calamine::{open_workbook_auto, Data, Reader};
    use std::io::Read;

    fn job(title: &str) -> JobListing {
        JobListing {
            title: title.to_string(),
            description: "Line one\nLine two".to_string(),
            apply_link: "https://www.c40.org/careers/x/".to_string(),
            verticals: Verticals::Matched(vec!["Finance".into(), "Energy".into()]),
            how_to_apply: "• Salary:\n£40k".to_string(),
        }
    }

    #[test]
    fn quotes_are_escaped_in_formula() {
        assert_eq!(excel_safe_title(r#"The "Green" Lead"#), "The ''Green'' Lead");
        assert_eq!(
            hyperlink_formula("https://a/1", r#"Say "hi""#),
            r#"=HYPERLINK("https://a/1", "Say ''hi''")"#
        );
        assert_eq!(hyperlink_formula("https://a/1", "Plain"), r#"=HYPERLINK("https://a/1", "Plain")"#);
    }

    #[test]
    fn writes_site_columns_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/c40_jobs.xlsx");
        write_jobs(&path, Site::C40.profile().columns, &[job("Analyst"), job(r#"The "Lead""#)]).unwrap();

        let mut wb = open_workbook_auto(&path).unwrap();
        let sheet = wb.sheet_names()[0].clone();
        let range = wb.worksheet_range(&sheet).unwrap();
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|r| r.iter().map(Data::to_string).collect())
            .collect();

        assert_eq!(
            rows[0],
            ["Title", "Description", "How_To_Apply", "Matched_Vertical", "Clickable_Link"]
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], "Line one\nLine two");
        assert_eq!(rows[1][2], "• Salary:\n£40k");
        assert_eq!(rows[1][3], "Finance, Energy");
        assert_eq!(rows[2][0], r#"The "Lead""#);

        let formulas = wb.worksheet_formula(&sheet).unwrap();
        let link = formulas.get_value((2, 4)).unwrap();
        assert!(link.contains(r#"HYPERLINK("https://www.c40.org/careers/x/", "The ''Lead''")"#));
    }

    fn xlsx_part(path: &Path, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn column_widths_and_cell_format() {
        let col_re = regex::Regex::new(r#"<col min="(\d+)" max="\d+" width="([\d.]+)""#).unwrap();
        for site in [Site::C40, Site::Bamboo] {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("jobs.xlsx");
            let columns = site.profile().columns;
            write_jobs(&path, columns, &[job("Analyst")]).unwrap();

            // stored widths carry Excel's padding on top of the character count
            let sheet = xlsx_part(&path, "xl/worksheets/sheet1.xml");
            let widths: Vec<(usize, f64)> = col_re
                .captures_iter(&sheet)
                .map(|c| (c[1].parse().unwrap(), c[2].parse().unwrap()))
                .collect();
            assert_eq!(widths.len(), columns.len());
            for ((col, stored), (_, width)) in widths.iter().zip(columns) {
                assert_eq!(stored.floor(), *width, "column {}", col);
            }

            let styles = xlsx_part(&path, "xl/styles.xml");
            assert!(styles.contains(r#"<alignment vertical="top" wrapText="1"/>"#));
        }
    }

    #[test]
    fn oversized_cells_are_reported() {
        let columns = Site::C40.profile().columns;
        assert_eq!(oversized_column(&job("Analyst"), columns), None);

        let mut long = job("Analyst");
        long.description = "x".repeat(40_000);
        assert_eq!(oversized_column(&long, columns), Some(Column::Description));
        let dir = tempfile::tempdir().unwrap();
        assert!(write_jobs(&dir.path().join("jobs.xlsx"), columns, &[long]).is_err());

        let mut edge = job("Analyst");
        edge.how_to_apply = "é".repeat(MAX_CELL_CHARS);
        assert_eq!(oversized_column(&edge, columns), None);
    }

    #[test]
    fn overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.xlsx");
        let columns = Site::Bamboo.profile().columns;
        write_jobs(&path, columns, &[job("A"), job("B"), job("C")]).unwrap();
        write_jobs(&path, columns, &[job("D")]).unwrap();

        let mut wb = open_workbook_auto(&path).unwrap();
        let sheet = wb.sheet_names()[0].clone();
        let range = wb.worksheet_range(&sheet).unwrap();
        assert_eq!(range.height(), 2);
        assert_eq!(range.get_value((1, 0)).map(Data::to_string).as_deref(), Some("D"));
    }
}
