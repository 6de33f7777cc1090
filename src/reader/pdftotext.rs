use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::debug;

use super::TableReader;
use crate::model::CellGrid;

#[derive(Debug, Clone)]
pub struct PdftotextReader {
    cell_split: Regex,
}

impl PdftotextReader {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            cell_split: Regex::new(r"\t+|\s{2,}")?,
        })
    }
}

impl TableReader for PdftotextReader {
    fn name(&self) -> &'static str {
        "pdftotext"
    }

    fn read_lattice(&self, path: &Path, line_scale: u32) -> Result<Vec<CellGrid>> {
        debug!(line_scale, "text-layer reader ignores line scale");
        let pages = extract_layout_pages(path)?;
        Ok(pages
            .iter()
            .map(|page| layout_page_grid(page, &self.cell_split))
            .filter(|grid| !grid.is_empty())
            .collect())
    }

    fn read_first_tables(&self, path: &Path) -> Result<Vec<CellGrid>> {
        let pages = extract_layout_pages(path)?;
        Ok(pages
            .iter()
            .filter_map(|page| first_table_grid(page, &self.cell_split))
            .collect())
    }
}

pub(super) fn split_layout_line(line: &str, cell_split: &Regex) -> Vec<String> {
    cell_split
        .split(line)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub(super) fn layout_page_grid(page: &str, cell_split: &Regex) -> CellGrid {
    CellGrid::new(
        page.lines()
            .map(|line| split_layout_line(line, cell_split))
            .filter(|cells| !cells.is_empty())
            .collect(),
    )
}

pub(super) fn first_table_grid(page: &str, cell_split: &Regex) -> Option<CellGrid> {
    let rows = page
        .lines()
        .map(|line| split_layout_line(line, cell_split))
        .skip_while(|cells| cells.len() < 2)
        .take_while(|cells| cells.len() >= 2)
        .collect::<Vec<Vec<String>>>();

    if rows.is_empty() {
        None
    } else {
        Some(CellGrid::new(rows))
    }
}

fn extract_layout_pages(pdf_path: &Path) -> Result<Vec<String>> {
    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    Ok(pages)
}
