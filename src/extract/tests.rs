use std::collections::HashSet;
use std::path::Path;

use anyhow::bail;

use super::rules::strip_code_suffix;
use super::*;
use crate::config::ExtractConfig;

fn rules() -> FieldRules {
    FieldRules::new().unwrap()
}

fn extractor() -> InvoiceExtractor {
    InvoiceExtractor::new(ExtractConfig::default()).unwrap()
}

fn row(cells: &[(usize, &str)]) -> Vec<String> {
    let mut row = vec![String::new(); 17];
    for (index, value) in cells {
        row[*index] = value.to_string();
    }
    row
}

fn sample_grid() -> CellGrid {
    CellGrid::new(vec![
        row(&[(0, "SAD FORM")]),
        row(&[(0, "31 Packages and"), (1, "Marks"), (12, "33 Commodity (HS) Code8517120000")]),
        row(&[(1, "1Z999AA10123456785marks"), (12, "35 Gross Mass (Kg)12.50")]),
        row(&[(1, "Description: MOBILE PHONES"), (16, "42")]),
        row(&[(16, "31.80")]),
        row(&[(1, "Number and kind"), (16, "99.99")]),
        row(&[(16, "1000.00")]),
    ])
}

#[test]
fn commodity_code_drops_two_character_suffix() {
    assert_eq!(strip_code_suffix("123456"), "1234");
    assert_eq!(strip_code_suffix("12"), "");
    assert_eq!(strip_code_suffix("1"), "1");

    let (code, mass) = rules().parse_commodity_and_gross_mass("33 Commodity (HS) Code1");
    assert_eq!(code, "1");
    assert_eq!(mass, "");
}

#[test]
fn gross_mass_allows_trailing_letters_after_label() {
    let (code, mass) = rules().parse_commodity_and_gross_mass(
        "33 commodity (hs) code123456 35 GROSS MASS (KG)kgs 7.25",
    );
    assert_eq!(code, "1234");
    assert_eq!(mass, "7.25");
}

#[test]
fn gross_mass_requires_a_decimal_point() {
    let (_, mass) = rules().parse_commodity_and_gross_mass("35 Gross Mass (Kg)12");
    assert_eq!(mass, "");
}

#[test]
fn numeric_tokens_drop_standalone_boilerplate() {
    assert_eq!(rules().numeric_tokens("42 31.80 42.50"), vec!["31.80", "42.50"]);
    assert_eq!(rules().numeric_tokens("4,2\n12,000"), vec!["12,000"]);
    assert_eq!(rules().numeric_tokens("Code: . ,"), vec![".", ","]);
    assert_eq!(rules().numeric_tokens("31.80 ."), vec!["31.80", "."]);
}

#[test]
fn glued_marks_label_is_split_before_parsing() {
    let rules = rules();
    let text = rules.normalize_marks(["1Z999AA10123456785marks"]);
    assert_eq!(text, "1Z999AA10123456785 Marks");

    let (mark, _) = rules.parse_marks_and_description(&text);
    assert_eq!(mark, "1Z999AA10123456785");
}

#[test]
fn normalize_marks_skips_header_leakage_and_blanks() {
    let text = rules().normalize_marks(["  MARKS ", "", "1Z12345", "Description: Shoes"]);
    assert_eq!(text, "1Z12345 Description: Shoes");
}

#[test]
fn tracking_mark_strips_trailing_of() {
    let (mark, description) = rules().parse_marks_and_description("1z888BB77Of packages");
    assert_eq!(mark, "1z888BB77");
    assert_eq!(description, "");
}

#[test]
fn container_falls_back_to_number_and_kind_label() {
    let (mark, description) =
        rules().parse_marks_and_description("Number and kind CTN-22 Description:  Toys  ");
    assert_eq!(mark, "CTN-22");
    assert_eq!(description, "Toys");
}

#[test]
fn container_is_empty_without_any_label() {
    let (mark, description) = rules().parse_marks_and_description("nothing useful");
    assert_eq!(mark, "");
    assert_eq!(description, "");
}

#[test]
fn item_price_prefers_last_price_column_token() {
    let price = rules().item_price("42 10.00 31.80", "35 Gross Mass (Kg)12.50", &HashSet::new());
    assert_eq!(price, "31.80");
}

#[test]
fn item_price_fallback_excludes_gross_mass() {
    let excluded = HashSet::from(["12.50"]);
    let price = rules().item_price("", "851712 19.99 12.50", &excluded);
    assert_eq!(price, "19.99");
}

#[test]
fn item_price_fallback_can_land_on_label_numbers() {
    let excluded = HashSet::from(["12.50"]);
    let price = rules().item_price("", "35 Gross Mass (Kg)12.50", &excluded);
    assert_eq!(price, "35");
}

#[test]
fn item_price_takes_last_price_run_even_without_digits() {
    let price = rules().item_price("31.80 .", "35 Gross Mass (Kg)12.50", &HashSet::new());
    assert_eq!(price, ".");
}

#[test]
fn item_price_is_empty_when_nothing_remains() {
    let excluded = HashSet::from(["12.50"]);
    assert_eq!(rules().item_price("", "12.50 42", &excluded), "");
}

#[test]
fn grid_without_anchor_yields_no_records() {
    let grid = CellGrid::new(vec![row(&[(1, "Marks")]), row(&[(12, "35 Gross Mass (Kg)1.00")])]);
    assert!(extractor().extract(&[grid]).is_empty());
}

#[test]
fn anchor_matching_is_case_insensitive_on_any_cell() {
    let grid = CellGrid::new(vec![row(&[(9, "see DESCRIPTION OF GOODS below")])]);
    assert_eq!(extractor().anchor_windows(&grid), vec![0..1]);
}

#[test]
fn window_covers_anchor_plus_rows_after_and_clips_at_grid_end() {
    let grid = sample_grid();
    let windows = extractor().anchor_windows(&grid);
    assert_eq!(windows, vec![1..6]);

    let config = ExtractConfig {
        rows_after: 10,
        ..ExtractConfig::default()
    };
    let wide = InvoiceExtractor::new(config).unwrap();
    assert_eq!(wide.anchor_windows(&grid), vec![1..7]);
}

#[test]
fn extract_builds_record_from_sample_block() {
    let records = extractor().extract(&[sample_grid()]);
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.container_mark, "1Z999AA10123456785");
    assert_eq!(record.description, "MOBILE PHONES Number and kind");
    assert_eq!(record.commodity_code, "85171200");
    assert_eq!(record.gross_mass, "12.50");
    assert_eq!(record.item_price.as_deref(), Some("99.99"));
}

#[test]
fn item_price_is_absent_when_disabled() {
    let config = ExtractConfig {
        item_price: false,
        ..ExtractConfig::default()
    };
    let records = InvoiceExtractor::new(config)
        .unwrap()
        .extract(&[sample_grid()]);
    assert_eq!(records[0].item_price, None);
}

#[test]
fn overlapping_windows_each_emit_a_record() {
    let grid = CellGrid::new(vec![
        row(&[(0, "31 Packages"), (1, "1Z111")]),
        row(&[(0, "Description of Goods"), (1, "Description: Tea")]),
        row(&[(12, "35 Gross Mass (Kg)3.00")]),
    ]);

    let records = extractor().extract(&[grid]);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].container_mark, "1Z111");
    assert_eq!(records[1].container_mark, "");
    assert_eq!(records[0].gross_mass, "3.00");
    assert_eq!(records[1].gross_mass, "3.00");
    assert_eq!(records[0].description, "Tea");
    assert_eq!(records[1].description, "Tea");
}

#[test]
fn description_spans_newlines_inside_a_cell() {
    let grid = CellGrid::new(vec![row(&[
        (0, "31 Packages"),
        (1, "1Z111\nDescription: MOBILE\nPHONES 64GB"),
    ])]);

    let records = extractor().extract(&[grid]);
    assert_eq!(records[0].container_mark, "1Z111");
    assert_eq!(records[0].description, "MOBILE\nPHONES 64GB");
}

#[test]
fn records_follow_table_then_row_order() {
    let first = CellGrid::new(vec![row(&[(0, "31 Packages"), (1, "1ZAAA")])]);
    let second = CellGrid::new(vec![
        row(&[(0, "31 Packages"), (1, "1ZBBB")]),
        row(&[]),
        row(&[(0, "31 Packages"), (1, "1ZCCC")]),
    ]);

    let marks = extractor()
        .extract(&[first, second])
        .into_iter()
        .map(|record| record.container_mark)
        .collect::<Vec<String>>();
    assert_eq!(marks, vec!["1ZAAA", "1ZBBB", "1ZCCC"]);
}

#[test]
fn narrow_grid_leaves_missing_columns_empty() {
    let grid = CellGrid::new(vec![vec!["31 Packages".to_string(), "1Z42XY".to_string()]]);
    let records = extractor().extract(&[grid]);

    assert_eq!(records[0].container_mark, "1Z42XY");
    assert_eq!(records[0].commodity_code, "");
    assert_eq!(records[0].item_price.as_deref(), Some(""));
}

struct FixedReader(Vec<CellGrid>);

impl TableReader for FixedReader {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn read_lattice(&self, _path: &Path, line_scale: u32) -> anyhow::Result<Vec<CellGrid>> {
        assert_eq!(line_scale, 40);
        Ok(self.0.clone())
    }

    fn read_first_tables(&self, _path: &Path) -> anyhow::Result<Vec<CellGrid>> {
        Ok(self.0.clone())
    }
}

struct FailingReader;

impl TableReader for FailingReader {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn read_lattice(&self, _path: &Path, _line_scale: u32) -> anyhow::Result<Vec<CellGrid>> {
        bail!("file is not a PDF")
    }

    fn read_first_tables(&self, _path: &Path) -> anyhow::Result<Vec<CellGrid>> {
        bail!("file is not a PDF")
    }
}

#[test]
fn extract_document_reports_no_data_as_outcome() {
    let reader = FixedReader(vec![CellGrid::new(vec![row(&[(1, "nothing")])])]);
    let outcome = extractor()
        .extract_document(&reader, Path::new("invoice.pdf"))
        .unwrap();
    assert_eq!(outcome, Outcome::NoData);
}

#[test]
fn extract_document_wraps_reader_failures() {
    let err = extractor()
        .extract_document(&FailingReader, Path::new("invoice.pdf"))
        .unwrap_err();

    match err {
        PipelineError::ProcessingFailure { path, message } => {
            assert_eq!(path, Path::new("invoice.pdf"));
            assert!(message.contains("not a PDF"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn independent_documents_extract_concurrently() {
    let extractor = extractor();
    let reader = FixedReader(vec![sample_grid()]);

    let counts = std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    extractor
                        .extract_document(&reader, Path::new("invoice.pdf"))
                        .unwrap()
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<Outcome<Vec<InvoiceRecord>>>>()
    });

    assert!(counts
        .iter()
        .all(|outcome| matches!(outcome, Outcome::Rows(records) if records.len() == 1)));
}

#[test]
fn zero_line_scale_is_rejected() {
    let config = ExtractConfig {
        line_scale: 0,
        ..ExtractConfig::default()
    };
    assert!(InvoiceExtractor::new(config).is_err());
}
