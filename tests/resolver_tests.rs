//! Formula resolver behavior against the fixture tables, including the
//! spreadsheet error sentinels.

use pretty_assertions::assert_eq;
use vlab::core::resolver::{formula_text, preflight, resolve, ColumnRef, FormulaArgs};
use vlab::data::{SimulationMode, Workbook};
use vlab::types::{ErrorKind, Outcome, Value};

fn book_for(args: &FormulaArgs) -> Workbook {
    Workbook::for_kind(args.kind(), SimulationMode::Simple)
}

fn vlookup(lookup_value: &str, col_index: i64) -> FormulaArgs {
    FormulaArgs::VLookup {
        lookup_value: lookup_value.to_string(),
        col_index,
        exact: false,
    }
}

fn hlookup(lookup_value: &str, row_index: i64) -> FormulaArgs {
    FormulaArgs::HLookup {
        lookup_value: lookup_value.to_string(),
        row_index,
        exact: false,
    }
}

#[test]
fn vlookup_returns_the_cell_at_the_requested_column() {
    let args = vlookup("K02", 3);
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::text("12000"));
    assert_eq!(eval.consulted.len(), 2);

    let args = vlookup("K02", 2);
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::text("Mie Ayam"));
}

#[test]
fn vlookup_out_of_bounds_column_is_ref_error() {
    let args = vlookup("K02", 5);
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Error(ErrorKind::InvalidReference));

    let args = vlookup("K02", 0);
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Error(ErrorKind::InvalidReference));
}

#[test]
fn vlookup_missing_value_is_na() {
    let args = vlookup("ZZZ", 2);
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Error(ErrorKind::NotApplicable));
    assert!(eval.consulted.is_empty());
}

#[test]
fn vlookup_scan_is_case_sensitive() {
    let args = vlookup("k02", 3);
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Error(ErrorKind::NotApplicable));
}

#[test]
fn vlookup_complex_mode_resolves_the_order_cell_first() {
    // C2 holds order row 1's menu code "M02"; its price in the reference
    // table is 12000.
    let book = Workbook::for_kind(vlookup("C2", 3).kind(), SimulationMode::Complex);
    let eval = resolve(&vlookup("C2", 3), &book);
    assert_eq!(eval.outcome, Outcome::text("12000"));

    let eval = resolve(&vlookup("C4", 4), &book);
    // C4 -> "M04" -> Soto Ayam -> Kategori.
    assert_eq!(eval.outcome, Outcome::text("Makanan"));
}

#[test]
fn hlookup_scans_the_header_row() {
    let args = hlookup("Mar", 2);
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::text("210k"));
}

#[test]
fn hlookup_row_outside_the_table_is_ref_error() {
    let args = hlookup("Mar", 3);
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Error(ErrorKind::InvalidReference));
}

#[test]
fn hlookup_missing_month_is_na() {
    let args = hlookup("Mei", 2);
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Error(ErrorKind::NotApplicable));
}

#[test]
fn hlookup_complex_mode_reads_the_salary_grade() {
    // C2 holds Widhi's grade "2B"; base salary for 2B is 1000000.
    let book = Workbook::for_kind(hlookup("C2", 2).kind(), SimulationMode::Complex);
    let eval = resolve(&hlookup("C2", 2), &book);
    assert_eq!(eval.outcome, Outcome::text("1000000"));

    let eval = resolve(&hlookup("C2", 3), &book);
    assert_eq!(eval.outcome, Outcome::text("15%"));
}

#[test]
fn match_returns_one_based_data_row_position() {
    let args = FormulaArgs::Match {
        lookup_value: "Es Teh".to_string(),
        column: ColumnRef::B,
        match_type: 0,
    };
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Value(Value::Number(3.0)));
}

#[test]
fn match_is_case_insensitive() {
    let args = FormulaArgs::Match {
        lookup_value: "mie ayam".to_string(),
        column: ColumnRef::B,
        match_type: 0,
    };
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Value(Value::Number(2.0)));
}

#[test]
fn match_absent_value_is_na() {
    let args = FormulaArgs::Match {
        lookup_value: "Bakso".to_string(),
        column: ColumnRef::B,
        match_type: 0,
    };
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Error(ErrorKind::NotApplicable));
}

#[test]
fn index_addresses_header_cells_too() {
    let args = FormulaArgs::Index { row: 1, col: 2 };
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::text("Menu"));

    let args = FormulaArgs::Index { row: 3, col: 2 };
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::text("Mie Ayam"));
}

#[test]
fn index_out_of_bounds_is_ref_error() {
    for (row, col) in [(6, 1), (0, 1), (1, 5), (1, 0)] {
        let args = FormulaArgs::Index { row, col };
        let eval = resolve(&args, &book_for(&args));
        assert_eq!(
            eval.outcome,
            Outcome::Error(ErrorKind::InvalidReference),
            "({}, {})",
            row,
            col
        );
    }
}

#[test]
fn choose_selects_one_based() {
    let args = FormulaArgs::Choose { index: 3 };
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::text("Diskon 15%"));
}

#[test]
fn choose_out_of_range_is_value_error() {
    for index in [0, 4, -1] {
        let args = FormulaArgs::Choose { index };
        let eval = resolve(&args, &book_for(&args));
        assert_eq!(eval.outcome, Outcome::Error(ErrorKind::InvalidValue));
    }
}

#[test]
fn countif_counts_case_insensitively() {
    let args = FormulaArgs::CountIf {
        column: ColumnRef::A,
        criterion: "makanan".to_string(),
    };
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Value(Value::Number(2.0)));
    assert_eq!(eval.consulted.len(), 2);
}

#[test]
fn countif_zero_matches_is_zero_not_an_error() {
    let args = FormulaArgs::CountIf {
        column: ColumnRef::A,
        criterion: "Kopi".to_string(),
    };
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Value(Value::Number(0.0)));
}

#[test]
fn countif_supports_numeric_comparisons() {
    let args = FormulaArgs::CountIf {
        column: ColumnRef::C,
        criterion: ">20".to_string(),
    };
    let eval = resolve(&args, &book_for(&args));
    // Terjual: 25, 50, 20, 30 -> three pass.
    assert_eq!(eval.outcome, Outcome::Value(Value::Number(3.0)));
}

#[test]
fn sumif_sums_the_paired_column() {
    let args = FormulaArgs::SumIf {
        criteria_column: ColumnRef::A,
        criterion: "Makanan".to_string(),
        sum_column: ColumnRef::D,
    };
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Value(Value::Number(615000.0)));
}

#[test]
fn sumif_empty_match_is_zero() {
    let args = FormulaArgs::SumIf {
        criteria_column: ColumnRef::A,
        criterion: "Kopi".to_string(),
        sum_column: ColumnRef::D,
    };
    let eval = resolve(&args, &book_for(&args));
    assert_eq!(eval.outcome, Outcome::Value(Value::Number(0.0)));
}

#[test]
fn countifs_requires_every_criterion() {
    let args = FormulaArgs::CountIfs {
        criteria: vec![
            (ColumnRef::A, "Minuman".to_string()),
            (ColumnRef::C, ">20".to_string()),
        ],
    };
    let eval = resolve(&args, &book_for(&args));
    // Es Teh (50) and Jus Jeruk (30) both sold over 20.
    assert_eq!(eval.outcome, Outcome::Value(Value::Number(2.0)));
}

#[test]
fn sumifs_filters_then_sums() {
    let args = FormulaArgs::SumIfs {
        sum_column: ColumnRef::D,
        criteria: vec![
            (ColumnRef::A, "Makanan".to_string()),
            (ColumnRef::C, ">20".to_string()),
        ],
    };
    let eval = resolve(&args, &book_for(&args));
    // Only Nasi Goreng passes both filters (Mie Ayam sold exactly 20).
    assert_eq!(eval.outcome, Outcome::Value(Value::Number(375000.0)));
}

#[test]
fn preflight_flags_out_of_range_indices() {
    let args = vlookup("K02", 5);
    let hint = preflight(&args, &book_for(&args)).expect("hint expected");
    assert!(hint.contains("between 1 and 4"), "{}", hint);

    let args = vlookup("K02", 3);
    assert_eq!(preflight(&args, &book_for(&args)), None);

    let args = vlookup("  ", 3);
    let hint = preflight(&args, &book_for(&args)).expect("hint expected");
    assert!(hint.contains("empty"), "{}", hint);

    let args = FormulaArgs::Choose { index: 4 };
    let hint = preflight(&args, &book_for(&args)).expect("hint expected");
    assert!(hint.contains("between 1 and 3"), "{}", hint);
}

#[test]
fn formula_bar_rendering() {
    let args = vlookup("K02", 3);
    assert_eq!(
        formula_text(&args, &book_for(&args)),
        "=VLOOKUP(\"K02\"; A1:D5; 3; FALSE)"
    );

    let book = Workbook::for_kind(vlookup("C2", 3).kind(), SimulationMode::Complex);
    assert_eq!(
        formula_text(&vlookup("C2", 3), &book),
        "=VLOOKUP(C2; $A$10:$D$14; 3; FALSE)"
    );

    let args = FormulaArgs::Match {
        lookup_value: "Mie Ayam".to_string(),
        column: ColumnRef::B,
        match_type: 0,
    };
    assert_eq!(
        formula_text(&args, &book_for(&args)),
        "=MATCH(\"Mie Ayam\"; B1:B5; 0)"
    );

    let args = FormulaArgs::CountIf {
        column: ColumnRef::A,
        criterion: "Makanan".to_string(),
    };
    assert_eq!(
        formula_text(&args, &book_for(&args)),
        "=COUNTIF(Kategori; \"Makanan\")"
    );

    let args = FormulaArgs::SumIfs {
        sum_column: ColumnRef::D,
        criteria: vec![
            (ColumnRef::A, "Makanan".to_string()),
            (ColumnRef::C, ">20".to_string()),
        ],
    };
    assert_eq!(
        formula_text(&args, &book_for(&args)),
        "=SUMIFS(Omzet; Kategori; \"Makanan\"; Terjual; \">20\")"
    );

    let args = FormulaArgs::Choose { index: 1 };
    assert_eq!(
        formula_text(&args, &book_for(&args)),
        "=CHOOSE(1; \"Diskon 5%\"; \"Diskon 10%\"; \"Diskon 15%\")"
    );
}
