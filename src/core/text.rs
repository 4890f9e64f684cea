//! Text functions (UPPER, LOWER, PROPER, LEFT, RIGHT, MID, LEN, TEXT) and
//! the formula-string parser the text lab uses.
//!
//! Unlike the lookup labs, the text lab takes real formula syntax typed by
//! the student (`=UPPER(B2)`), so parse failures come with specific,
//! hint-bearing diagnostics instead of a bare error code.

use std::sync::OnceLock;

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;

use crate::core::resolver::{FormulaArgs, FormulaKind};
use crate::data::Dataset;
use crate::types::format_number;

//==============================================================================
// Cell references
//==============================================================================

/// Zero-based cell reference into the text-lab table, parsed from the `B2`
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

fn cell_ref_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?i)([A-E])(\d+)$").expect("valid cell-ref pattern"))
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse `B2`-style references, bounds-checked against the table.
    pub fn parse(input: &str, data: &Dataset) -> Option<Self> {
        let caps = cell_ref_pattern().captures(input.trim())?;
        let col = (caps[1].to_uppercase().bytes().next()? - b'A') as usize;
        let row = caps[2].parse::<usize>().ok()?.checked_sub(1)?;
        if row < data.row_count() && col < data.column_count() {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Render back to the `B2` form.
    pub fn label(&self) -> String {
        format!("{}{}", (b'A' + self.col as u8) as char, self.row + 1)
    }
}

//==============================================================================
// Transforms
//==============================================================================

pub fn upper(text: &str) -> String {
    text.to_uppercase()
}

pub fn lower(text: &str) -> String {
    text.to_lowercase()
}

/// Capitalize the first letter of each word, lowercase the rest.
pub fn proper(text: &str) -> String {
    text.split(' ')
        .map(proper_word)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn proper_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn left(text: &str, count: usize) -> String {
    text.chars().take(count).collect()
}

pub fn right(text: &str, count: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start = chars.len().saturating_sub(count);
    chars[start..].iter().collect()
}

/// 1-based start position, clamped to the text length.
pub fn mid(text: &str, start: usize, count: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start_idx = start.saturating_sub(1);
    if start_idx >= chars.len() {
        return String::new();
    }
    let end = (start_idx + count).min(chars.len());
    chars[start_idx..end].iter().collect()
}

pub fn len(text: &str) -> usize {
    text.chars().count()
}

//==============================================================================
// TEXT formats
//==============================================================================

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const DAY_NAMES: [&str; 7] = [
    "Minggu", "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu",
];

/// Apply a TEXT format string: currency/number with thousands grouping,
/// date formats over Excel serial numbers, or percent.
pub fn apply_format(value: f64, format: &str) -> String {
    let lower = format.to_lowercase();

    if lower.contains("rp") || lower.contains('#') {
        let prefix: String = format
            .chars()
            .take_while(|c| *c != '#' && *c != '0')
            .collect();
        return format!("{}{}", prefix, group_thousands(value));
    }

    if lower.contains("dd") || lower.contains("mm") || lower.contains("yyyy") {
        return format_serial_date(value, &lower);
    }

    if lower.contains('%') {
        return format!("{}%", (value * 100.0).round() as i64);
    }

    format_number(value)
}

/// Group an integral value with `.` thousands separators (id-ID style).
fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return format_number(value);
    }
    let negative = value < 0.0;
    let digits = format!("{}", value.abs().round() as i64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Excel serial day number to a calendar date (day 0 = 1899-12-30).
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial as u64))
}

fn format_serial_date(serial: f64, format_lower: &str) -> String {
    let Some(date) = serial_to_date(serial) else {
        return format_number(serial);
    };
    let (day, month, year) = (date.day(), date.month() as usize, date.year());
    match format_lower {
        "dd-mm-yyyy" => format!("{:02}-{:02}-{}", day, month, year),
        "mmmm yyyy" => format!("{} {}", MONTH_NAMES[month - 1], year),
        "dddd" => DAY_NAMES[date.weekday().num_days_from_sunday() as usize].to_string(),
        _ => format!("{:02}/{:02}/{}", day, month, year),
    }
}

//==============================================================================
// Formula-string parsing
//==============================================================================

/// A parse failure with teaching hints attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaDiagnostic {
    pub message: String,
    pub hint: Option<String>,
}

impl FormulaDiagnostic {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
        }
    }

    fn with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

impl std::fmt::Display for FormulaDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({})", hint)?;
        }
        Ok(())
    }
}

fn formula_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^=\s*([A-Za-z]+)\((.*)\)$").expect("valid formula pattern"))
}

fn text_format_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(?i)=TEXT\(\s*([A-E]\d+)\s*;\s*"([^"]+)"\s*\)$"#)
            .expect("valid TEXT pattern")
    })
}

/// The default formula shown when a text-function tab opens.
pub fn default_formula(kind: FormulaKind) -> &'static str {
    match kind {
        FormulaKind::Lower => "=LOWER(B3)",
        FormulaKind::Proper => "=PROPER(B4)",
        FormulaKind::Text => "=TEXT(D2; \"Rp #.##0\")",
        FormulaKind::Left => "=LEFT(B2; 4)",
        FormulaKind::Right => "=RIGHT(B2; 7)",
        FormulaKind::Mid => "=MID(B2; 6; 7)",
        FormulaKind::Len => "=LEN(B2)",
        _ => "=UPPER(B2)",
    }
}

/// Parse a typed text-lab formula for the active function, against the lab's
/// table. Every failure explains itself.
pub fn parse_text_formula(
    input: &str,
    expected: FormulaKind,
    data: &Dataset,
) -> Result<FormulaArgs, FormulaDiagnostic> {
    let formula = input.trim();

    if !formula.starts_with('=') {
        return Err(FormulaDiagnostic::with_hint(
            "formula must start with \"=\"",
            format!("correct form: ={}(...)", expected.name()),
        ));
    }

    let Some(caps) = formula_pattern().captures(formula) else {
        if !formula.contains('(') {
            return Err(FormulaDiagnostic::with_hint(
                "opening parenthesis \"(\" not found",
                format!("format: ={}(...)", expected.name()),
            ));
        }
        if !formula.contains(')') {
            return Err(FormulaDiagnostic::with_hint(
                "closing parenthesis \")\" not found",
                "the formula must end with \")\"",
            ));
        }
        return Err(FormulaDiagnostic::with_hint(
            "invalid formula format",
            "check the spelling of the formula",
        ));
    };

    let func_name = caps[1].to_uppercase();
    let args_str = caps[2].to_string();

    if func_name != expected.name() {
        return Err(FormulaDiagnostic::with_hint(
            format!(
                "function \"{}\" does not match the active tab \"{}\"",
                func_name,
                expected.name()
            ),
            format!("write ={}(...) or switch tabs", expected.name()),
        ));
    }

    if args_str.contains(',') && !args_str.contains(';') {
        return Err(FormulaDiagnostic::with_hint(
            "use a semicolon (;) separator, not a comma (,)",
            "this workbook uses the Indonesian regional separator (;)",
        ));
    }

    // TEXT first: its quoted format argument needs its own pattern.
    if expected == FormulaKind::Text {
        let Some(caps) = text_format_pattern().captures(formula) else {
            return Err(FormulaDiagnostic::with_hint(
                "invalid TEXT format",
                "example: =TEXT(D2; \"Rp #.##0\")",
            ));
        };
        let cell = parse_cell(&caps[1], data)?;
        return Ok(FormulaArgs::Text {
            cell,
            format: caps[2].to_string(),
        });
    }

    let args: Vec<&str> = args_str.split(';').map(str::trim).collect();

    match expected {
        FormulaKind::Upper | FormulaKind::Lower | FormulaKind::Proper | FormulaKind::Len => {
            if args.len() != 1 || args[0].is_empty() {
                return Err(FormulaDiagnostic::with_hint(
                    "this function takes exactly 1 argument",
                    format!("example: ={}(B2)", expected.name()),
                ));
            }
            let cell = parse_cell(args[0], data)?;
            Ok(match expected {
                FormulaKind::Upper => FormulaArgs::Upper { cell },
                FormulaKind::Lower => FormulaArgs::Lower { cell },
                FormulaKind::Proper => FormulaArgs::Proper { cell },
                _ => FormulaArgs::Len { cell },
            })
        }
        FormulaKind::Left | FormulaKind::Right => {
            if args.is_empty() || args.len() > 2 {
                return Err(FormulaDiagnostic::with_hint(
                    "this function takes 1 or 2 arguments",
                    format!("example: ={}(B2; 3)", expected.name()),
                ));
            }
            let cell = parse_cell(args[0], data)?;
            let count = if args.len() == 2 {
                parse_count(args[1])?
            } else {
                1
            };
            Ok(if expected == FormulaKind::Left {
                FormulaArgs::Left { cell, count }
            } else {
                FormulaArgs::Right { cell, count }
            })
        }
        FormulaKind::Mid => {
            if args.len() != 3 {
                return Err(FormulaDiagnostic::with_hint(
                    "MID takes exactly 3 arguments",
                    "format: =MID(cell; start; count), e.g. =MID(B2; 3; 5)",
                ));
            }
            let cell = parse_cell(args[0], data)?;
            let start = args[1].parse::<usize>().ok().filter(|s| *s >= 1).ok_or_else(|| {
                FormulaDiagnostic::with_hint(
                    "start_num must be a number >= 1",
                    "the first character is position 1",
                )
            })?;
            let count = parse_count(args[2])?;
            Ok(FormulaArgs::Mid { cell, start, count })
        }
        _ => Err(FormulaDiagnostic::new(format!(
            "\"{}\" is not a text function",
            expected.name()
        ))),
    }
}

fn parse_cell(reference: &str, data: &Dataset) -> Result<CellRef, FormulaDiagnostic> {
    CellRef::parse(reference, data).ok_or_else(|| {
        let last_col = (b'A' + data.column_count().saturating_sub(1) as u8) as char;
        FormulaDiagnostic::with_hint(
            format!("cell \"{}\" is not valid", reference),
            format!("use a cell between A1 and {}{}", last_col, data.row_count()),
        )
    })
}

fn parse_count(raw: &str) -> Result<usize, FormulaDiagnostic> {
    raw.parse::<usize>().map_err(|_| {
        FormulaDiagnostic::with_hint(
            "num_chars must be a positive number",
            "e.g. 3, 4, 5",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{table, TableName};

    #[test]
    fn transforms() {
        assert_eq!(upper("budi santoso"), "BUDI SANTOSO");
        assert_eq!(lower("DEWI LESTARI"), "dewi lestari");
        assert_eq!(proper("andi WIJAYA pratama"), "Andi Wijaya Pratama");
        assert_eq!(left("budi santoso", 4), "budi");
        assert_eq!(right("budi santoso", 7), "santoso");
        assert_eq!(mid("budi santoso", 6, 7), "santoso");
        assert_eq!(len("budi santoso"), 12);
    }

    #[test]
    fn left_right_clamp_to_length() {
        assert_eq!(left("abc", 10), "abc");
        assert_eq!(right("abc", 10), "abc");
        assert_eq!(mid("abc", 9, 5), "");
        assert_eq!(mid("abc", 2, 99), "bc");
    }

    #[test]
    fn currency_format_groups_thousands() {
        assert_eq!(apply_format(5000000.0, "Rp #.##0"), "Rp 5.000.000");
        assert_eq!(apply_format(950.0, "#.##0"), "950");
    }

    #[test]
    fn percent_format() {
        assert_eq!(apply_format(0.15, "0%"), "15%");
    }

    #[test]
    fn serial_date_formats() {
        // 45292 = 2024-01-01 (a Monday)
        assert_eq!(apply_format(45292.0, "dd-mm-yyyy"), "01-01-2024");
        assert_eq!(apply_format(45292.0, "mmmm yyyy"), "Januari 2024");
        assert_eq!(apply_format(45292.0, "dddd"), "Senin");
    }

    #[test]
    fn cell_ref_round_trip() {
        let staff = table(TableName::Staff);
        let cell = CellRef::parse("b2", &staff).unwrap();
        assert_eq!(cell, CellRef::new(1, 1));
        assert_eq!(cell.label(), "B2");
        assert!(CellRef::parse("Z9", &staff).is_none());
        assert!(CellRef::parse("B99", &staff).is_none());
    }

    #[test]
    fn parser_accepts_well_formed_input() {
        let staff = table(TableName::Staff);
        let args = parse_text_formula("=UPPER(B2)", FormulaKind::Upper, &staff).unwrap();
        assert_eq!(
            args,
            FormulaArgs::Upper {
                cell: CellRef::new(1, 1)
            }
        );

        let args = parse_text_formula("=MID(B2; 3; 5)", FormulaKind::Mid, &staff).unwrap();
        assert_eq!(
            args,
            FormulaArgs::Mid {
                cell: CellRef::new(1, 1),
                start: 3,
                count: 5
            }
        );

        let args =
            parse_text_formula("=TEXT(D2; \"Rp #.##0\")", FormulaKind::Text, &staff).unwrap();
        assert_eq!(
            args,
            FormulaArgs::Text {
                cell: CellRef::new(1, 3),
                format: "Rp #.##0".to_string()
            }
        );
    }

    #[test]
    fn parser_diagnostics() {
        let staff = table(TableName::Staff);

        let err = parse_text_formula("UPPER(B2)", FormulaKind::Upper, &staff).unwrap_err();
        assert!(err.message.contains("start with"));

        let err = parse_text_formula("=LOWER(B2)", FormulaKind::Upper, &staff).unwrap_err();
        assert!(err.message.contains("does not match"));

        let err = parse_text_formula("=LEFT(B2, 3)", FormulaKind::Left, &staff).unwrap_err();
        assert!(err.message.contains("semicolon"));

        let err = parse_text_formula("=UPPER(Z9)", FormulaKind::Upper, &staff).unwrap_err();
        assert!(err.message.contains("not valid"));

        let err = parse_text_formula("=MID(B2; 0; 5)", FormulaKind::Mid, &staff).unwrap_err();
        assert!(err.message.contains("start_num"));
    }
}
