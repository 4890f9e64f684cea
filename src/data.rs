//! Dataset provider: the fixed tables each lab simulates against, and the
//! `Workbook` bundle the resolver evaluates within.
//!
//! Tables are small, immutable, rectangular string grids. Numeric-looking
//! cells stay strings and are parsed on demand, exactly as a spreadsheet
//! displays them. Cell edits (chart lab) replace the dataset wholesale via
//! [`Dataset::with_cell`] rather than mutating in place.

use crate::core::resolver::FormulaKind;
use crate::error::{VlabError, VlabResult};

/// An immutable rectangular grid of cell text. Row 0 is the header row for
/// vertical tables; column 0 plays that role for horizontal tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset, enforcing the rectangular invariant.
    pub fn new(rows: Vec<Vec<String>>) -> VlabResult<Self> {
        if let Some(first) = rows.first() {
            let width = first.len();
            if let Some(bad) = rows.iter().position(|r| r.len() != width) {
                return Err(VlabError::Dataset(format!(
                    "row {} has {} cells, expected {}",
                    bad,
                    rows[bad].len(),
                    width
                )));
            }
        }
        Ok(Self { rows })
    }

    fn from_rows(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Cell text at a zero-based coordinate, if in bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Header cell for a column (row 0).
    pub fn header(&self, col: usize) -> Option<&str> {
        self.cell(0, col)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Data rows only (header row excluded), with their absolute row index.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, r)| (i, r.as_slice()))
    }

    /// Return a copy with one cell replaced. Out-of-bounds coordinates are an
    /// error, not a silent extension of the grid.
    pub fn with_cell(&self, row: usize, col: usize, value: impl Into<String>) -> VlabResult<Self> {
        if row >= self.row_count() || col >= self.column_count() {
            return Err(VlabError::Dataset(format!(
                "cell ({}, {}) outside a {}x{} table",
                row,
                col,
                self.row_count(),
                self.column_count()
            )));
        }
        let mut rows = self.rows.clone();
        rows[row][col] = value.into();
        Ok(Self { rows })
    }
}

/// The named fixture tables. Compile-time known; no error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableName {
    /// Menu/price list for simple VLOOKUP (ID, Menu, Harga, Stok)
    Menu,
    /// Monthly revenue row pair for simple HLOOKUP (Bulan / Omzet)
    MonthlyRevenue,
    /// Customer order table (complex VLOOKUP context)
    Orders,
    /// Menu reference table looked up from the order table
    MenuReference,
    /// Employee roster (complex HLOOKUP context)
    Employees,
    /// Salary grade reference table looked up from the roster
    SalaryGrades,
    /// Category/sales summary for the COUNTIF/SUMIF family
    SalesSummary,
    /// Single-row discount options for CHOOSE
    DiscountOptions,
    /// Staff directory for the text-function lab
    Staff,
}

/// Fetch a fixture table by name.
pub fn table(name: TableName) -> Dataset {
    let rows: &[&[&str]] = match name {
        TableName::Menu => &[
            &["ID", "Menu", "Harga", "Stok"],
            &["K01", "Nasi Goreng", "15000", "10"],
            &["K02", "Mie Ayam", "12000", "15"],
            &["K03", "Es Teh", "5000", "50"],
            &["K04", "Soto Ayam", "13000", "8"],
        ],
        TableName::MonthlyRevenue => &[
            &["Bulan", "Jan", "Feb", "Mar", "Apr"],
            &["Omzet", "200k", "250k", "210k", "300k"],
        ],
        TableName::Orders => &[
            &["No", "Pelanggan", "Kode Menu", "Qty", "Harga", "Total"],
            &["1", "Budi", "M02", "2", "?", "?"],
            &["2", "Ani", "M01", "1", "?", "?"],
            &["3", "Dedi", "M04", "3", "?", "?"],
            &["4", "Sari", "M03", "2", "?", "?"],
        ],
        TableName::MenuReference => &[
            &["Kode", "Menu", "Harga", "Kategori"],
            &["M01", "Nasi Goreng", "15000", "Makanan"],
            &["M02", "Mie Ayam", "12000", "Makanan"],
            &["M03", "Es Teh", "5000", "Minuman"],
            &["M04", "Soto Ayam", "13000", "Makanan"],
        ],
        TableName::Employees => &[
            &["No", "Nama", "Golongan", "Gaji Pokok", "Tunjangan"],
            &["1", "Widhi", "2B", "?", "?"],
            &["2", "Bambang", "2C", "?", "?"],
            &["3", "Santoso", "2A", "?", "?"],
            &["4", "Sardi", "2D", "?", "?"],
        ],
        TableName::SalaryGrades => &[
            &["Golongan", "2A", "2B", "2C", "2D"],
            &["Gaji Pokok", "750000", "1000000", "1200000", "1500000"],
            &["Tunjangan", "10%", "15%", "20%", "25%"],
        ],
        TableName::SalesSummary => &[
            &["Kategori", "Menu", "Terjual", "Omzet"],
            &["Makanan", "Nasi Goreng", "25", "375000"],
            &["Minuman", "Es Teh", "50", "250000"],
            &["Makanan", "Mie Ayam", "20", "240000"],
            &["Minuman", "Jus Jeruk", "30", "300000"],
        ],
        TableName::DiscountOptions => &[&["Diskon 5%", "Diskon 10%", "Diskon 15%"]],
        TableName::Staff => &[
            &["No", "Nama Lengkap", "Jabatan", "Gaji", "Tgl Masuk"],
            &["1", "budi santoso", "staff IT", "5000000", "45292"],
            &["2", "DEWI LESTARI", "manager HR", "8500000", "44562"],
            &["3", "andi WIJAYA pratama", "supervisor", "6500000", "45000"],
            &["4", "siti NURhayati", "admin keuangan", "4500000", "44927"],
            &["5", "rahmat hidayat", "kepala divisi", "9000000", "44197"],
        ],
    };
    Dataset::from_rows(rows)
}

/// Whether a lookup lab runs against one table or the two-table arrangement
/// (context table plus reference table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationMode {
    #[default]
    Simple,
    Complex,
}

/// The tables active for one simulation. The resolver reads from here only;
/// it never fetches tables itself.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub vertical: Dataset,
    pub horizontal: Dataset,
    pub choice: Dataset,
    /// Context table for complex-mode cell-address lookups (orders / roster).
    pub context: Option<Dataset>,
    /// Display-only offset added to reference-table row labels, mirroring
    /// where the table sits on screen in complex mode.
    pub row_label_offset: usize,
}

impl Workbook {
    /// Assemble the workbook a formula kind runs against.
    pub fn for_kind(kind: FormulaKind, mode: SimulationMode) -> Self {
        let mut book = Self {
            vertical: table(TableName::Menu),
            horizontal: table(TableName::MonthlyRevenue),
            choice: table(TableName::DiscountOptions),
            context: None,
            row_label_offset: 0,
        };

        match kind {
            FormulaKind::VLookup => {
                if mode == SimulationMode::Complex {
                    book.vertical = table(TableName::MenuReference);
                    book.context = Some(table(TableName::Orders));
                    book.row_label_offset = 9;
                }
            }
            FormulaKind::HLookup => {
                if mode == SimulationMode::Complex {
                    book.horizontal = table(TableName::SalaryGrades);
                    book.context = Some(table(TableName::Employees));
                    book.row_label_offset = 9;
                }
            }
            FormulaKind::CountIf
            | FormulaKind::SumIf
            | FormulaKind::CountIfs
            | FormulaKind::SumIfs => {
                book.vertical = table(TableName::SalesSummary);
            }
            k if k.is_text() => {
                book.vertical = table(TableName::Staff);
            }
            _ => {}
        }

        book
    }
}
