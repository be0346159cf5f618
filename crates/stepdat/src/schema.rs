//! Column layout of step data files
//!
//! The header is a single line of `name/type` descriptors separated by `:`,
//! which is exactly the branch descriptor ROOT's `TTree::ReadFile` expects,
//! so the files load straight into a tree.

// crate modules
use crate::error::{Error, Result};
use crate::parsers::header_columns;

// foiltools modules
use foiltools_format::f;

/// Leaf type of a column, as used in the branch descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// 32-bit signed integer (`I`)
    Integer,
    /// Character string (`C`)
    String,
    /// 64-bit floating point (`D`)
    Double,
}

impl ColumnKind {
    /// Single character type code
    pub fn symbol(&self) -> char {
        match self {
            ColumnKind::Integer => 'I',
            ColumnKind::String => 'C',
            ColumnKind::Double => 'D',
        }
    }

    /// Type from its single character code
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'I' => Some(ColumnKind::Integer),
            'C' => Some(ColumnKind::String),
            'D' => Some(ColumnKind::Double),
            _ => None,
        }
    }
}

/// Description of one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Column name, including the unit suffix
    pub name: &'static str,
    /// Leaf type
    pub kind: ColumnKind,
    /// Unit of the values, if any
    pub unit: Option<&'static str>,
    /// Minimum width of the descriptor in the header line
    pub header_width: usize,
    /// Minimum width of the value in data rows
    pub row_width: usize,
}

impl Column {
    const fn new(
        name: &'static str,
        kind: ColumnKind,
        unit: Option<&'static str>,
        header_width: usize,
        row_width: usize,
    ) -> Self {
        Self {
            name,
            kind,
            unit,
            header_width,
            row_width,
        }
    }

    /// Branch descriptor for the column, e.g. `edepStep_keV/D`
    pub fn descriptor(&self) -> String {
        f!("{}/{}", self.name, self.kind.symbol())
    }
}

/// Every column of a step data file, in order
pub const COLUMNS: [Column; 11] = [
    Column::new("EventID", ColumnKind::Integer, None, 5, 5),
    Column::new("particle", ColumnKind::String, None, 5, 10),
    Column::new("volumeName", ColumnKind::Integer, None, 10, 10),
    Column::new("edepStep_keV", ColumnKind::Double, Some("keV"), 10, 10),
    Column::new("KEparticle_keV", ColumnKind::Double, Some("keV"), 10, 10),
    Column::new("global_t_ns", ColumnKind::Double, Some("ns"), 10, 10),
    Column::new("steplen_um", ColumnKind::Double, Some("um"), 10, 10),
    Column::new("momentum_keV", ColumnKind::Double, Some("keV"), 10, 10),
    Column::new("globalx_um", ColumnKind::Double, Some("um"), 10, 10),
    Column::new("globaly_um", ColumnKind::Double, Some("um"), 10, 10),
    Column::new("globalz_um", ColumnKind::Double, Some("um"), 10, 10),
];

/// Older files label the step length column in mm, but the values were
/// always written in um
const LEGACY_ALIASES: [(&str, &str); 1] = [("steplen_mm", "steplen_um")];

/// Header line written at the top of every file, without the newline
///
/// ```rust
/// # use foiltools_stepdat::header_line;
/// assert!(header_line().starts_with("EventID/I:particle/C:volumeName/I:edepStep_keV/D:"));
/// assert!(header_line().ends_with(":globalz_um/D"));
/// ```
pub fn header_line() -> String {
    let last = COLUMNS.len() - 1;
    COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let descriptor = if i == last {
                column.descriptor()
            } else {
                f!("{}:", column.descriptor())
            };
            f!("{:>width$}", descriptor, width = column.header_width)
        })
        .collect()
}

/// Parse a header line into column names and leaf types
///
/// No check is made against [COLUMNS], see [validate_header()] for that.
///
/// ```rust
/// # use foiltools_stepdat::{parse_header, ColumnKind};
/// let columns = parse_header("EventID/I:particle/C").unwrap();
/// assert_eq!(columns[1], ("particle".to_string(), ColumnKind::String));
/// ```
pub fn parse_header(line: &str) -> Result<Vec<(String, ColumnKind)>> {
    let (_, found) = header_columns(line.trim())?;
    found
        .into_iter()
        .map(|(name, symbol)| {
            ColumnKind::from_symbol(symbol)
                .map(|kind| (name.to_string(), kind))
                .ok_or_else(|| Error::ParseError(f!("unknown leaf type {symbol:?} for {name}")))
        })
        .collect()
}

/// Check a header line against the expected columns
///
/// Column names and types must match [COLUMNS] exactly, apart from the known
/// legacy `steplen_mm` label.
pub fn validate_header(line: &str) -> Result<()> {
    let (_, found) = header_columns(line.trim())?;

    let unexpected = || Error::UnexpectedHeader {
        expected: header_line(),
        found: line.trim().to_string(),
    };

    if found.len() != COLUMNS.len() {
        return Err(unexpected());
    }

    for ((name, kind), column) in found.iter().zip(COLUMNS.iter()) {
        let name = LEGACY_ALIASES
            .iter()
            .find(|(legacy, _)| legacy == name)
            .map(|(_, current)| *current)
            .unwrap_or(*name);

        if name != column.name || ColumnKind::from_symbol(*kind) != Some(column.kind) {
            return Err(unexpected());
        }
    }

    Ok(())
}
