//! nom parsers for header and data lines

// nom parser combinators
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{self, anychar, space0, space1};
use nom::combinator::all_consuming;
use nom::multi::{count, separated_list1};
use nom::number::complete::double;
use nom::sequence::{preceded, separated_pair, terminated};
use nom::IResult;

/// Raw values of a data row, before any validation
#[derive(Debug, PartialEq)]
pub(crate) struct RawRow<'a> {
    pub event_id: i32,
    pub particle: &'a str,
    pub volume_code: u8,
    pub values: Vec<f64>,
}

/// Number of floating point columns following the volume code
pub(crate) const N_VALUES: usize = 8;

/// List of `name/T` column descriptors separated by `:`
pub(crate) fn header_columns(i: &str) -> IResult<&str, Vec<(&str, char)>> {
    all_consuming(separated_list1(tag(":"), column_descriptor))(i)
}

/// Single `name/T` column descriptor
fn column_descriptor(i: &str) -> IResult<&str, (&str, char)> {
    separated_pair(
        take_till1(|c: char| c == '/' || c == ':' || c.is_whitespace()),
        tag("/"),
        anychar,
    )(i)
}

/// Whitespace separated data row
///
/// Fields are located by position only, so any amount of padding is fine.
pub(crate) fn data_row(i: &str) -> IResult<&str, RawRow> {
    let (i, event_id) = preceded(space0, complete::i32)(i)?;
    let (i, particle) = preceded(space1, take_till1(char::is_whitespace))(i)?;
    let (i, volume_code) = preceded(space1, complete::u8)(i)?;
    let (i, values) = terminated(count(preceded(space1, double), N_VALUES), space0)(i)?;

    Ok((
        i,
        RawRow {
            event_id,
            particle,
            volume_code,
            values,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors() {
        assert_eq!(
            column_descriptor("EventID/I:particle/C"),
            Ok((":particle/C", ("EventID", 'I')))
        );
        assert!(column_descriptor("/I").is_err());
        assert!(column_descriptor("EventID").is_err());
    }

    #[test]
    fn header_must_be_fully_consumed() {
        let (_, columns) = header_columns("a/I:b/C:c/D").unwrap();
        assert_eq!(columns, vec![("a", 'I'), ("b", 'C'), ("c", 'D')]);
        assert!(header_columns("a/I:b/C trailing").is_err());
    }

    #[test]
    fn padded_row() {
        let line = "     7      proton           1       12.5  ";
        let line = format!("{line}     1500     0.0042      8.25     168000    1e-05    -3.2    10007.5 ");
        let (rest, row) = data_row(&line).unwrap();
        assert_eq!(rest, "");
        assert_eq!(row.event_id, 7);
        assert_eq!(row.particle, "proton");
        assert_eq!(row.volume_code, 1);
        assert_eq!(
            row.values,
            vec![12.5, 1500.0, 0.0042, 8.25, 168000.0, 1e-5, -3.2, 10007.5]
        );
    }

    #[test]
    fn particle_names_with_symbols() {
        let line = " 0  e-  3  0 1 2 3 4 5 6 7";
        let (_, row) = data_row(line).unwrap();
        assert_eq!(row.particle, "e-");
        assert_eq!(row.volume_code, 3);
    }

    #[test]
    fn short_rows_fail() {
        assert!(data_row(" 0 proton 1 0.1 0.2 0.3").is_err());
        assert!(data_row(" x proton 1 0 1 2 3 4 5 6 7").is_err());
    }
}
