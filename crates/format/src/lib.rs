//! Number formatting used by the foiltools writers
//!
//! These are left public for convenience.
//!
//! Step data rows are written the way a C++ output stream writes doubles by
//! default (`%g` with 6 significant digits), and run summaries use a padded
//! scientific notation. Both live here so every writer agrees on them.

// standard library
use std::fmt::{Display, LowerExp};

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Extends numeric primitives with stream-style formatting options
pub trait NumFormat {
    /// Better scientific number formatting
    ///
    /// The exponent is always signed and padded with zeros to `exp_pad`
    /// digits.
    ///
    /// ```rust
    /// # use foiltools_format::NumFormat;
    /// let number = -1.0_f64;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1234.5_f64).sci(2, 3), "1.23e+003".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// General notation with `precision` significant digits
    ///
    /// Mirrors `%g`: fixed notation unless the decimal exponent is below -4 or
    /// at least `precision`, trailing zeros removed in both forms.
    ///
    /// ```rust
    /// # use foiltools_format::NumFormat;
    /// assert_eq!((7.5_f64).general(6), "7.5");
    /// assert_eq!((10007.5_f64).general(6), "10007.5");
    /// assert_eq!((1234567.0_f64).general(6), "1.23457e+06");
    /// assert_eq!((0.00001_f64).general(6), "1e-05");
    /// assert_eq!((0.0_f64).general(6), "0");
    /// ```
    fn general(&self, precision: usize) -> String;
}

impl<T: LowerExp + Display> NumFormat for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // inf and NaN have no exponent to fix up
        let Some(split) = num.find('e') else {
            return num.to_lowercase();
        };
        let exp = num.split_off(split);
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }

    fn general(&self, precision: usize) -> String {
        let precision = precision.max(1);

        // Rounding to the significant digits first decides the exponent, so
        // 9.9999996 correctly becomes 10 rather than 9.99999
        let rounded = f!("{:.p$e}", &self, p = precision - 1);
        let Some(split) = rounded.find('e') else {
            return rounded.to_lowercase();
        };
        let exp = rounded[split + 1..].parse::<i32>().unwrap_or(0);

        if exp < -4 || exp >= precision as i32 {
            let mantissa = trim_fraction(&rounded[..split]);
            let sign = if exp < 0 { '-' } else { '+' };
            f!("{mantissa}e{sign}{:02}", exp.abs())
        } else {
            let decimals = (precision as i32 - 1 - exp).max(0) as usize;
            trim_fraction(&f!("{:.decimals$}", &self, decimals = decimals)).to_string()
        }
    }
}

/// Remove trailing zeros, and the point itself if nothing is left after it
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
