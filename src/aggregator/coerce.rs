use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;

use crate::table::Cell;

/// Best-effort conversion of a deposit cell to a decimal amount.
///
/// Returns `None` for anything that is not a finite number: empty cells,
/// non-numeric text, `NaN`/`inf`, booleans, dates, and values beyond the
/// decimal range. Text is trimmed before parsing; scientific notation is accepted.
pub fn coerce_deposit(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Int(i) => Some(Decimal::from(*i)),
        Cell::Float(f) => from_float(*f),
        Cell::Text(s) => parse_text(s),
        Cell::Empty | Cell::Bool(_) | Cell::Date(_) => None,
    }
}

// Rounds to about 15 significant digits: 10.01f64 becomes exactly 10.01 and
// 0.1 + 0.2 becomes 0.3.
fn from_float(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    Decimal::from_f64(f)
}

fn parse_text(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    let f: f64 = s.parse().ok()?;
    if !f.is_finite() {
        return None;
    }

    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .or_else(|| from_float(f))
}
