use serde_json::Value;

pub const DEFAULT_DIGITS: usize = 4;
pub const METRIC_DIGITS: usize = 6;

/// Columns rendered as fixed-point decimals.
pub const METRIC_COLUMNS: [&str; 4] = ["mu_1d", "sigma", "z_score", "p_pos"];

pub const LABEL_COLUMN: &str = "label";
pub const DEFAULT_LABEL: &str = "neutral";

/// A rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    /// Tag whose CSS class and text are the same lower-cased label.
    Pill(String),
}

impl Cell {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(s) | Self::Pill(s) => s,
        }
    }
}

/// Plain string form of a value; null renders empty.
pub fn display_value(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => float_string(f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Shortest round-trip form; magnitudes below `1e-6` or from `1e21` up use exponent notation
/// (`1e-7`, `1.5e+21`), matching how browsers stringify numbers.
fn float_string(f: f64) -> String {
    let mag = f.abs();
    if f == 0.0 || (1e-6..1e21).contains(&mag) {
        return f.to_string();
    }
    let exp = format!("{f:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// Fixed-point rendering for finite numbers; null is empty; anything else is shown as-is.
pub fn format_num(v: &Value, digits: usize) -> String {
    match v {
        Value::Null => String::new(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() => to_fixed(f, digits),
            _ => display_value(v),
        },
        other => display_value(other),
    }
}

/// Format `x` with exactly `digits` decimals, rounding half away from zero on the shortest
/// decimal representation of `x` (so `0.0012345` becomes `0.001235`).
pub fn to_fixed(x: f64, digits: usize) -> String {
    let repr = x.abs().to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut frac: Vec<u8> = frac_part.bytes().collect();
    let round_up = frac.len() > digits && frac[digits] >= b'5';
    frac.resize(digits, b'0');

    let mut all: Vec<u8> = int_part.bytes().chain(frac).collect();
    if round_up {
        let mut i = all.len();
        loop {
            if i == 0 {
                all.insert(0, b'1');
                break;
            }
            i -= 1;
            if all[i] == b'9' {
                all[i] = b'0';
            } else {
                all[i] += 1;
                break;
            }
        }
    }

    let split = all.len() - digits;
    let mut out = String::with_capacity(all.len() + 2);
    if x < 0.0 {
        out.push('-');
    }
    out.push_str(std::str::from_utf8(&all[..split]).unwrap_or("0"));
    if digits > 0 {
        out.push('.');
        out.push_str(std::str::from_utf8(&all[split..]).unwrap_or(""));
    }
    out
}

/// Per-column cell formatting; independent of the row's position.
pub fn format_cell(column: &str, v: &Value) -> Cell {
    if column == LABEL_COLUMN {
        let label = match v {
            Value::Null | Value::Bool(false) => String::new(),
            Value::String(s) => s.to_lowercase(),
            other => display_value(other).to_lowercase(),
        };
        let label = if label.is_empty() {
            DEFAULT_LABEL.to_string()
        } else {
            label
        };
        return Cell::Pill(label);
    }

    if METRIC_COLUMNS.contains(&column) {
        return Cell::Text(format_num(v, METRIC_DIGITS));
    }

    Cell::Text(display_value(v))
}

/// Numeric reading of a cell for sorting: JSON numbers and numeric strings, finite only.
pub fn numeric_value(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_fixed_rounds_half_away_from_zero() {
        assert_eq!(to_fixed(0.0012345, 6), "0.001235");
        assert_eq!(to_fixed(0.01, 6), "0.010000");
        assert_eq!(to_fixed(-0.12, 6), "-0.120000");
        assert_eq!(to_fixed(9.9999995, 6), "10.000000");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.0, 4), "0.0000");
    }

    #[test]
    fn format_num_fallbacks() {
        assert_eq!(format_num(&Value::Null, DEFAULT_DIGITS), "");
        assert_eq!(format_num(&json!(1.23456), DEFAULT_DIGITS), "1.2346");
        assert_eq!(format_num(&json!("n/a"), DEFAULT_DIGITS), "n/a");
        assert_eq!(format_num(&json!(true), DEFAULT_DIGITS), "true");
        assert_eq!(format_num(&json!(3), 2), "3.00");
    }

    #[test]
    fn metric_columns_use_six_decimals() {
        assert_eq!(format_cell("mu_1d", &json!(0.0012345)), Cell::Text("0.001235".into()));
        assert_eq!(format_cell("p_pos", &json!(0.55)), Cell::Text("0.550000".into()));
        assert_eq!(format_cell("sigma", &json!("nan")), Cell::Text("nan".into()));
        assert_eq!(format_cell("z_score", &Value::Null), Cell::Text(String::new()));
    }

    #[test]
    fn label_column_is_a_lowercased_pill() {
        assert_eq!(format_cell("label", &json!("Undervalued")), Cell::Pill("undervalued".into()));
        assert_eq!(format_cell("label", &Value::Null), Cell::Pill("neutral".into()));
        assert_eq!(format_cell("label", &json!("")), Cell::Pill("neutral".into()));
        assert_eq!(format_cell("label", &json!(1)), Cell::Pill("1".into()));
    }

    #[test]
    fn other_columns_render_raw() {
        assert_eq!(format_cell("ticker", &json!("AAPL")), Cell::Text("AAPL".into()));
        assert_eq!(format_cell("vol_20d", &json!(0.25)), Cell::Text("0.25".into()));
        assert_eq!(format_cell("notes", &Value::Null), Cell::Text(String::new()));
    }

    #[test]
    fn extreme_floats_use_exponent_form() {
        assert_eq!(display_value(&json!(1e-7)), "1e-7");
        assert_eq!(display_value(&json!(1.5e21)), "1.5e+21");
        assert_eq!(display_value(&json!(0.000001)), "0.000001");
        assert_eq!(display_value(&json!(-2.5e-8)), "-2.5e-8");
        assert_eq!(display_value(&json!(0.0)), "0");
    }

    #[test]
    fn numeric_value_reads_numbers_and_numeric_strings() {
        assert_eq!(numeric_value(&json!(2)), Some(2.0));
        assert_eq!(numeric_value(&json!(" 10 ")), Some(10.0));
        assert_eq!(numeric_value(&json!("AAPL")), None);
        assert_eq!(numeric_value(&json!("")), None);
        assert_eq!(numeric_value(&json!("inf")), None);
        assert_eq!(numeric_value(&Value::Null), None);
    }
}
