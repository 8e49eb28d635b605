//! Quantization of slider and typed values.
//!
//! Dragged and typed input both go through the same functions, so the panel
//! only ever holds values from one discrete set.

use super::Range;

pub const PRICE_STEP_LOW: f64 = 50_000.0;
pub const PRICE_STEP_HIGH: f64 = 100_000.0;
pub const PRICE_STEP_THRESHOLD: f64 = 1_000_000.0;
pub const AREA_STEP: f64 = 10.0;

/// Below one million: 50k grid. From one million up: 100k grid anchored at one million.
pub fn snap_price(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    if value < PRICE_STEP_THRESHOLD {
        let snapped = (value / PRICE_STEP_LOW).round() * PRICE_STEP_LOW;
        // 975k rounds up to the threshold, which is on both grids
        snapped.min(PRICE_STEP_THRESHOLD)
    } else {
        let steps = ((value - PRICE_STEP_THRESHOLD) / PRICE_STEP_HIGH).round();
        PRICE_STEP_THRESHOLD + steps * PRICE_STEP_HIGH
    }
}

pub fn snap_area(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    (value / AREA_STEP).round() * AREA_STEP
}

/// Clamp typed price into `bounds`, then snap.
pub fn clamp_price_input(value: f64, bounds: Range) -> f64 {
    clamp_then_snap(value, bounds, Grid::Price)
}

/// Clamp typed area into `bounds`, then snap.
pub fn clamp_area_input(value: f64, bounds: Range) -> f64 {
    clamp_then_snap(value, bounds, Grid::Area)
}

#[derive(Clone, Copy)]
enum Grid {
    Price,
    Area,
}

impl Grid {
    fn snap(self, value: f64) -> f64 {
        match self {
            Grid::Price => snap_price(value),
            Grid::Area => snap_area(value),
        }
    }

    /// Size of the grid cell just below `value`.
    fn step_below(self, value: f64) -> f64 {
        match self {
            Grid::Price if value <= PRICE_STEP_THRESHOLD => PRICE_STEP_LOW,
            Grid::Price => PRICE_STEP_HIGH,
            Grid::Area => AREA_STEP,
        }
    }

    /// Size of the grid cell just above `value`.
    fn step_above(self, value: f64) -> f64 {
        match self {
            Grid::Price if value < PRICE_STEP_THRESHOLD => PRICE_STEP_LOW,
            Grid::Price => PRICE_STEP_HIGH,
            Grid::Area => AREA_STEP,
        }
    }
}

fn clamp_then_snap(value: f64, bounds: Range, grid: Grid) -> f64 {
    let value = if value.is_finite() { value } else { bounds.min };
    let upper = bounds.upper().max(bounds.min);
    let snapped = grid.snap(value.clamp(bounds.min, upper));
    // off-grid bounds can round past themselves
    if snapped > upper {
        (snapped - grid.step_below(snapped)).max(0.0)
    } else if snapped < bounds.min {
        let up = snapped + grid.step_above(snapped);
        if up <= upper {
            up
        } else {
            bounds.min
        }
    } else {
        snapped
    }
}

/// Parse text typed into a numeric box: `"€ 1.250.000"`, `"300,000"`, `"85 m²"`,
/// `"85.5"`, `"-50"`.
///
/// A last `.` or `,` followed by one or two digits is a decimal point; every
/// other separator groups thousands.
pub fn parse_numeric_input(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(*c, '.' | ',' | '-'))
        .collect();
    let negative = kept
        .trim_start_matches(|c: char| c == '.' || c == ',')
        .starts_with('-');
    let body: String = kept.chars().filter(|c| *c != '-').collect();

    let (whole, fraction) = match body.rfind(|c: char| c == '.' || c == ',') {
        Some(pos) if (1..=2).contains(&(body.len() - pos - 1)) => {
            (&body[..pos], &body[pos + 1..])
        }
        _ => (body.as_str(), ""),
    };
    let whole: String = whole.chars().filter(|c| c.is_ascii_digit()).collect();
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let number = format!(
        "{}.{}",
        if whole.is_empty() { "0" } else { whole.as_str() },
        if fraction.is_empty() { "0" } else { fraction }
    );
    let value = number.parse::<f64>().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_below_a_million_uses_fifty_thousand_grid() {
        assert_eq!(snap_price(120_000.0), 100_000.0);
        assert_eq!(snap_price(130_000.0), 150_000.0);
        assert_eq!(snap_price(24_999.0), 0.0);
        assert_eq!(snap_price(980_000.0), 1_000_000.0);
    }

    #[test]
    fn price_above_a_million_uses_hundred_thousand_grid() {
        assert_eq!(snap_price(1_000_000.0), 1_000_000.0);
        assert_eq!(snap_price(1_040_000.0), 1_000_000.0);
        assert_eq!(snap_price(1_260_000.0), 1_300_000.0);
        assert_eq!(snap_price(9_990_000.0), 10_000_000.0);
    }

    #[test]
    fn snapping_is_idempotent_and_on_grid() {
        let mut v = 0.0;
        while v < 12_000_000.0 {
            let once = snap_price(v);
            assert_eq!(snap_price(once), once, "value {v}");
            if once < PRICE_STEP_THRESHOLD {
                assert_eq!(once % PRICE_STEP_LOW, 0.0, "value {v}");
            } else {
                assert_eq!((once - PRICE_STEP_THRESHOLD) % PRICE_STEP_HIGH, 0.0, "value {v}");
            }
            v += 7_919.0;
        }
    }

    #[test]
    fn garbage_snaps_to_zero() {
        assert_eq!(snap_price(-5.0), 0.0);
        assert_eq!(snap_price(f64::NAN), 0.0);
        assert_eq!(snap_area(f64::INFINITY), 0.0);
    }

    #[test]
    fn area_uses_ten_unit_steps() {
        assert_eq!(snap_area(84.0), 80.0);
        assert_eq!(snap_area(85.0), 90.0);
        assert_eq!(snap_area(snap_area(123.4)), 120.0);
    }

    #[test]
    fn typed_values_are_clamped_then_snapped() {
        let bounds = Range::new(0.0, 10_000_000.0);
        assert_eq!(clamp_price_input(25_000_000.0, bounds), 10_000_000.0);
        assert_eq!(clamp_price_input(-3.0, bounds), 0.0);
        assert_eq!(clamp_price_input(312_000.0, bounds), 300_000.0);

        // typed and dragged converge
        assert_eq!(clamp_price_input(1_234_567.0, bounds), snap_price(1_234_567.0));
    }

    #[test]
    fn off_grid_upper_bound_is_never_exceeded() {
        let bounds = Range::new(0.0, 995.0);
        assert_eq!(clamp_area_input(2_000.0, bounds), 990.0);
    }

    #[test]
    fn off_grid_lower_bound_is_never_undercut() {
        let bounds = Range::new(20_000.0, 10_000_000.0);
        assert_eq!(clamp_price_input(0.0, bounds), 50_000.0);
        assert_eq!(clamp_price_input(21_000.0, bounds), 50_000.0);
        assert_eq!(clamp_area_input(0.0, Range::new(14.0, 995.0)), 20.0);
        // no grid value fits: stay on the bound
        assert_eq!(clamp_price_input(0.0, Range::new(20_000.0, 30_000.0)), 20_000.0);
    }

    #[test]
    fn open_upper_bound_only_clamps_below() {
        let bounds = Range::at_least(0.0);
        assert_eq!(clamp_price_input(12_540_000.0, bounds), 12_500_000.0);
        assert_eq!(clamp_price_input(-10.0, bounds), 0.0);
    }

    #[test]
    fn numeric_text_is_stripped_of_formatting() {
        assert_eq!(parse_numeric_input("€ 1.250.000"), Some(1_250_000.0));
        assert_eq!(parse_numeric_input("300,000"), Some(300_000.0));
        assert_eq!(parse_numeric_input("85 m²"), Some(85.0));
        assert_eq!(parse_numeric_input("abc"), None);
        assert_eq!(parse_numeric_input(""), None);
    }

    #[test]
    fn short_trailing_group_is_a_decimal() {
        assert_eq!(parse_numeric_input("85.5"), Some(85.5));
        assert_eq!(parse_numeric_input("85,5 m²"), Some(85.5));
        assert_eq!(parse_numeric_input("1.250,75"), Some(1_250.75));
        assert_eq!(parse_numeric_input("300.000"), Some(300_000.0));
        assert_eq!(parse_numeric_input("85."), Some(85.0));
    }

    #[test]
    fn leading_minus_is_negative() {
        assert_eq!(parse_numeric_input("-50"), Some(-50.0));
        assert_eq!(parse_numeric_input("€ -1.000"), Some(-1_000.0));
        assert_eq!(parse_numeric_input("-"), None);
    }
}
