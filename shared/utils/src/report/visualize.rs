//! ASCII bar visualization of verdicts.

use coacheck_models::{Outcome, Predicate, Verdict};
use std::cmp::Ordering;

/// Column of the `|` marker for `value` inside `[low, high]`.
///
/// `None` unless `high > low`. Values outside the range clamp to the ends.
pub fn marker_position(value: f64, low: f64, high: f64, width: usize) -> Option<usize> {
    let spans = matches!(high.partial_cmp(&low), Some(Ordering::Greater));
    if width == 0 || !spans || !value.is_finite() {
        return None;
    }

    let position = ((value - low) / (high - low)) * width as f64;
    let last = (width - 1) as f64;
    Some(position.trunc().clamp(0.0, last) as usize)
}

fn fill(outcome: Outcome) -> (char, char) {
    match outcome {
        Outcome::Pass => ('█', '✓'),
        Outcome::Fail => ('▒', '✗'),
        Outcome::Undetermined => ('░', '?'),
    }
}

/// One bar line: `name [bar] indicator`.
pub fn render_bar(verdict: &Verdict, width: usize) -> String {
    let (fill_char, indicator) = fill(verdict.outcome);
    let mut bar: Vec<char> = vec![fill_char; width];

    if let (Predicate::Range { low, high }, Some(value)) = (&verdict.predicate, verdict.numeric_value) {
        if let Some(position) = marker_position(value, *low, *high, width) {
            bar[position] = '|';
        }
    }

    let bar: String = bar.into_iter().collect();
    format!("{:<15} [{}] {}", verdict.record.name, bar, indicator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coacheck_models::TestRecord;

    fn verdict(value: f64, predicate: Predicate, outcome: Outcome) -> Verdict {
        Verdict {
            record: TestRecord::new("ML100", value.to_string()),
            predicate,
            numeric_value: Some(value),
            outcome,
        }
    }

    #[test]
    fn test_marker_position() {
        assert_eq!(marker_position(47.0, 47.0, 59.0, 50), Some(0));
        assert_eq!(marker_position(53.0, 47.0, 59.0, 50), Some(25));
        assert_eq!(marker_position(59.0, 47.0, 59.0, 50), Some(49));
        assert_eq!(marker_position(100.0, 47.0, 59.0, 50), Some(49));
        assert_eq!(marker_position(-3.0, 47.0, 59.0, 50), Some(0));
        assert_eq!(marker_position(5.0, 5.0, 5.0, 50), None);
        assert_eq!(marker_position(5.0, 9.0, 1.0, 50), None);
    }

    #[test]
    fn test_range_bar_has_marker() {
        let line = render_bar(
            &verdict(53.0, Predicate::Range { low: 47.0, high: 59.0 }, Outcome::Pass),
            10,
        );
        assert_eq!(line, "ML100           [█████|████] ✓");
    }

    #[test]
    fn test_limit_bar_has_no_marker() {
        let line = render_bar(&verdict(1.45, Predicate::Maximum { limit: 1.3 }, Outcome::Fail), 4);
        assert_eq!(line, "ML100           [▒▒▒▒] ✗");
    }

    #[test]
    fn test_undetermined_bar() {
        let line = render_bar(&verdict(1.0, Predicate::exact(""), Outcome::Undetermined), 3);
        assert!(line.ends_with("[░░░] ?"));
    }
}
