//! # Page Break Decisions
//!
//! Deciding, before anything is drawn, whether a unit of content goes on
//! the current page, moves to the next one, or starts here and continues
//! there.

/// Decide what to do when a unit of content may not fit on the current page.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Place the entire unit on the current page (it fits).
    Place,
    /// Move the entire unit to the next page (unbreakable, or too little fits).
    MoveToNextPage,
    /// Split the unit: place some lines here, continue on the next page.
    Split {
        /// How many lines fit on the current page.
        items_on_current_page: usize,
    },
}

/// Given the remaining space on a page and the heights of the lines that
/// make up a unit, decide how to break.
///
/// `min_orphan_lines` is the least number of lines worth leaving at the
/// bottom of a page; fewer than that and the whole unit moves instead.
pub fn decide_break(
    remaining_height: f64,
    child_heights: &[f64],
    is_breakable: bool,
    min_orphan_lines: usize,
) -> BreakDecision {
    let total: f64 = child_heights.iter().sum();

    // Easy case: everything fits
    if total <= remaining_height + 1e-6 {
        return BreakDecision::Place;
    }

    // Unbreakable: force to next page
    if !is_breakable {
        return BreakDecision::MoveToNextPage;
    }

    // Find how many children fit
    let mut running = 0.0;
    let mut fit_count = 0;
    for &h in child_heights {
        if running + h > remaining_height + 1e-6 {
            break;
        }
        running += h;
        fit_count += 1;
    }

    if fit_count == 0 || fit_count < min_orphan_lines {
        return BreakDecision::MoveToNextPage;
    }

    BreakDecision::Split {
        items_on_current_page: fit_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits() {
        let decision = decide_break(100.0, &[20.0, 30.0, 40.0], true, 1);
        assert_eq!(decision, BreakDecision::Place);
    }

    #[test]
    fn unbreakable_moves() {
        let decision = decide_break(50.0, &[20.0, 30.0, 40.0], false, 1);
        assert_eq!(decision, BreakDecision::MoveToNextPage);
    }

    #[test]
    fn split_at_right_point() {
        let decision = decide_break(55.0, &[20.0, 30.0, 40.0], true, 1);
        assert_eq!(
            decision,
            BreakDecision::Split {
                items_on_current_page: 2,
            }
        );
    }

    #[test]
    fn nothing_fits_moves() {
        let decision = decide_break(10.0, &[13.0, 13.0], true, 1);
        assert_eq!(decision, BreakDecision::MoveToNextPage);
    }

    #[test]
    fn orphan_control() {
        // Only 1 line would fit, but min_orphan is 2: move everything
        let decision = decide_break(25.0, &[20.0, 30.0, 40.0], true, 2);
        assert_eq!(decision, BreakDecision::MoveToNextPage);
    }
}
