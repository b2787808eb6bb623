//! Tree layout for the hop graph.
//!
//! Maps "number of nodes so far" to a full set of positions. The root sits at
//! the horizontal center of the surface; every following node is packed into
//! rows of `nodes_per_row`, each row centered as a group below the previous
//! one. The whole set is recomputed from scratch for every call.

/// Width used before the drawing surface has reported its real size.
pub const FALLBACK_SURFACE_WIDTH: f64 = 650.0;
pub const DEFAULT_TOP_MARGIN: f64 = 30.0;
pub const DEFAULT_ROW_HEIGHT: f64 = 50.0;
pub const DEFAULT_SIBLING_SPACING: f64 = 180.0;
pub const DEFAULT_NODES_PER_ROW: usize = 2;

/// A point on the drawing surface, in surface units.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Row and slot an index lands in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Placement {
    pub row: usize,
    pub slot: usize,
}

/// Resolve the usable width, falling back to [`FALLBACK_SURFACE_WIDTH`] when
/// the surface has not been measured yet or is narrower than the minimum.
pub fn resolve_surface_width(measured: Option<f64>) -> f64 {
    resolve_surface_width_with(measured, FALLBACK_SURFACE_WIDTH)
}

pub fn resolve_surface_width_with(measured: Option<f64>, minimum: f64) -> f64 {
    match measured {
        Some(width) if width.is_finite() && width > 0.0 => width.max(minimum),
        _ => minimum,
    }
}

/// Compute positions with the default spacing constants.
pub fn compute_positions(n: usize, surface_width: f64) -> Vec<Position> {
    TreeLayout::default().compute_positions(n, surface_width)
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct TreeLayout {
    pub top_margin: f64,
    pub row_height: f64,
    pub sibling_spacing: f64,
    pub nodes_per_row: usize,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            top_margin: DEFAULT_TOP_MARGIN,
            row_height: DEFAULT_ROW_HEIGHT,
            sibling_spacing: DEFAULT_SIBLING_SPACING,
            nodes_per_row: DEFAULT_NODES_PER_ROW,
        }
    }
}

impl TreeLayout {
    fn capacity(&self) -> usize {
        self.nodes_per_row.max(1)
    }

    /// Row 0 holds only the root; row `r >= 1` holds indices
    /// `1 + (r-1)*cap ..= r*cap`.
    pub fn placement(&self, index: usize) -> Placement {
        if index == 0 {
            return Placement { row: 0, slot: 0 };
        }
        let cap = self.capacity();
        let preceding = index - 1;
        Placement {
            row: 1 + preceding / cap,
            slot: preceding % cap,
        }
    }

    /// Number of entries row `row` holds when `n` nodes exist.
    pub fn row_population(&self, row: usize, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        if row == 0 {
            return 1;
        }
        let cap = self.capacity();
        let before = (row - 1) * cap;
        let remaining = (n - 1).saturating_sub(before);
        remaining.min(cap)
    }

    /// Index `i` of the result is the position of step `i`. `n == 0` yields
    /// an empty vector.
    pub fn compute_positions(&self, n: usize, surface_width: f64) -> Vec<Position> {
        let center = surface_width / 2.0;
        (0..n)
            .map(|index| {
                let Placement { row, slot } = self.placement(index);
                if row == 0 {
                    return Position::new(center, self.top_margin);
                }
                let in_row = self.row_population(row, n);
                let span = in_row.saturating_sub(1) as f64 * self.sibling_spacing;
                let start = center - span / 2.0;
                Position::new(
                    start + slot as f64 * self.sibling_spacing,
                    self.top_margin + row as f64 * self.row_height,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 700.0;

    /// Row search as a linear scan, kept to check the closed form against.
    fn scanned_row(index: usize, per_row: usize) -> usize {
        let mut row = 1;
        let mut seen = 1;
        while seen <= index {
            if seen + per_row > index {
                break;
            }
            seen += per_row;
            row += 1;
        }
        row
    }

    #[test]
    fn empty_layout_has_no_positions() {
        assert!(compute_positions(0, WIDTH).is_empty());
    }

    #[test]
    fn single_node_is_centered_root() {
        let positions = compute_positions(1, WIDTH);
        assert_eq!(positions, vec![Position::new(350.0, DEFAULT_TOP_MARGIN)]);
    }

    #[test]
    fn root_stays_centered_for_any_count() {
        for n in 1..40 {
            for width in [1.0, 333.0, 650.0, 1280.5] {
                let positions = compute_positions(n, width);
                assert_eq!(positions.len(), n);
                assert_eq!(positions[0].x, width / 2.0);
                assert_eq!(positions[0].y, DEFAULT_TOP_MARGIN);
            }
        }
    }

    #[test]
    fn five_nodes_fill_two_symmetric_rows() {
        let layout = TreeLayout::default();
        let positions = layout.compute_positions(5, WIDTH);

        assert_eq!(layout.placement(1), Placement { row: 1, slot: 0 });
        assert_eq!(layout.placement(2), Placement { row: 1, slot: 1 });
        assert_eq!(layout.placement(3), Placement { row: 2, slot: 0 });
        assert_eq!(layout.placement(4), Placement { row: 2, slot: 1 });

        for (left, right) in [(1, 2), (3, 4)] {
            let (l, r) = (positions[left], positions[right]);
            assert_eq!(l.y, r.y);
            assert_eq!(r.x - l.x, DEFAULT_SIBLING_SPACING);
            assert_eq!((l.x + r.x) / 2.0, WIDTH / 2.0);
        }
        assert_eq!(positions[1].y, DEFAULT_TOP_MARGIN + DEFAULT_ROW_HEIGHT);
        assert_eq!(positions[3].y, DEFAULT_TOP_MARGIN + 2.0 * DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn lone_trailing_entry_is_centered() {
        let positions = compute_positions(4, WIDTH);
        assert_eq!(positions[3].x, WIDTH / 2.0);
        assert_eq!(positions[3].y, DEFAULT_TOP_MARGIN + 2.0 * DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn partial_row_reflows_once_filled() {
        let before = compute_positions(2, WIDTH);
        let after = compute_positions(3, WIDTH);
        assert_eq!(before[1].x, WIDTH / 2.0);
        assert_eq!(after[1].x, WIDTH / 2.0 - DEFAULT_SIBLING_SPACING / 2.0);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let layout = TreeLayout::default();
        for n in 0..25 {
            assert_eq!(
                layout.compute_positions(n, 812.0),
                layout.compute_positions(n, 812.0)
            );
        }
    }

    #[test]
    fn closed_form_row_matches_linear_scan() {
        for per_row in 1..=4 {
            let layout = TreeLayout {
                nodes_per_row: per_row,
                ..TreeLayout::default()
            };
            for index in 1..200 {
                assert_eq!(
                    layout.placement(index).row,
                    scanned_row(index, per_row),
                    "index {index} with {per_row} per row"
                );
            }
        }
    }

    #[test]
    fn row_population_counts_trailing_row() {
        let layout = TreeLayout::default();
        assert_eq!(layout.row_population(0, 1), 1);
        assert_eq!(layout.row_population(1, 1), 0);
        assert_eq!(layout.row_population(1, 2), 1);
        assert_eq!(layout.row_population(1, 7), 2);
        assert_eq!(layout.row_population(3, 7), 2);
        assert_eq!(layout.row_population(3, 6), 1);
        assert_eq!(layout.row_population(0, 0), 0);
    }

    #[test]
    fn surface_width_falls_back_until_measured() {
        assert_eq!(resolve_surface_width(None), FALLBACK_SURFACE_WIDTH);
        assert_eq!(resolve_surface_width(Some(0.0)), FALLBACK_SURFACE_WIDTH);
        assert_eq!(resolve_surface_width(Some(f64::NAN)), FALLBACK_SURFACE_WIDTH);
        assert_eq!(resolve_surface_width(Some(400.0)), FALLBACK_SURFACE_WIDTH);
        assert_eq!(resolve_surface_width(Some(1024.0)), 1024.0);
        assert_eq!(resolve_surface_width_with(Some(300.0), 200.0), 300.0);
    }
}
