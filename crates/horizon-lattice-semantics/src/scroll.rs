//! Scrollability queries used for gesture routing.

use crate::geometry::Point;
use crate::occlusion::AdjustedBoundsNode;
use crate::property::{Axis, ScrollAxisRange};

/// Whether the first matching candidate can scroll further along `axis`.
///
/// A candidate matches when it has a scroll range on `axis` and, if
/// `position` is given, its adjusted bounds contain it. With no position the
/// hit test is skipped entirely. `direction` is the sign of the requested
/// movement; zero asks whether the node can move at all.
pub fn can_scroll(
    candidates: &[AdjustedBoundsNode<'_>],
    axis: Axis,
    direction: i32,
    position: Option<Point>,
) -> bool {
    let hit = candidates.iter().find_map(|candidate| {
        if let Some(position) = position
            && !(position.is_finite() && candidate.adjusted_bounds().contains(position))
        {
            return None;
        }
        candidate.node().properties().scroll_range(axis)
    });

    hit.is_some_and(|range| range_can_scroll(&range, direction))
}

/// Boundary check on a single scroll range. The minimum is always zero.
pub fn range_can_scroll(range: &ScrollAxisRange, direction: i32) -> bool {
    let value = range.value;
    let max = range.max_value;
    let direction = direction.signum();
    let effective = if range.reverse_scrolling { -direction } else { direction };

    match effective {
        1 => value < max,
        -1 => value > 0.0,
        _ => value > 0.0 || value < max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::node::{SemanticsNode, SemanticsTree};
    use crate::occlusion::visible_nodes;

    #[test]
    fn test_boundaries() {
        let at_max = ScrollAxisRange::new(100.0, 100.0);
        assert!(!range_can_scroll(&at_max, 1));
        assert!(range_can_scroll(&at_max, -1));
        assert!(range_can_scroll(&at_max, 0));

        let reversed = at_max.reversed();
        assert!(range_can_scroll(&reversed, 1));
        assert!(!range_can_scroll(&reversed, -1));

        let at_min = ScrollAxisRange::new(0.0, 100.0);
        assert!(!range_can_scroll(&at_min, -1));
        assert!(range_can_scroll(&at_min, 5));

        let fixed = ScrollAxisRange::new(0.0, 0.0);
        assert!(!range_can_scroll(&fixed, 0));
    }

    fn scroller_tree() -> SemanticsTree {
        let (mut tree, root) = SemanticsTree::with_root(
            SemanticsNode::new(1).with_bounds(Rect::new(0.0, 0.0, 200.0, 200.0)),
        );
        tree.push_child(
            root,
            SemanticsNode::new(2)
                .with_bounds(Rect::new(0.0, 0.0, 100.0, 200.0))
                .with_scroll_range(Axis::Vertical, ScrollAxisRange::new(0.0, 50.0)),
        )
        .unwrap();
        tree.push_child(
            root,
            SemanticsNode::new(3)
                .with_bounds(Rect::new(100.0, 0.0, 100.0, 200.0))
                .with_scroll_range(Axis::Vertical, ScrollAxisRange::new(50.0, 50.0)),
        )
        .unwrap();
        tree
    }

    #[test]
    fn test_hit_test_selects_candidate() {
        let tree = scroller_tree();
        let visible = visible_nodes(&tree);
        let candidates = visible.as_slice();

        assert!(can_scroll(candidates, Axis::Vertical, 1, Some(Point::new(10.0, 10.0))));
        assert!(!can_scroll(candidates, Axis::Vertical, 1, Some(Point::new(150.0, 10.0))));
        assert!(!can_scroll(candidates, Axis::Horizontal, 1, Some(Point::new(10.0, 10.0))));
        assert!(!can_scroll(candidates, Axis::Vertical, 1, Some(Point::new(500.0, 10.0))));
    }

    #[test]
    fn test_unspecified_position_takes_first_with_axis() {
        let tree = scroller_tree();
        let visible = visible_nodes(&tree);
        // Visit order is front to back, so node 3 (at max) comes first.
        assert!(!can_scroll(visible.as_slice(), Axis::Vertical, 1, None));
        assert!(can_scroll(visible.as_slice(), Axis::Vertical, -1, None));
    }

    #[test]
    fn test_non_finite_position_never_hits() {
        let tree = scroller_tree();
        let visible = visible_nodes(&tree);
        let nan = Some(Point::new(f32::NAN, 0.0));
        assert!(!can_scroll(visible.as_slice(), Axis::Vertical, -1, nan));
    }
}
