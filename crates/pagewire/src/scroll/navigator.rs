//! Page index state machine, free of any document effects

use serde::{Deserialize, Serialize};

/// Axis the pages are laid out on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
}

/// Why a page is shown or hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageDirection {
    Initial,
    Up,
    Down,
    Left,
    Right,
}

impl PageDirection {
    /// Up and Left move to an earlier page
    pub fn is_backward(self) -> bool {
        matches!(self, PageDirection::Up | PageDirection::Left)
    }

    pub fn is_forward(self) -> bool {
        matches!(self, PageDirection::Down | PageDirection::Right)
    }
}

/// What happens when stepping past the first or last page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Stay put
    #[default]
    Clamp,
    /// Continue at the other end
    Wrap,
}

/// A page change decided by the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    pub direction: PageDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    len: usize,
    axis: Axis,
    policy: EdgePolicy,
}

impl Navigator {
    pub fn new(len: usize, axis: Axis, policy: EdgePolicy) -> Self {
        Self {
            current: 0,
            len,
            axis,
            policy,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Direction of `next` on this axis
    pub fn forward(&self) -> PageDirection {
        match self.axis {
            Axis::X => PageDirection::Right,
            Axis::Y => PageDirection::Down,
        }
    }

    /// Direction of `previous` on this axis
    pub fn backward(&self) -> PageDirection {
        match self.axis {
            Axis::X => PageDirection::Left,
            Axis::Y => PageDirection::Up,
        }
    }

    /// Places the navigator without a transition; out-of-range indices are ignored
    pub fn reset(&mut self, index: usize) {
        if index < self.len {
            self.current = index;
        }
    }

    pub fn next(&mut self) -> Option<Transition> {
        self.step(self.forward())
    }

    pub fn previous(&mut self) -> Option<Transition> {
        self.step(self.backward())
    }

    /// Moves one page in `direction`, honoring the edge policy
    ///
    /// Returns `None` when the index does not change.
    pub fn step(&mut self, direction: PageDirection) -> Option<Transition> {
        if self.len == 0 {
            return None;
        }
        let last = self.len - 1;
        let to = if direction.is_forward() {
            match (self.current == last, self.policy) {
                (false, _) => self.current + 1,
                (true, EdgePolicy::Wrap) => 0,
                (true, EdgePolicy::Clamp) => last,
            }
        } else if direction.is_backward() {
            match (self.current == 0, self.policy) {
                (false, _) => self.current - 1,
                (true, EdgePolicy::Wrap) => last,
                (true, EdgePolicy::Clamp) => 0,
            }
        } else {
            0
        };
        self.move_to(to, direction)
    }

    /// Jumps to `target`, deriving the direction from the index order
    pub fn jump(&mut self, target: usize) -> Option<Transition> {
        if target >= self.len || target == self.current {
            return None;
        }
        let direction = if target > self.current {
            self.forward()
        } else {
            self.backward()
        };
        self.move_to(target, direction)
    }

    fn move_to(&mut self, to: usize, direction: PageDirection) -> Option<Transition> {
        if to == self.current {
            return None;
        }
        let from = self.current;
        self.current = to;
        Some(Transition {
            from,
            to,
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_clamp_stops_at_edges() {
        let mut nav = Navigator::new(3, Axis::Y, EdgePolicy::Clamp);
        assert_eq!(nav.previous(), None);
        assert_eq!(nav.current(), 0);

        nav.reset(2);
        assert_eq!(nav.next(), None);
        assert_eq!(nav.current(), 2);
    }

    #[test]
    fn test_wrap_continues_at_other_end() {
        let mut nav = Navigator::new(3, Axis::Y, EdgePolicy::Wrap);
        assert_eq!(
            nav.previous(),
            Some(Transition {
                from: 0,
                to: 2,
                direction: PageDirection::Up
            })
        );
        assert_eq!(
            nav.next(),
            Some(Transition {
                from: 2,
                to: 0,
                direction: PageDirection::Down
            })
        );
    }

    #[rstest]
    #[case(Axis::X, PageDirection::Right, PageDirection::Left)]
    #[case(Axis::Y, PageDirection::Down, PageDirection::Up)]
    fn test_axis_directions(
        #[case] axis: Axis,
        #[case] forward: PageDirection,
        #[case] backward: PageDirection,
    ) {
        let nav = Navigator::new(2, axis, EdgePolicy::Clamp);
        assert_eq!(nav.forward(), forward);
        assert_eq!(nav.backward(), backward);
    }

    #[test]
    fn test_jump_direction_follows_index_order() {
        let mut nav = Navigator::new(4, Axis::X, EdgePolicy::Clamp);
        assert_eq!(nav.jump(3).map(|t| t.direction), Some(PageDirection::Right));
        assert_eq!(nav.jump(1).map(|t| t.direction), Some(PageDirection::Left));
        assert_eq!(nav.jump(1), None);
        assert_eq!(nav.jump(9), None);
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn test_empty_navigator_never_moves() {
        let mut nav = Navigator::new(0, Axis::Y, EdgePolicy::Wrap);
        assert!(nav.is_empty());
        assert_eq!(nav.next(), None);
        assert_eq!(nav.previous(), None);
        assert_eq!(nav.jump(0), None);
    }

    #[test]
    fn test_single_page_wrap_is_a_noop() {
        let mut nav = Navigator::new(1, Axis::Y, EdgePolicy::Wrap);
        assert_eq!(nav.next(), None);
        assert_eq!(nav.previous(), None);
    }
}
