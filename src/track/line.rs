//! Bresenham line walking over grid cells

use glam::IVec2;

/// Cells on the line from `start` to `end`, both ends included
#[derive(Debug, Clone)]
pub struct LineCells {
    current: IVec2,
    end: IVec2,
    dx: i64,
    dy: i64,
    step: IVec2,
    // Wide enough for any pair of `i32` endpoints
    err: i64,
    done: bool,
}

impl LineCells {
    /// Start walking from `start` toward `end`
    #[must_use]
    pub fn new(start: IVec2, end: IVec2) -> Self {
        let dx = (i64::from(end.x) - i64::from(start.x)).abs();
        let dy = (i64::from(end.y) - i64::from(start.y)).abs();
        let step = IVec2::new(
            if start.x < end.x { 1 } else { -1 },
            if start.y < end.y { 1 } else { -1 },
        );
        Self {
            current: start,
            end,
            dx,
            dy,
            step,
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for LineCells {
    type Item = IVec2;

    fn next(&mut self) -> Option<IVec2> {
        if self.done {
            return None;
        }
        let cell = self.current;
        if cell == self.end {
            self.done = true;
            return Some(cell);
        }

        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.current.x += self.step.x;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.current.y += self.step.y;
        }
        Some(cell)
    }
}

/// Check that every cell on the line passes `check`.
///
/// Stops at the first failing cell.
pub fn line_of_sight(start: IVec2, end: IVec2, check: impl FnMut(IVec2) -> bool) -> bool {
    LineCells::new(start, end).all(check)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let cells: Vec<IVec2> = LineCells::new(IVec2::new(0, 2), IVec2::new(3, 2)).collect();
        assert_eq!(
            cells,
            vec![
                IVec2::new(0, 2),
                IVec2::new(1, 2),
                IVec2::new(2, 2),
                IVec2::new(3, 2)
            ]
        );
    }

    #[test]
    fn test_diagonal_line_backwards() {
        let cells: Vec<IVec2> = LineCells::new(IVec2::new(2, 2), IVec2::new(0, 0)).collect();
        assert_eq!(cells, vec![IVec2::new(2, 2), IVec2::new(1, 1), IVec2::ZERO]);
    }

    #[test]
    fn test_single_cell() {
        let cells: Vec<IVec2> = LineCells::new(IVec2::ONE, IVec2::ONE).collect();
        assert_eq!(cells, vec![IVec2::ONE]);
    }

    #[test]
    fn test_steep_line_is_connected() {
        let cells: Vec<IVec2> = LineCells::new(IVec2::ZERO, IVec2::new(2, 7)).collect();
        assert_eq!(cells.first(), Some(&IVec2::ZERO));
        assert_eq!(cells.last(), Some(&IVec2::new(2, 7)));
        assert_eq!(cells.len(), 8);
        for pair in cells.windows(2) {
            let d = (pair[1] - pair[0]).abs();
            assert!(d.x <= 1 && d.y == 1);
        }
    }

    #[test]
    fn test_line_of_sight_blocked() {
        let wall = IVec2::new(2, 0);
        assert!(!line_of_sight(IVec2::ZERO, IVec2::new(4, 0), |c| c != wall));
        assert!(line_of_sight(IVec2::ZERO, IVec2::new(0, 4), |c| c != wall));
    }

    #[test]
    fn test_line_of_sight_stops_at_first_failure() {
        let mut visited = 0;
        let clear = line_of_sight(IVec2::ZERO, IVec2::new(9, 0), |c| {
            visited += 1;
            c.x < 3
        });
        assert!(!clear);
        assert_eq!(visited, 4);
    }

    #[test]
    fn test_long_line_does_not_overflow() {
        let far = IVec2::new(1 << 30, 0);
        assert!(!line_of_sight(IVec2::ZERO, far, |c| c.x < 5));

        let cells: Vec<IVec2> = LineCells::new(IVec2::new(i32::MIN, 0), IVec2::new(i32::MAX, 1))
            .take(3)
            .collect();
        assert_eq!(
            cells,
            vec![
                IVec2::new(i32::MIN, 0),
                IVec2::new(i32::MIN + 1, 0),
                IVec2::new(i32::MIN + 2, 0)
            ]
        );
    }
}
