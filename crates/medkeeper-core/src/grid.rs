//! Keyboard navigation model for the editable tables.
//!
//! A grid is rows of cells, each either focusable (an input) or not (plain
//! text, action buttons). Horizontal keys walk focusable cells in reading
//! order across row boundaries; vertical keys keep the column.

use std::str::FromStr;

/// Navigation keys handled by the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Tab,
}

impl FromStr for NavKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ArrowLeft" | "left" => Ok(NavKey::Left),
            "ArrowRight" | "right" => Ok(NavKey::Right),
            "ArrowUp" | "up" => Ok(NavKey::Up),
            "ArrowDown" | "down" => Ok(NavKey::Down),
            "Enter" | "enter" => Ok(NavKey::Enter),
            "Tab" | "tab" => Ok(NavKey::Tab),
            other => Err(format!("not a navigation key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Focusability map of a rendered table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<bool>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<bool>>) -> Self {
        Self { rows }
    }

    /// `rows` rows sharing one column layout.
    pub fn uniform(rows: usize, focusable_columns: &[bool]) -> Self {
        Self::new(vec![focusable_columns.to_vec(); rows])
    }

    pub fn is_focusable(&self, pos: CellPosition) -> bool {
        self.rows
            .get(pos.row)
            .and_then(|row| row.get(pos.col))
            .copied()
            .unwrap_or(false)
    }

    /// Where focus goes from `pos` on `key`. Focus stays put at the ends
    /// of the table, when the target cell is not focusable, and when `pos`
    /// itself is not focusable.
    pub fn next(&self, pos: CellPosition, key: NavKey) -> CellPosition {
        if !self.is_focusable(pos) {
            return pos;
        }
        match key {
            NavKey::Left => self.previous_in_order(pos).unwrap_or(pos),
            NavKey::Right | NavKey::Enter | NavKey::Tab => self.next_in_order(pos).unwrap_or(pos),
            NavKey::Up => pos
                .row
                .checked_sub(1)
                .map(|row| CellPosition::new(row, pos.col))
                .filter(|p| self.is_focusable(*p))
                .unwrap_or(pos),
            NavKey::Down => Some(CellPosition::new(pos.row + 1, pos.col))
                .filter(|p| self.is_focusable(*p))
                .unwrap_or(pos),
        }
    }

    fn focusable(&self) -> impl Iterator<Item = CellPosition> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, focusable)| **focusable)
                .map(move |(c, _)| CellPosition::new(r, c))
        })
    }

    fn next_in_order(&self, pos: CellPosition) -> Option<CellPosition> {
        self.focusable().skip_while(|p| *p != pos).nth(1)
    }

    fn previous_in_order(&self, pos: CellPosition) -> Option<CellPosition> {
        self.focusable().take_while(|p| *p != pos).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // code, name, dose, [remove button]
    fn grid() -> Grid {
        Grid::uniform(3, &[true, true, true, false])
    }

    #[test]
    fn test_right_wraps_to_next_row() {
        let g = grid();
        assert_eq!(g.next(CellPosition::new(0, 1), NavKey::Right), CellPosition::new(0, 2));
        assert_eq!(g.next(CellPosition::new(0, 2), NavKey::Tab), CellPosition::new(1, 0));
        assert_eq!(g.next(CellPosition::new(1, 0), NavKey::Left), CellPosition::new(0, 2));
    }

    #[test]
    fn test_ends_are_clamped() {
        let g = grid();
        assert_eq!(g.next(CellPosition::new(0, 0), NavKey::Left), CellPosition::new(0, 0));
        assert_eq!(g.next(CellPosition::new(2, 2), NavKey::Enter), CellPosition::new(2, 2));
        assert_eq!(g.next(CellPosition::new(0, 1), NavKey::Up), CellPosition::new(0, 1));
        assert_eq!(g.next(CellPosition::new(2, 1), NavKey::Down), CellPosition::new(2, 1));
    }

    #[test]
    fn test_vertical_keeps_column() {
        let g = grid();
        assert_eq!(g.next(CellPosition::new(0, 1), NavKey::Down), CellPosition::new(1, 1));
        assert_eq!(g.next(CellPosition::new(2, 2), NavKey::Up), CellPosition::new(1, 2));
    }

    #[test]
    fn test_vertical_into_non_focusable_cell_stays() {
        let g = Grid::new(vec![vec![true, true], vec![true, false]]);
        assert_eq!(g.next(CellPosition::new(0, 1), NavKey::Down), CellPosition::new(0, 1));
    }

    #[test]
    fn test_parse_browser_key_names() {
        assert_eq!("ArrowDown".parse::<NavKey>(), Ok(NavKey::Down));
        assert!("Escape".parse::<NavKey>().is_err());
    }
}
