/*
Step Pattern
============

An 8-row by 16-step on/off grid. Each row is one drum voice (see
`RowMap`), each column a sixteenth note of a single bar:

        step  0 1 2 3 4 5 6 7 8 9 . . . 15
  row 0 kick  x . . . x . . . x . . . . .
  row 1 snare . . . . x . . . . . . . . .
  ...

The grid only stores which cells are lit. Timing lives in `StepClock`.
*/

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const ROWS: usize = 8;
pub const STEPS: usize = 16;

/// Chance that `randomize` lights any given cell.
pub const RANDOM_DENSITY: f64 = 0.2;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepPattern {
    cells: [[bool; STEPS]; ROWS],
}

impl StepPattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one cell. Out-of-range coordinates are ignored.
    pub fn toggle(&mut self, row: usize, step: usize) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(step)) {
            Some(cell) => {
                *cell = !*cell;
                *cell
            }
            None => false,
        }
    }

    pub fn set(&mut self, row: usize, step: usize, on: bool) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(step)) {
            *cell = on;
        }
    }

    pub fn is_on(&self, row: usize, step: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(step))
            .copied()
            .unwrap_or(false)
    }

    /// Rows lit at `step`.
    pub fn rows_at(&self, step: usize) -> impl Iterator<Item = usize> + '_ {
        (0..ROWS).filter(move |&row| self.is_on(row, step))
    }

    pub fn clear(&mut self) {
        self.cells = [[false; STEPS]; ROWS];
    }

    /// Replace every cell with a fresh draw at [`RANDOM_DENSITY`].
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                *cell = rng.gen_bool(RANDOM_DENSITY);
            }
        }
    }

    pub fn active_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|on| **on).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_toggle_and_query() {
        let mut pattern = StepPattern::new();
        assert!(pattern.toggle(0, 4));
        assert!(pattern.is_on(0, 4));
        assert!(!pattern.toggle(0, 4));
        assert!(!pattern.is_on(0, 4));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut pattern = StepPattern::new();
        assert!(!pattern.toggle(ROWS, 0));
        assert!(!pattern.toggle(0, STEPS));
        pattern.set(9, 9, true);
        assert_eq!(pattern.active_cells(), 0);
    }

    #[test]
    fn test_rows_at_step() {
        let mut pattern = StepPattern::new();
        pattern.set(0, 0, true);
        pattern.set(2, 0, true);
        pattern.set(1, 1, true);
        assert_eq!(pattern.rows_at(0).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_randomize_density() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pattern = StepPattern::new();
        pattern.randomize(&mut rng);
        let lit = pattern.active_cells();
        // 128 cells at p = 0.2
        assert!((8..=48).contains(&lit), "{}", lit);
        pattern.clear();
        assert_eq!(pattern.active_cells(), 0);
    }
}
