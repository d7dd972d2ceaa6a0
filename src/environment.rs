//! Resource field: the grid of renewable grass agents graze on.

use crate::config::{GrowthPolicy, WorldConfig};
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A point in the field, in (row, col) order.
///
/// Positions are real-valued so movement vectors can be accumulated, but
/// every accepted move snaps them back onto a cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub row: f32,
    pub col: f32,
}

impl Position {
    pub fn new(row: f32, col: f32) -> Self {
        Self { row, col }
    }

    /// Round both coordinates to the nearest cell
    pub fn rounded(self) -> Self {
        Self {
            row: self.row.round(),
            col: self.col.round(),
        }
    }

    /// Squared euclidean distance to `other`
    #[inline]
    pub fn distance_sqr_to(self, other: Position) -> f32 {
        let dr = other.row - self.row;
        let dc = other.col - self.col;
        dr * dr + dc * dc
    }

    /// Euclidean distance to `other`
    #[inline]
    pub fn distance_to(self, other: Position) -> f32 {
        self.distance_sqr_to(other).sqrt()
    }
}

/// The grid of food values
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Environment {
    grass: Array2<f32>,
    max_grass: f32,
    grow_rate: usize,
    growth: GrowthPolicy,
}

impl Environment {
    /// Create a field with every cell holding the configured initial food
    pub fn new(world: &WorldConfig) -> Self {
        Self {
            grass: Array2::from_elem((world.rows, world.cols), world.initial_grass),
            max_grass: world.max_grass,
            grow_rate: world.grow_rate,
            growth: world.growth.clone(),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.grass.nrows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.grass.ncols()
    }

    /// Per-cell food cap
    #[inline]
    pub fn max_grass(&self) -> f32 {
        self.max_grass
    }

    /// Resolve a position to a cell index, truncating toward zero.
    /// The caller must already have clamped the position into bounds.
    fn cell_index(&self, position: Position) -> (usize, usize) {
        debug_assert!(
            self.is_in_bounds(position),
            "unclamped field access at {:?}",
            position
        );
        (position.row as usize, position.col as usize)
    }

    /// Food at the cell nearest `position`
    pub fn food_at(&self, position: Position) -> f32 {
        let (r, c) = self.cell_index(position);
        self.grass[[r, c]]
    }

    /// Remove `amount` food at `position`. Does not clamp at zero.
    pub fn consume(&mut self, position: Position, amount: f32) {
        let (r, c) = self.cell_index(position);
        self.grass[[r, c]] -= amount;
    }

    /// Set the food at `position`, clamped into `[0, max_grass]`.
    /// Used for scenario setup; the tick loop itself only consumes and grows.
    pub fn set_food(&mut self, position: Position, amount: f32) {
        let (r, c) = self.cell_index(position);
        self.grass[[r, c]] = amount.clamp(0.0, self.max_grass);
    }

    /// Round `position` to the nearest cell and clamp it into the field.
    /// Idempotent.
    pub fn clamp_position(&self, position: Position) -> Position {
        let p = position.rounded();
        Position::new(
            p.row.clamp(0.0, (self.rows() - 1) as f32),
            p.col.clamp(0.0, (self.cols() - 1) as f32),
        )
    }

    /// Whether `position` lands inside the field once rounded to a cell
    pub fn is_in_bounds(&self, position: Position) -> bool {
        let p = position.rounded();
        p.row >= 0.0
            && p.col >= 0.0
            && p.row <= (self.rows() - 1) as f32
            && p.col <= (self.cols() - 1) as f32
    }

    /// Uniform random cell
    pub fn random_location(&self, rng: &mut impl Rng) -> Position {
        Position::new(
            rng.gen_range(0..self.rows()) as f32,
            rng.gen_range(0..self.cols()) as f32,
        )
    }

    fn growth_target(&self, rng: &mut impl Rng) -> (usize, usize) {
        match self.growth {
            GrowthPolicy::Uniform => (rng.gen_range(0..self.rows()), rng.gen_range(0..self.cols())),
            GrowthPolicy::Region {
                top,
                left,
                bottom,
                right,
            } => (rng.gen_range(top..=bottom), rng.gen_range(left..=right)),
        }
    }

    /// Add one food unit to each of `grow_rate` randomly drawn cells.
    /// Draws that hit a saturated cell are skipped, not retried, so realized
    /// growth per tick is at most `grow_rate`.
    pub fn grow(&mut self, rng: &mut impl Rng) {
        for _ in 0..self.grow_rate {
            let (r, c) = self.growth_target(rng);
            if self.grass[[r, c]] < self.max_grass {
                self.grass[[r, c]] += 1.0;
            }
        }
    }

    /// Find the cell with the most food within a disk of `vision` cells
    /// around `position`. A small random jitter is added to each candidate's
    /// food value before taking the arg-max, so equally grassy cells are
    /// picked stochastically. Cells outside the disk or the field are never
    /// candidates. Returns `None` when no eligible cell holds any food.
    pub fn nearest_food_peak(
        &self,
        position: Position,
        vision: f32,
        rng: &mut impl Rng,
    ) -> Option<Position> {
        let center = self.clamp_position(position);
        let cr = center.row as i64;
        let cc = center.col as i64;
        let reach = vision.floor() as i64;

        let mut best: Option<(Position, f32)> = None;
        let mut any_food = false;

        for dr in -reach..=reach {
            for dc in -reach..=reach {
                if ((dr * dr + dc * dc) as f32) > vision * vision {
                    continue; // outside the visibility disk
                }
                let (r, c) = (cr + dr, cc + dc);
                if r < 0 || c < 0 || r >= self.rows() as i64 || c >= self.cols() as i64 {
                    continue;
                }
                let food = self.grass[[r as usize, c as usize]];
                if food > 0.0 {
                    any_food = true;
                }
                let score = food + 0.01 * rng.gen::<f32>();
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((Position::new(r as f32, c as f32), score));
                }
            }
        }

        if any_food {
            best.map(|(p, _)| p)
        } else {
            None
        }
    }

    /// Total food across the whole field
    pub fn total_food(&self) -> f32 {
        self.grass.sum()
    }

    /// Read-only view of the grid, for snapshotting
    pub fn grass(&self) -> &Array2<f32> {
        &self.grass
    }
}
