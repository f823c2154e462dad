use std::fmt;

use crate::Coord;

/// A dense grid of cells, `width` by `height`, whose top-left cell sits at universe coordinate
/// `(x, y)`. [`NodeStore::expand`](crate::NodeStore::expand) writes live cells into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// The cell buffer, row-major
    cells: Vec<bool>,

    /// `x` offset from origin
    x: Coord,

    /// `y` offset from origin
    y: Coord,

    width: usize,
    height: usize,
}

impl Viewport {
    pub fn new(x: Coord, y: Coord, width: usize, height: usize) -> Self {
        Self {
            cells: vec![false; width * height],
            x,
            y,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Universe coordinate of the top-left cell
    pub fn origin(&self) -> (Coord, Coord) {
        (self.x, self.y)
    }

    /// Move the window by `(dx, dy)` cells. The buffer is kept as-is; callers are expected to
    /// expand again.
    pub fn move_by(&mut self, dx: Coord, dy: Coord) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    /// Reset the cell buffer
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Whether universe cell `(x, y)` is inside the window.
    pub fn contains(&self, x: Coord, y: Coord) -> bool {
        self.xy_from(x, y).is_some()
    }

    /// Whether the square of side `size` with top-left `(x, y)` overlaps the window.
    pub fn intersects(&self, x: Coord, y: Coord, size: Coord) -> bool {
        let (right, bottom) = (
            self.x.saturating_add(self.width as Coord),
            self.y.saturating_add(self.height as Coord),
        );

        x < right
            && y < bottom
            && x.saturating_add(size) > self.x
            && y.saturating_add(size) > self.y
    }

    /// State of universe cell `(x, y)`. Cells outside the window read as dead.
    pub fn get(&self, x: Coord, y: Coord) -> bool {
        self.xy_from(x, y).is_some_and(|i| self.cells[i])
    }

    /// Set universe cell `(x, y)`. Cells outside the window are ignored.
    pub fn set(&mut self, x: Coord, y: Coord, alive: bool) {
        if let Some(i) = self.xy_from(x, y) {
            self.cells[i] = alive;
        }
    }

    /// Universe coordinates of every live cell, row by row
    pub fn live_cells(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(|(n, _)| self.xy_to(n))
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    fn xy_to(&self, n: usize) -> (Coord, Coord) {
        (
            self.x + (n % self.width) as Coord,
            self.y + (n / self.width) as Coord,
        )
    }

    fn xy_from(&self, x: Coord, y: Coord) -> Option<usize> {
        let dx = usize::try_from(x.checked_sub(self.x)?).ok()?;
        let dy = usize::try_from(y.checked_sub(self.y)?).ok()?;

        (dx < self.width && dy < self.height).then_some(dy * self.width + dx)
    }
}

/// One line per row, `*` for live cells and `.` for dead ones.
impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for &alive in row {
                f.write_str(if alive { "*" } else { "." })?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}
