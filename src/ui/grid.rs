use rand::Rng;

pub const ROWS: usize = 6;
pub const COLS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileColor {
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Cleared,
}

pub const PALETTE: [TileColor; 5] = [
    TileColor::Red,
    TileColor::Green,
    TileColor::Yellow,
    TileColor::Blue,
    TileColor::Purple,
];

impl TileColor {
    pub fn rgb(self) -> (f64, f64, f64) {
        match self {
            TileColor::Red => (0.988, 0.647, 0.647),
            TileColor::Green => (0.525, 0.937, 0.675),
            TileColor::Yellow => (0.992, 0.878, 0.278),
            TileColor::Blue => (0.576, 0.773, 0.992),
            TileColor::Purple => (0.847, 0.706, 0.996),
            TileColor::Cleared => (1.0, 1.0, 1.0),
        }
    }

    pub fn is_cleared(self) -> bool {
        self == TileColor::Cleared
    }
}

/// Decorative 6x6 board. Cells only ever move from a palette color to
/// `Cleared`; there is no adjacency matching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: [[TileColor; COLS]; ROWS],
}

impl Grid {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let mut cells = [[TileColor::Red; COLS]; ROWS];
        for row in cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = PALETTE[rng.random_range(0..PALETTE.len())];
            }
        }
        Grid { cells }
    }

    #[cfg(test)]
    pub fn get(&self, row: usize, col: usize) -> Option<TileColor> {
        self.cells.get(row).and_then(|cells| cells.get(col)).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileColor; COLS]> {
        self.cells.iter()
    }

    /// Clears one uniformly chosen cell and returns the new board with its position.
    pub fn mark_cell_cleared<R: Rng>(&self, rng: &mut R) -> (Grid, (usize, usize)) {
        let row = rng.random_range(0..ROWS);
        let col = rng.random_range(0..COLS);
        let mut next = self.clone();
        next.cells[row][col] = TileColor::Cleared;
        (next, (row, col))
    }

    pub fn cleared_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_cleared())
            .count()
    }
}
