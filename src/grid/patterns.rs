//! Named seed patterns for the Game of Life grid.
//!
//! Offsets are `(x, y)` from the pattern's top-left corner.

pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

impl Pattern {
    /// Look a pattern up by name, ignoring case.
    pub fn find(name: &str) -> Option<&'static Pattern> {
        PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Bounding-box width.
    pub fn width(&self) -> usize {
        self.cells.iter().map(|&(x, _)| x + 1).max().unwrap_or(0)
    }

    /// Bounding-box height.
    pub fn height(&self) -> usize {
        self.cells.iter().map(|&(_, y)| y + 1).max().unwrap_or(0)
    }

    /// The pattern as a dense 0/1 region, ready for `update_region`.
    pub fn to_region(&self) -> Vec<Vec<u8>> {
        let mut region = vec![vec![0u8; self.width()]; self.height()];
        for &(x, y) in self.cells {
            region[y][x] = 1;
        }
        region
    }
}

pub const GLIDER: Pattern = Pattern {
    name: "glider",
    // .#.
    // ..#
    // ###
    cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
};

pub const BLOCK: Pattern = Pattern {
    name: "block",
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
};

pub const BLINKER: Pattern = Pattern {
    name: "blinker",
    cells: &[(0, 0), (1, 0), (2, 0)],
};

pub const TOAD: Pattern = Pattern {
    name: "toad",
    cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
};

pub const BEACON: Pattern = Pattern {
    name: "beacon",
    cells: &[
        (0, 0),
        (1, 0),
        (0, 1),
        (1, 1),
        (2, 2),
        (3, 2),
        (2, 3),
        (3, 3),
    ],
};

pub const R_PENTOMINO: Pattern = Pattern {
    name: "r-pentomino",
    cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
};

pub const PATTERNS: &[Pattern] = &[GLIDER, BLOCK, BLINKER, TOAD, BEACON, R_PENTOMINO];
