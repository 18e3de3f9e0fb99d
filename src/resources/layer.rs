//! Single depth plane of a room's tile grid.

/// Row-major grid of tile ids.
///
/// Layers are static level data: built once by the loader and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

/// Why a set of rows could not form a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerShapeError {
    /// The grid has no rows or no columns.
    Empty,
    /// Row `row` has a different length than row 0.
    Ragged { row: usize },
}

impl Layer {
    /// Build a layer from rows of tile ids. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, LayerShapeError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(LayerShapeError::Empty);
        }
        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(LayerShapeError::Ragged { row });
            }
            cells.extend(values);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// A layer of the given size where every cell is empty.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    /// Tile id at a cell.
    ///
    /// # Panics
    /// If the cell is outside the grid; callers clamp first.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        assert!(
            self.contains(row, col),
            "cell ({row}, {col}) outside {}x{} layer",
            self.height,
            self.width
        );
        self.cells[row * self.width + col]
    }

    /// Iterate `(row, col, id)` over every cell.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, id)| (i / self.width, i % self.width, *id))
    }
}
