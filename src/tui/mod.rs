//! Terminal UI adapter: rendering, board cursor, terminal lifecycle

pub mod terminal;
pub mod ui;

pub use terminal::Tui;
pub use ui::render;

/// Keyboard cursor over the board grid. Movement clamps at the edges
/// rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCursor {
    index: usize,
    tile_count: usize,
    columns: usize,
}

impl TileCursor {
    /// Cursor at the first tile of a `tile_count` board.
    pub fn new(tile_count: usize) -> Self {
        TileCursor {
            index: 0,
            tile_count,
            columns: ui::columns_for(tile_count),
        }
    }

    /// The tile the cursor is on.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Jump to a tile (from a mouse click). Out-of-range ids are ignored.
    pub fn set(&mut self, index: usize) {
        if index < self.tile_count {
            self.index = index;
        }
    }

    pub fn move_left(&mut self) {
        if self.index % self.columns > 0 {
            self.index -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.index % self.columns + 1 < self.columns && self.index + 1 < self.tile_count {
            self.index += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.index >= self.columns {
            self.index -= self.columns;
        }
    }

    pub fn move_down(&mut self) {
        if self.index + self.columns < self.tile_count {
            self.index += self.columns;
        }
    }
}
