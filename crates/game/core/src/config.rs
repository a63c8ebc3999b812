use crate::state::BoardDimensions;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Board width in squares.
    pub board_width: u32,
    /// Board height in squares.
    pub board_height: u32,
    /// Largest radius, size, ray length or cone length accepted by the shape
    /// parser. Keeps compiled offset lists small.
    pub max_shape_extent: u32,
}

impl GameConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BOARD_WIDTH: u32 = 8;
    pub const DEFAULT_BOARD_HEIGHT: u32 = 8;
    pub const DEFAULT_MAX_SHAPE_EXTENT: u32 = 64;

    pub fn new() -> Self {
        Self {
            board_width: Self::DEFAULT_BOARD_WIDTH,
            board_height: Self::DEFAULT_BOARD_HEIGHT,
            max_shape_extent: Self::DEFAULT_MAX_SHAPE_EXTENT,
        }
    }

    pub fn with_board_size(mut self, width: u32, height: u32) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    pub fn with_max_shape_extent(mut self, max_shape_extent: u32) -> Self {
        self.max_shape_extent = max_shape_extent;
        self
    }

    pub fn board_dimensions(&self) -> BoardDimensions {
        BoardDimensions::new(self.board_width, self.board_height)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
