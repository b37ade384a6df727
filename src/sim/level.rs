//! Level layouts and brick loading
//!
//! A layout is a grid of cell codes: 0 = empty, 1 = standard brick,
//! 2 = silver brick. Levels cycle through the table indefinitely.

use glam::Vec2;

use super::state::{Brick, BrickKind};
use crate::consts::*;
use crate::tuning::ConfigError;

/// One level: rows of cell codes
pub type Layout = Vec<Vec<u8>>;

const EMPTY: u8 = 0;
const STANDARD: u8 = 1;
const SILVER: u8 = 2;

/// Built-in level table
const BUILTIN_LEVELS: &[&[[u8; BRICK_COLS]]] = &[
    // Classic wall with a silver cap
    &[
        [2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // Pyramid
    &[
        [0, 0, 0, 0, 2, 2, 0, 0, 0, 0],
        [0, 0, 0, 1, 1, 1, 1, 0, 0, 0],
        [0, 0, 1, 1, 2, 2, 1, 1, 0, 0],
        [0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
        [1, 1, 2, 1, 1, 1, 1, 2, 1, 1],
    ],
    // Checkerboard
    &[
        [1, 0, 1, 0, 1, 0, 1, 0, 1, 0],
        [0, 2, 0, 2, 0, 2, 0, 2, 0, 2],
        [1, 0, 1, 0, 1, 0, 1, 0, 1, 0],
        [0, 1, 0, 1, 0, 1, 0, 1, 0, 1],
        [2, 0, 2, 0, 2, 0, 2, 0, 2, 0],
    ],
    // Fortress
    &[
        [2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
        [2, 1, 1, 1, 1, 1, 1, 1, 1, 2],
        [2, 1, 0, 0, 0, 0, 0, 0, 1, 2],
        [2, 1, 0, 1, 1, 1, 1, 0, 1, 2],
        [2, 1, 1, 1, 1, 1, 1, 1, 1, 2],
        [2, 2, 2, 0, 0, 0, 0, 2, 2, 2],
    ],
    // Stripes
    &[
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ],
];

/// Level table validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// No layouts at all (level index modulo zero)
    EmptyTable,
    /// A layout without a single brick could never be completed
    EmptyLayout { level: usize },
    /// Cell code other than 0, 1 or 2
    UnknownCell {
        level: usize,
        row: usize,
        col: usize,
        code: u8,
    },
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTable => write!(f, "level table is empty"),
            Self::EmptyLayout { level } => write!(f, "level {} has no bricks", level),
            Self::UnknownCell {
                level,
                row,
                col,
                code,
            } => write!(
                f,
                "level {} row {} col {}: unknown cell code {}",
                level, row, col, code
            ),
        }
    }
}

impl std::error::Error for LevelError {}

/// A validated, non-empty table of level layouts
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSet {
    layouts: Vec<Layout>,
}

impl LevelSet {
    /// Validate a layout table
    pub fn new(layouts: Vec<Layout>) -> Result<Self, LevelError> {
        if layouts.is_empty() {
            return Err(LevelError::EmptyTable);
        }
        for (level, layout) in layouts.iter().enumerate() {
            let mut bricks = 0;
            for (row, cells) in layout.iter().enumerate() {
                for (col, &code) in cells.iter().enumerate() {
                    match code {
                        EMPTY => {}
                        STANDARD | SILVER => bricks += 1,
                        _ => {
                            return Err(LevelError::UnknownCell {
                                level,
                                row,
                                col,
                                code,
                            });
                        }
                    }
                }
            }
            if bricks == 0 {
                return Err(LevelError::EmptyLayout { level });
            }
        }
        Ok(Self { layouts })
    }

    /// The built-in level table
    pub fn builtin() -> Self {
        let layouts = BUILTIN_LEVELS
            .iter()
            .map(|rows| rows.iter().map(|row| row.to_vec()).collect())
            .collect();
        Self { layouts }
    }

    /// Parse a layout table from JSON (`[[[0, 1, 2, ...], ...], ...]`)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let layouts: Vec<Layout> = serde_json::from_str(json)?;
        Ok(Self::new(layouts)?)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Layout used for a level index
    pub fn layout(&self, level: u32) -> &Layout {
        &self.layouts[level as usize % self.layouts.len()]
    }

    /// Build the bricks for a level index.
    ///
    /// Deterministic: the same index always yields the same ids, geometry
    /// and hit counts. The grid is centered on its widest row.
    pub fn bricks(&self, level: u32) -> Vec<Brick> {
        let layout = self.layout(level);
        let cols = layout.iter().map(Vec::len).max().unwrap_or(0);
        let offset_left = crate::brick_offset_left(cols);

        layout
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells.iter().enumerate().filter_map(move |(col, &code)| {
                    let kind = match code {
                        STANDARD => BrickKind::Standard,
                        SILVER => BrickKind::Silver,
                        _ => return None,
                    };
                    let pos = Vec2::new(
                        offset_left + col as f32 * (BRICK_WIDTH + BRICK_GAP),
                        BRICK_OFFSET_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP),
                    );
                    Some(Brick::new(brick_id(row, col), pos, kind))
                })
            })
            .collect()
    }
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Grid-derived brick id, unique within a level
#[inline]
fn brick_id(row: usize, col: usize) -> u32 {
    ((row as u32) << 16) | col as u32
}
