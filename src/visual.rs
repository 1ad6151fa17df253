//! Viewer side of the radar.
//!
//! The viewer itself lives in the host (a window, an overlay, a terminal).
//! This module turns a [`RadarFrame`] into a paint plan and drives any
//! [`RadarPainter`] with it, so every viewer shows the same thing.

use crate::grid::GridState;
use crate::location::*;
use crate::terrain::TileCategory;
use bitflags::*;
use fnv::FnvHashSet;
use itertools::Itertools;

/// A surface showing the radar. Implemented by the host.
pub trait RadarViewer {
    /// False once the viewer was closed; the controller loop stops then.
    fn is_visible(&self) -> bool;

    /// Ask the viewer to repaint from a fresh frame. Must not block on the
    /// radar locks.
    fn request_redraw(&self);
}

/// Receives the paint plan of one frame.
pub trait RadarPainter {
    fn grid_line(&mut self, axis: Axis, index: usize, bank_boundary: bool);

    fn tile(&mut self, paint: &TilePaint);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal line between rows.
    Row,
    /// Vertical line between columns.
    Column,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TileMarks: u8 {
        const AGENT = 1;
        const HIGHLIGHTED = 2;
    }
}

/// Text drawn over a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileLabel {
    /// Mineable tile of a consumed bank.
    Consumed,
    /// A saved vantage point.
    Marked,
    /// Number of reachable banks.
    Count(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TilePaint {
    pub pos: GridPos,
    pub category: TileCategory,
    pub marks: TileMarks,
    pub label: Option<TileLabel>,
}

/// Everything a viewer needs for one repaint, copied out of the shared state.
#[derive(Clone, Debug)]
pub struct RadarFrame {
    pub grid: GridState,
    pub visible_consumed: FnvHashSet<BankLocation>,
    pub highlighted: FnvHashSet<BankLocation>,
    /// Marked spots of the grid's map.
    pub marked_spots: Vec<WorldLocation>,
    pub agent: WorldLocation,
}

impl RadarFrame {
    /// Tile paints in row-major order.
    pub fn paint_plan(&self) -> Vec<TilePaint> {
        let center = self.grid.center_pos();
        let marked: FnvHashSet<WorldLocation> = self.marked_spots.iter().copied().collect();

        self.grid
            .tiles()
            .iter()
            .map(|(pos, tile)| {
                let mut marks = TileMarks::empty();
                if pos == center {
                    marks |= TileMarks::AGENT;
                }
                if self.highlighted.contains(&tile.bank) {
                    marks |= TileMarks::HIGHLIGHTED;
                }

                let label = if tile.is_mineable() && self.visible_consumed.contains(&tile.bank) {
                    Some(TileLabel::Consumed)
                } else if marked.contains(&tile.location) {
                    Some(TileLabel::Marked)
                } else if tile.reachable_banks > 0 {
                    Some(TileLabel::Count(tile.reachable_banks))
                } else {
                    None
                };

                TilePaint {
                    pos,
                    category: tile.category,
                    marks,
                    label,
                }
            })
            .collect()
    }

    /// Grid lines first, then tiles.
    pub fn paint<P: RadarPainter + ?Sized>(&self, painter: &mut P) {
        for (index, boundary) in self.grid.row_boundaries().iter().enumerate() {
            painter.grid_line(Axis::Row, index, *boundary);
        }
        for (index, boundary) in self.grid.col_boundaries().iter().enumerate() {
            painter.grid_line(Axis::Column, index, *boundary);
        }
        for paint in self.paint_plan() {
            painter.tile(&paint);
        }
    }
}

/// Banks reachable from the clicked tile, deduplicated. Empty for positions
/// outside the window.
pub fn highlight_banks(grid: &GridState, pos: GridPos) -> FnvHashSet<BankLocation> {
    grid.tile(pos)
        .map(|tile| {
            tile.reachable_tiles
                .iter()
                .map(|loc| loc.bank(grid.bank_size()))
                .collect()
        })
        .unwrap_or_default()
}

/// Renders frames as text, one character per tile.
///
/// `.` plain, `#` decoration, `%` mineable, `@` agent, `*` highlighted;
/// labels win over all of these (`X`, `M`, the count, `+` above nine).
pub struct AsciiPainter {
    rows: Vec<Vec<char>>,
}

impl AsciiPainter {
    pub fn new(side: usize) -> Self {
        AsciiPainter {
            rows: vec![vec![' '; side]; side],
        }
    }

    pub fn render(frame: &RadarFrame) -> String {
        let mut painter = AsciiPainter::new(frame.grid.side());
        frame.paint(&mut painter);
        painter.finish()
    }

    pub fn finish(self) -> String {
        self.rows
            .into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .join("\n")
    }
}

impl RadarPainter for AsciiPainter {
    fn grid_line(&mut self, _axis: Axis, _index: usize, _bank_boundary: bool) {}

    fn tile(&mut self, paint: &TilePaint) {
        let c = match paint.label {
            Some(TileLabel::Consumed) => 'X',
            Some(TileLabel::Marked) => 'M',
            Some(TileLabel::Count(n)) => char::from_digit(n, 10).unwrap_or('+'),
            None if paint.marks.contains(TileMarks::AGENT) => '@',
            None if paint.marks.contains(TileMarks::HIGHLIGHTED) => '*',
            None => match paint.category {
                TileCategory::Plain => '.',
                TileCategory::ObstacleDecoration => '#',
                TileCategory::Mineable => '%',
            },
        };
        if let Some(cell) = self
            .rows
            .get_mut(paint.pos.row)
            .and_then(|row| row.get_mut(paint.pos.col))
        {
            *cell = c;
        }
    }
}
