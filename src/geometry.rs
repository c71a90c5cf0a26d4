use chrono::Datelike;
use serde::Deserialize;

use crate::grid::{CellKind, Grid, COLUMNS};

/// Pixel constants governing one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeometrySpec {
    pub grid_width: i32,
    pub header_height: i32,
    pub row_height: i32,
    pub week_column_width: i32,
    pub corner_radius: i32,
    pub separator_width: i32,
    /// Inset from a cell's top edge to the day number of in-month cells.
    pub cell_inset: i32,
    /// Gap between a name-day block and the cell's bottom edge.
    pub name_spacing: i32,
}

impl Default for GeometrySpec {
    fn default() -> GeometrySpec {
        GeometrySpec {
            grid_width: 750,
            header_height: 48,
            row_height: 96,
            week_column_width: 46,
            corner_radius: 8,
            separator_width: 2,
            cell_inset: 10,
            name_spacing: 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// Reference point of a text placeholder's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopCenter,
    MiddleCenter,
}

/// Text carried by a placeholder. Weekday labels stay symbolic so the layout
/// holds no localized strings; the renderer resolves the column index against
/// the configured labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Weekday(usize),
    Number(u32),
    Literal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    WeekdayHeader,
    WeekColumnBackground,
    WeekNumber,
    DayNumber(CellKind),
    Separator,
    NameDay,
    Title,
    Illustration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    RoundedRect {
        bounds: Rect,
        radius: i32,
    },
    Line {
        from: (i32, i32),
        to: (i32, i32),
        width: i32,
    },
    Text {
        bounds: Rect,
        anchor: Anchor,
        content: Content,
    },
    Image {
        bounds: Rect,
    },
}

/// A positioned, typed draw instruction. Colors and fonts are resolved later
/// by the styling policy; the geometry only decides where things go.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPrimitive {
    pub tag: Tag,
    pub shape: Shape,
}

impl DrawPrimitive {
    pub fn translate(&mut self, dx: i32, dy: i32) {
        match &mut self.shape {
            Shape::RoundedRect { bounds, .. } => *bounds = bounds.translated(dx, dy),
            Shape::Line { from, to, .. } => {
                *from = (from.0 + dx, from.1 + dy);
                *to = (to.0 + dx, to.1 + dy);
            }
            Shape::Text { bounds, .. } => *bounds = bounds.translated(dx, dy),
            Shape::Image { bounds } => *bounds = bounds.translated(dx, dy),
        }
    }
}

/// Width shared by all day columns except the last one, which absorbs the
/// integer-division remainder so every column boundary has a single source
/// of truth.
pub fn column_width(spec: &GeometrySpec) -> i32 {
    (spec.grid_width - spec.week_column_width) / COLUMNS as i32
}

fn column_rect(col: usize, y: i32, height: i32, spec: &GeometrySpec) -> Rect {
    let width = column_width(spec);
    let x = spec.week_column_width + col as i32 * width;
    let w = if col == COLUMNS - 1 {
        spec.grid_width - x
    } else {
        width
    };
    Rect::new(x, y, w, height)
}

/// Rectangle of a day cell, relative to the grid origin.
pub fn cell_rect(row: usize, col: usize, spec: &GeometrySpec) -> Rect {
    column_rect(
        col,
        spec.header_height + row as i32 * spec.row_height,
        spec.row_height,
        spec,
    )
}

/// Lays out one month's grid as an ordered list of draw primitives with the
/// grid's top-left corner at (0, 0).
pub fn layout(grid: &Grid, spec: &GeometrySpec) -> Vec<DrawPrimitive> {
    let rows = grid.rows();
    let body_top = spec.header_height;
    let body_height = rows as i32 * spec.row_height;

    let mut primitives = Vec::new();

    // header row, one cell per weekday column
    for col in 0..COLUMNS {
        let bounds = column_rect(col, 0, spec.header_height, spec);
        primitives.push(DrawPrimitive {
            tag: Tag::WeekdayHeader,
            shape: Shape::RoundedRect {
                bounds,
                radius: spec.corner_radius,
            },
        });
        primitives.push(DrawPrimitive {
            tag: Tag::WeekdayHeader,
            shape: Shape::Text {
                bounds,
                anchor: Anchor::MiddleCenter,
                content: Content::Weekday(col),
            },
        });
    }

    // week-number column below the header
    primitives.push(DrawPrimitive {
        tag: Tag::WeekColumnBackground,
        shape: Shape::RoundedRect {
            bounds: Rect::new(0, body_top, spec.week_column_width, body_height),
            radius: spec.corner_radius,
        },
    });
    for row in 0..rows {
        primitives.push(DrawPrimitive {
            tag: Tag::WeekNumber,
            shape: Shape::Text {
                bounds: Rect::new(
                    0,
                    body_top + row as i32 * spec.row_height,
                    spec.week_column_width,
                    spec.row_height,
                ),
                anchor: Anchor::MiddleCenter,
                content: Content::Number(grid.week_number(row)),
            },
        });
    }

    // day numbers; overflow days sit centered in the cell, in-month days top
    // anchored with room for an annotation underneath
    for row in 0..rows {
        for col in 0..COLUMNS {
            let date = grid.cell(row, col);
            let kind = CellKind::classify(date, grid.month());
            let cell = cell_rect(row, col, spec);
            let (bounds, anchor) = match kind {
                CellKind::Overflow => (cell, Anchor::MiddleCenter),
                _ => (
                    Rect::new(cell.x, cell.y + spec.cell_inset, cell.w, cell.h - spec.cell_inset),
                    Anchor::TopCenter,
                ),
            };
            primitives.push(DrawPrimitive {
                tag: Tag::DayNumber(kind),
                shape: Shape::Text {
                    bounds,
                    anchor,
                    content: Content::Number(date.day()),
                },
            });
        }
    }

    // vertical separators at the right edge of all but the last column,
    // spanning header and body
    for col in 0..COLUMNS - 1 {
        let x = column_rect(col, 0, 0, spec).right();
        primitives.push(DrawPrimitive {
            tag: Tag::Separator,
            shape: Shape::Line {
                from: (x, 0),
                to: (x, body_top + body_height),
                width: spec.separator_width,
            },
        });
    }

    // interior horizontal separators; each row is closed by the next row's
    // top, so the last row emits none and the outer border stays undrawn
    for col in 0..COLUMNS {
        let bounds = column_rect(col, 0, 0, spec);
        for row in 0..rows.saturating_sub(1) {
            let y = body_top + (row as i32 + 1) * spec.row_height;
            primitives.push(DrawPrimitive {
                tag: Tag::Separator,
                shape: Shape::Line {
                    from: (bounds.x, y),
                    to: (bounds.right(), y),
                    width: spec.separator_width,
                },
            });
        }
    }

    primitives
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> GeometrySpec {
        GeometrySpec::default()
    }

    #[test]
    fn last_column_absorbs_the_remainder() {
        let spec = spec();
        assert_eq!(spec.grid_width, 750);
        assert_eq!(spec.week_column_width, 46);
        assert_eq!(column_width(&spec), 100);
        assert_eq!(column_rect(6, 0, 10, &spec).w, 104);
        assert_eq!(column_rect(6, 0, 10, &spec).right(), spec.grid_width);
        for col in 0..COLUMNS - 1 {
            assert_eq!(column_rect(col, 0, 10, &spec).w, 100);
        }
    }

    #[test]
    fn primitive_counts_match_the_grid_shape() {
        let spec = spec();
        let grid = Grid::build(2024, 1).unwrap();
        let rows = grid.rows();
        let primitives = layout(&grid, &spec);

        let headers = primitives
            .iter()
            .filter(|p| p.tag == Tag::WeekdayHeader)
            .count();
        assert_eq!(headers, 2 * COLUMNS); // one background and one label per column

        let week_numbers = primitives
            .iter()
            .filter(|p| p.tag == Tag::WeekNumber)
            .count();
        assert_eq!(week_numbers, rows);

        let day_numbers = primitives
            .iter()
            .filter(|p| matches!(p.tag, Tag::DayNumber(_)))
            .count();
        assert_eq!(day_numbers, rows * COLUMNS);

        let separators: Vec<_> = primitives
            .iter()
            .filter(|p| p.tag == Tag::Separator)
            .collect();
        // 6 vertical plus (rows - 1) horizontal per column
        assert_eq!(separators.len(), (COLUMNS - 1) + COLUMNS * (rows - 1));
    }

    #[test]
    fn vertical_separators_span_header_and_body() {
        let spec = spec();
        let grid = Grid::build(2021, 2).unwrap();
        let height = spec.header_height + grid.rows() as i32 * spec.row_height;

        for p in layout(&grid, &spec) {
            if let (Tag::Separator, Shape::Line { from, to, .. }) = (&p.tag, &p.shape) {
                if from.0 == to.0 {
                    assert_eq!(from.1, 0);
                    assert_eq!(to.1, height);
                }
            }
        }
    }

    #[test]
    fn overflow_cells_center_while_in_month_cells_top_anchor() {
        let spec = spec();
        let grid = Grid::build(2021, 8).unwrap();

        for p in layout(&grid, &spec) {
            if let (Tag::DayNumber(kind), Shape::Text { bounds, anchor, .. }) = (&p.tag, &p.shape)
            {
                match kind {
                    CellKind::Overflow => {
                        assert_eq!(*anchor, Anchor::MiddleCenter);
                        assert_eq!(bounds.h, spec.row_height);
                    }
                    _ => {
                        assert_eq!(*anchor, Anchor::TopCenter);
                        assert_eq!(bounds.h, spec.row_height - spec.cell_inset);
                    }
                }
            }
        }
    }

    #[test]
    fn week_numbers_are_iso_weeks_of_the_row() {
        let spec = spec();
        let grid = Grid::build(2024, 1).unwrap();
        let weeks: Vec<u32> = layout(&grid, &spec)
            .into_iter()
            .filter_map(|p| match (p.tag, p.shape) {
                (Tag::WeekNumber, Shape::Text { content: Content::Number(n), .. }) => Some(n),
                _ => None,
            })
            .collect();
        assert_eq!(weeks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn layout_is_idempotent() {
        let spec = spec();
        let grid = Grid::build(2023, 11).unwrap();
        assert_eq!(layout(&grid, &spec), layout(&grid, &spec));
    }
}
