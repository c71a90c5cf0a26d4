use chrono::Datelike;

use crate::config::Config;
use crate::error::Error;
use crate::geometry::{self, Anchor, Content, DrawPrimitive, Rect, Shape, Tag};
use crate::grid::{CellKind, Grid, COLUMNS};
use crate::namedays::NameDayTable;
use crate::render::style;
use crate::render::TextMeasure;

/// One composed month: everything a drawing surface needs, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub year: i32,
    pub month: u32,
    pub primitives: Vec<DrawPrimitive>,
}

/// Builds the full primitive list for one month: illustration and title at
/// fixed page offsets, the positioned grid, and name-day annotations for
/// every in-month cell the table knows about.
pub fn compose_page(
    year: i32,
    month: u32,
    config: &Config,
    names: Option<&NameDayTable>,
    measure: &dyn TextMeasure,
) -> Result<Page, Error> {
    let grid = Grid::build(year, month)?;
    let spec = &config.geometry;

    let mut primitives = Vec::new();

    primitives.push(DrawPrimitive {
        tag: Tag::Illustration,
        shape: Shape::Image {
            bounds: config.page.illustration_area,
        },
    });

    let title = format!("{} {}", config.labels.months[(month - 1) as usize], year);
    primitives.push(DrawPrimitive {
        tag: Tag::Title,
        shape: Shape::Text {
            bounds: config.page.title_area,
            anchor: Anchor::MiddleCenter,
            content: Content::Literal(title),
        },
    });

    for mut primitive in geometry::layout(&grid, spec) {
        primitive.translate(config.page.grid_x, config.page.grid_y);
        primitives.push(primitive);
    }

    if let Some(table) = names {
        let style = style::text_style(&Tag::NameDay);
        for row in 0..grid.rows() {
            for col in 0..COLUMNS {
                let date = grid.cell(row, col);
                if CellKind::classify(date, month) == CellKind::Overflow {
                    continue;
                }
                let day = date.day();
                match table.names(day, month) {
                    Some(entries) => {
                        let text = entries.join(", ");
                        let (w, h) = measure.measure(&text, &style);
                        let cell = geometry::cell_rect(row, col, spec)
                            .translated(config.page.grid_x, config.page.grid_y);
                        let bottom = cell.bottom() - spec.separator_width - spec.name_spacing;
                        primitives.push(DrawPrimitive {
                            tag: Tag::NameDay,
                            shape: Shape::Text {
                                bounds: Rect::new(cell.center_x() - w / 2, bottom - h, w, h),
                                anchor: Anchor::MiddleCenter,
                                content: Content::Literal(text),
                            },
                        });
                    }
                    None => log::trace!("no name-day entry for {}.{}", day, month),
                }
            }
        }
    }

    Ok(Page {
        year,
        month,
        primitives,
    })
}

/// Composes the twelve pages of a year in month order.
pub fn compose_year(
    year: i32,
    config: &Config,
    names: Option<&NameDayTable>,
    measure: &dyn TextMeasure,
) -> Result<Vec<Page>, Error> {
    (1..=12)
        .map(|month| compose_page(year, month, config, names, measure))
        .collect()
}
