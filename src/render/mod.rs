pub mod pdf;
pub mod style;

use crate::compose::Page;
use crate::config::Labels;
use crate::geometry::{Anchor, Content, Rect, Shape};

use self::style::{Color, TextStyle};

/// Text bounding-box measurement, needed by the composer before any drawing
/// happens.
pub trait TextMeasure {
    /// Returns (width, height) of `text` in page pixels.
    fn measure(&self, text: &str, style: &TextStyle) -> (i32, i32);
}

/// Drawing surface for one page. Implementations own color, font and output
/// format concerns; callers hand them positioned primitives only.
pub trait Canvas: TextMeasure {
    fn fill_rounded_rect(&mut self, bounds: Rect, radius: i32, color: Color);
    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), width: i32, color: Color);
    fn draw_text(&mut self, text: &str, bounds: Rect, anchor: Anchor, style: &TextStyle);
    /// Draws the page's background illustration, if the surface has one.
    fn draw_illustration(&mut self, bounds: Rect);
}

/// Walks a composed page and issues the matching canvas calls, resolving
/// symbolic weekday labels and the per-tag styling policy on the way.
pub fn walk(canvas: &mut dyn Canvas, page: &Page, labels: &Labels) {
    for primitive in &page.primitives {
        match &primitive.shape {
            Shape::RoundedRect { bounds, radius } => {
                canvas.fill_rounded_rect(*bounds, *radius, style::fill_color(&primitive.tag));
            }
            Shape::Line { from, to, width } => {
                canvas.draw_line(*from, *to, *width, style::line_color(&primitive.tag));
            }
            Shape::Text {
                bounds,
                anchor,
                content,
            } => {
                let style = style::text_style(&primitive.tag);
                match content {
                    Content::Weekday(col) => {
                        canvas.draw_text(&labels.weekdays[*col], *bounds, *anchor, &style)
                    }
                    Content::Number(n) => {
                        canvas.draw_text(&n.to_string(), *bounds, *anchor, &style)
                    }
                    Content::Literal(text) => canvas.draw_text(text, *bounds, *anchor, &style),
                }
            }
            Shape::Image { bounds } => canvas.draw_illustration(*bounds),
        }
    }
}
