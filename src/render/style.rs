use crate::geometry::Tag;
use crate::grid::CellKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in page pixels.
    pub size: i32,
    pub color: Color,
    pub bold: bool,
}

const INK: Color = Color::rgb(40, 40, 40);
const MUTED: Color = Color::rgb(130, 130, 130);
const HEADER_FILL: Color = Color::rgb(60, 90, 150);
const HEADER_INK: Color = Color::rgb(255, 255, 255);
const WEEK_FILL: Color = Color::rgb(225, 230, 240);
const SATURDAY_INK: Color = Color::rgb(120, 60, 140);
const SUNDAY_INK: Color = Color::rgb(190, 40, 50);
const SEPARATOR: Color = Color::rgb(180, 180, 180);

pub fn fill_color(tag: &Tag) -> Color {
    match tag {
        Tag::WeekdayHeader => HEADER_FILL,
        Tag::WeekColumnBackground => WEEK_FILL,
        _ => INK,
    }
}

pub fn line_color(tag: &Tag) -> Color {
    match tag {
        Tag::Separator => SEPARATOR,
        _ => INK,
    }
}

pub fn text_style(tag: &Tag) -> TextStyle {
    match tag {
        Tag::Title => TextStyle {
            size: 52,
            color: INK,
            bold: true,
        },
        Tag::WeekdayHeader => TextStyle {
            size: 22,
            color: HEADER_INK,
            bold: true,
        },
        Tag::WeekNumber => TextStyle {
            size: 18,
            color: MUTED,
            bold: false,
        },
        Tag::DayNumber(kind) => TextStyle {
            size: 34,
            color: match kind {
                CellKind::Saturday => SATURDAY_INK,
                CellKind::Sunday => SUNDAY_INK,
                CellKind::Overflow => MUTED,
                CellKind::Weekday => INK,
            },
            bold: false,
        },
        Tag::NameDay => TextStyle {
            size: 13,
            color: MUTED,
            bold: false,
        },
        _ => TextStyle {
            size: 16,
            color: INK,
            bold: false,
        },
    }
}
