use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use image::DynamicImage;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, ColorBits, ColorSpace, Image as PdfImage, ImageTransform,
    ImageXObject, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Point, Polygon, Px, Rgb,
};

use crate::compose::Page;
use crate::config::{Config, DocumentConfig, Labels};
use crate::error::{Error, ErrorKind};
use crate::geometry::{Anchor, Rect};
use crate::render::style::{Color, TextStyle};
use crate::render::{self, Canvas, TextMeasure};

const MM_PER_INCH: f32 = 25.4;

/// Document assembler around printpdf. All assets are loaded up front so a
/// run fails before anything has been rendered, and the output file is only
/// created once every page has been drawn.
pub struct PdfAssembler {
    doc: PdfDocumentReference,
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    backgrounds: Vec<Option<DynamicImage>>,
    meta: DocumentConfig,
    page_width: i32,
    page_height: i32,
}

impl PdfAssembler {
    pub fn new(
        config: &Config,
        year: i32,
        images: Option<&Path>,
        font: Option<&Path>,
    ) -> Result<PdfAssembler, Error> {
        let meta = config.document.clone();
        let title = format!("{} {}", meta.title, year);

        let (doc, page, layer) = PdfDocument::new(
            &title,
            Mm(px_to_mm(config.page.width, meta.dpi)),
            Mm(px_to_mm(config.page.height, meta.dpi)),
            "month 1",
        );

        let (regular, bold) = match font {
            Some(path) => {
                let file = File::open(path).map_err(|err| {
                    Error::new(
                        ErrorKind::AssetUnavailable,
                        &format!("font '{}': {}", path.display(), err),
                    )
                })?;
                let font = doc.add_external_font(file).map_err(|err| {
                    Error::new(
                        ErrorKind::AssetUnavailable,
                        &format!("font '{}': {}", path.display(), err),
                    )
                })?;
                (font.clone(), font)
            }
            None => (
                doc.add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(|err| Error::new(ErrorKind::Render, &err.to_string()))?,
                doc.add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(|err| Error::new(ErrorKind::Render, &err.to_string()))?,
            ),
        };

        let backgrounds = match images {
            Some(dir) => load_backgrounds(dir)?,
            None => (0..12).map(|_| None).collect(),
        };

        Ok(PdfAssembler {
            doc,
            first_page: Some((page, layer)),
            regular,
            bold,
            backgrounds,
            meta,
            page_width: config.page.width,
            page_height: config.page.height,
        })
    }

    pub fn render_page(&mut self, page: &Page, labels: &Labels) {
        let (page_idx, layer_idx) = match self.first_page.take() {
            Some(first) => first,
            None => self.doc.add_page(
                Mm(px_to_mm(self.page_width, self.meta.dpi)),
                Mm(px_to_mm(self.page_height, self.meta.dpi)),
                format!("month {}", page.month),
            ),
        };
        let layer = self.doc.get_page(page_idx).get_layer(layer_idx);

        let mut canvas = PdfCanvas {
            layer,
            regular: &self.regular,
            bold: &self.bold,
            background: self.backgrounds[(page.month - 1) as usize].as_ref(),
            page_height: self.page_height,
            dpi: self.meta.dpi,
        };

        render::walk(&mut canvas, page, labels);
    }

    /// Writes the document. The final file appears atomically; a failed save
    /// leaves nothing behind.
    pub fn save(self, path: &Path) -> Result<(), Error> {
        let tmp = path.with_extension("partial");

        let PdfAssembler { doc, meta, .. } = self;

        let result = File::create(&tmp).map_err(Error::from).and_then(|file| {
            doc.save(&mut BufWriter::new(file))
                .map_err(|err| Error::new(ErrorKind::Render, &err.to_string()))
        });

        match result {
            Ok(()) => {
                fs::rename(&tmp, path)?;
                log::info!(
                    "wrote '{}' (author: {}, producer: {}, {} dpi)",
                    path.display(),
                    meta.author,
                    meta.producer,
                    meta.dpi
                );
                Ok(())
            }
            Err(err) => {
                let _ = fs::remove_file(&tmp);
                Err(err)
            }
        }
    }
}

impl TextMeasure for PdfAssembler {
    fn measure(&self, text: &str, style: &TextStyle) -> (i32, i32) {
        estimate_text_size(text, style)
    }
}

fn load_backgrounds(dir: &Path) -> Result<Vec<Option<DynamicImage>>, Error> {
    let mut backgrounds = Vec::with_capacity(12);
    for month in 1..=12 {
        let path = ["png", "jpg", "jpeg"]
            .iter()
            .map(|ext| dir.join(format!("{:02}.{}", month, ext)))
            .find(|p| p.exists())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::AssetUnavailable,
                    &format!(
                        "no background image for month {} in '{}'",
                        month,
                        dir.display()
                    ),
                )
            })?;
        let image = image::open(&path).map_err(|err| {
            Error::new(
                ErrorKind::AssetUnavailable,
                &format!("background '{}': {}", path.display(), err),
            )
        })?;
        backgrounds.push(Some(image));
    }
    Ok(backgrounds)
}

fn px_to_mm(px: i32, dpi: f32) -> f32 {
    px as f32 * MM_PER_INCH / dpi
}

/// Average-advance estimate; printpdf's builtin fonts expose no metrics and
/// short name lists only need to be centered, not typeset.
fn estimate_text_size(text: &str, style: &TextStyle) -> (i32, i32) {
    let factor = if style.bold { 0.56 } else { 0.52 };
    let width = (text.chars().count() as f32 * style.size as f32 * factor).ceil() as i32;
    (width, style.size)
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

/// One page's drawing surface. Page coordinates run top-down in pixels;
/// everything is flipped and scaled into PDF millimeters here and nowhere
/// else.
struct PdfCanvas<'a> {
    layer: PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    background: Option<&'a DynamicImage>,
    page_height: i32,
    dpi: f32,
}

impl<'a> PdfCanvas<'a> {
    fn mm(&self, px: i32) -> f32 {
        px_to_mm(px, self.dpi)
    }

    fn y_mm(&self, y_px: i32) -> f32 {
        px_to_mm(self.page_height - y_px, self.dpi)
    }

    fn pt(&self, px: i32) -> f32 {
        px as f32 * 72.0 / self.dpi
    }

    fn point(&self, x_px: i32, y_px: i32) -> Point {
        Point::new(Mm(self.mm(x_px)), Mm(self.y_mm(y_px)))
    }

    fn rounded_ring(&self, bounds: Rect, radius: i32) -> Vec<(Point, bool)> {
        let (x0, y0) = (bounds.x, bounds.y);
        let (x1, y1) = (bounds.right(), bounds.bottom());

        let r = radius.min(bounds.w / 2).min(bounds.h / 2);
        if r <= 0 {
            return vec![
                (self.point(x0, y0), false),
                (self.point(x1, y0), false),
                (self.point(x1, y1), false),
                (self.point(x0, y1), false),
            ];
        }

        // quarter-circle corners as cubic beziers
        let k = (r as f32 * 0.552_284_8).round() as i32;
        vec![
            (self.point(x0 + r, y0), false),
            (self.point(x1 - r, y0), false),
            (self.point(x1 - r + k, y0), true),
            (self.point(x1, y0 + r - k), true),
            (self.point(x1, y0 + r), false),
            (self.point(x1, y1 - r), false),
            (self.point(x1, y1 - r + k), true),
            (self.point(x1 - r + k, y1), true),
            (self.point(x1 - r, y1), false),
            (self.point(x0 + r, y1), false),
            (self.point(x0 + r - k, y1), true),
            (self.point(x0, y1 - r + k), true),
            (self.point(x0, y1 - r), false),
            (self.point(x0, y0 + r), false),
            (self.point(x0, y0 + r - k), true),
            (self.point(x0 + r - k, y0), true),
        ]
    }
}

impl<'a> TextMeasure for PdfCanvas<'a> {
    fn measure(&self, text: &str, style: &TextStyle) -> (i32, i32) {
        estimate_text_size(text, style)
    }
}

impl<'a> Canvas for PdfCanvas<'a> {
    fn fill_rounded_rect(&mut self, bounds: Rect, radius: i32, color: Color) {
        self.layer.set_fill_color(pdf_color(color));
        self.layer.add_polygon(Polygon {
            rings: vec![self.rounded_ring(bounds, radius)],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), width: i32, color: Color) {
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(self.pt(width));
        self.layer.add_line(Line {
            points: vec![
                (self.point(from.0, from.1), false),
                (self.point(to.0, to.1), false),
            ],
            is_closed: false,
        });
    }

    fn draw_text(&mut self, text: &str, bounds: Rect, anchor: Anchor, style: &TextStyle) {
        let font = if style.bold { self.bold } else { self.regular };
        let (width, _) = estimate_text_size(text, style);
        let x = bounds.center_x() - width / 2;

        // use_text positions the baseline; take the ascent as 80% of the size
        let baseline = match anchor {
            Anchor::TopCenter => bounds.y + (style.size as f32 * 0.8) as i32,
            Anchor::MiddleCenter => bounds.center_y() + (style.size as f32 * 0.3) as i32,
        };

        self.layer.set_fill_color(pdf_color(style.color));
        self.layer.use_text(
            text,
            self.pt(style.size),
            Mm(self.mm(x)),
            Mm(self.y_mm(baseline)),
            font,
        );
    }

    fn draw_illustration(&mut self, bounds: Rect) {
        let image = match self.background {
            Some(image) => image,
            None => return,
        };

        let rgb = image.to_rgb8();
        let (width_px, height_px) = rgb.dimensions();

        // aspect-preserving fit, centered within the target area
        let bounds_w = self.mm(bounds.w);
        let bounds_h = self.mm(bounds.h);
        let aspect = width_px as f32 / height_px as f32;
        let (final_w, final_h) = if bounds_w / bounds_h > aspect {
            (bounds_h * aspect, bounds_h)
        } else {
            (bounds_w, bounds_w / aspect)
        };

        let x = self.mm(bounds.x) + (bounds_w - final_w) / 2.0;
        let y = self.y_mm(bounds.y) - (bounds_h - final_h) / 2.0 - final_h;
        let dpi = width_px as f32 / (final_w / MM_PER_INCH);

        let xobject = ImageXObject {
            width: Px(width_px as usize),
            height: Px(height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: rgb.into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        };

        PdfImage::from(xobject).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(y)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_to_millimeter_conversion_honors_dpi() {
        assert!((px_to_mm(150, 150.0) - 25.4).abs() < 1e-4);
        assert!((px_to_mm(0, 150.0)).abs() < 1e-4);
    }

    #[test]
    fn estimated_width_grows_with_the_text() {
        let style = TextStyle {
            size: 13,
            color: Color::rgb(0, 0, 0),
            bold: false,
        };
        let (short, _) = estimate_text_size("Jan", &style);
        let (long, _) = estimate_text_size("Jan, Sebastian", &style);
        assert!(long > short);
    }
}
