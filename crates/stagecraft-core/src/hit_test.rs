//! Pixel-accurate hit testing.
//!
//! Shape containment finds the candidates; image elements are then
//! rasterized so a click on a transparent cut-out falls through to whatever
//! lies beneath. Rasterizing is comparatively expensive, so resolve only at
//! gesture start, never per move event.

use crate::editor::EditorStore;
use crate::element::{Element, ElementId, decode_data_url};
use image::{Rgba, RgbaImage};
use kurbo::{Point, Rect, Size};
use std::collections::HashMap;
use thiserror::Error;

/// Rasterization errors.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Element has no image source")]
    NoSource,
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Viewport is empty")]
    EmptyViewport,
}

/// Offscreen RGBA bitmap covering the viewport.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    image: RgbaImage,
}

impl RasterBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Alpha of the pixel containing `point`. Zero outside the buffer.
    pub fn alpha_at(&self, point: Point) -> u8 {
        if point.x < 0.0 || point.y < 0.0 {
            return 0;
        }
        let (x, y) = (point.x.floor() as u32, point.y.floor() as u32);
        self.image.get_pixel_checked(x, y).map_or(0, |p| p[3])
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Draws a single element, transform applied, into a viewport-sized buffer.
pub trait Rasterizer {
    fn rasterize(&mut self, element: &Element, viewport: Size) -> Result<RasterBuffer, RasterError>;
}

/// Rasterizer for image elements backed by `data:` URLs.
///
/// Decoded sources are cached by URL.
#[derive(Debug, Default)]
pub struct ImageRasterizer {
    cache: HashMap<String, RgbaImage>,
}

impl ImageRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached_sources(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn decoded(&mut self, src: &str) -> Result<&RgbaImage, RasterError> {
        if !self.cache.contains_key(src) {
            let (_, bytes) =
                decode_data_url(src).ok_or_else(|| RasterError::UnsupportedSource(truncate(src).to_string()))?;
            let decoded = image::load_from_memory(&bytes)?.to_rgba8();
            log::debug!("Decoded {}x{} image for hit testing", decoded.width(), decoded.height());
            self.cache.insert(src.to_string(), decoded);
        }
        self.cache
            .get(src)
            .ok_or_else(|| RasterError::UnsupportedSource(truncate(src).to_string()))
    }
}

fn truncate(src: &str) -> &str {
    match src.char_indices().nth(32) {
        Some((i, _)) => &src[..i],
        None => src,
    }
}

impl Rasterizer for ImageRasterizer {
    fn rasterize(&mut self, element: &Element, viewport: Size) -> Result<RasterBuffer, RasterError> {
        let src = element
            .kind
            .image_source()
            .and_then(|s| s.src.as_deref())
            .ok_or(RasterError::NoSource)?;
        let (width, height) = (viewport.width.ceil() as u32, viewport.height.ceil() as u32);
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyViewport);
        }

        let bounds = element.bounds();
        let scale = element.scale;
        let inverse = element.affine().inverse();
        let source = self.decoded(src)?;
        let mut buffer = RgbaImage::new(width, height);
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 || scale.abs() < f64::EPSILON {
            return Ok(RasterBuffer::from_image(buffer));
        }

        // Only the element's on-screen footprint can receive pixels
        let footprint = element
            .visual_bounds()
            .intersect(Rect::new(0.0, 0.0, f64::from(width), f64::from(height)));
        let (sw, sh) = (f64::from(source.width()), f64::from(source.height()));
        for py in footprint.y0.floor() as u32..(footprint.y1.ceil() as u32).min(height) {
            for px in footprint.x0.floor() as u32..(footprint.x1.ceil() as u32).min(width) {
                let local = inverse * Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
                let u = (local.x - bounds.x0) / bounds.width();
                let v = (local.y - bounds.y0) / bounds.height();
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let sx = ((u * sw) as u32).min(source.width() - 1);
                let sy = ((v * sh) as u32).min(source.height() - 1);
                let pixel: Rgba<u8> = *source.get_pixel(sx, sy);
                buffer.put_pixel(px, py, pixel);
            }
        }
        Ok(RasterBuffer::from_image(buffer))
    }
}

/// Resolves the element under a pointer, seeing through transparent image
/// pixels.
pub struct HitTestResolver<R: Rasterizer = ImageRasterizer> {
    rasterizer: R,
    viewport: Size,
}

impl HitTestResolver<ImageRasterizer> {
    pub fn new(viewport: Size) -> Self {
        Self::with_rasterizer(ImageRasterizer::new(), viewport)
    }
}

impl<R: Rasterizer> HitTestResolver<R> {
    pub fn with_rasterizer(rasterizer: R, viewport: Size) -> Self {
        Self { rasterizer, viewport }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// The most specific element under `point`.
    ///
    /// If the topmost candidate is an image that is fully transparent there,
    /// it is skipped and the element beneath it is returned. Only one image
    /// is skipped this way.
    pub fn resolve(&mut self, store: &EditorStore, point: Point) -> Option<ElementId> {
        let mut candidates = store.elements_at_point(point).into_iter();
        let top = candidates.next()?;
        let Some(element) = store.element(top) else {
            return Some(top);
        };
        if element.is_image() && self.is_transparent_at(element, point) {
            log::debug!("Hit fell through transparent pixel of {top}");
            return candidates.next();
        }
        Some(top)
    }

    fn is_transparent_at(&mut self, element: &Element, point: Point) -> bool {
        match self.rasterizer.rasterize(element, self.viewport) {
            Ok(buffer) => buffer.alpha_at(point) == 0,
            Err(e) => {
                // Unrenderable sources count as opaque
                log::debug!("Could not rasterize {}: {e}", element.id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::png_bytes;
    use crate::element::{ElementPatch, ElementType, ImageFormat, ImageSource, encode_data_url};
    use std::f64::consts::FRAC_PI_2;

    fn image_source(alpha: u8) -> ImageSource {
        ImageSource {
            src: Some(encode_data_url(ImageFormat::Png, &png_bytes(4, 4, alpha))),
            thumbnail: None,
            original_size: Some(Size::new(4.0, 4.0)),
        }
    }

    fn store_with_stack(image_alpha: u8) -> (EditorStore, ElementId, ElementId) {
        let mut store = EditorStore::default();
        store.set_identity(Some("tester".into()));
        let below = store
            .add_element(
                ElementType::Rectangle,
                ElementPatch::new()
                    .with_position(Point::new(0.0, 0.0))
                    .with_size(Size::new(100.0, 100.0)),
            )
            .unwrap();
        let above = store
            .add_element(
                ElementType::Image,
                ElementPatch::new()
                    .with_position(Point::new(0.0, 0.0))
                    .with_size(Size::new(100.0, 100.0))
                    .with_image(image_source(image_alpha)),
            )
            .unwrap();
        (store, below.id, above.id)
    }

    #[test]
    fn test_alpha_at_bounds() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(1, 1, Rgba([0, 0, 0, 200]));
        let buffer = RasterBuffer::from_image(img);
        assert_eq!(buffer.alpha_at(Point::new(1.5, 1.5)), 200);
        assert_eq!(buffer.alpha_at(Point::new(0.5, 0.5)), 0);
        assert_eq!(buffer.alpha_at(Point::new(-1.0, 0.0)), 0);
        assert_eq!(buffer.alpha_at(Point::new(5.0, 5.0)), 0);
    }

    #[test]
    fn test_rasterize_follows_transform() {
        let mut el = Element::new(ElementType::Image);
        el.position = Point::new(10.0, 40.0);
        el.size = Some(Size::new(80.0, 20.0));
        el.rotation = FRAC_PI_2;
        if let Some(source) = el.kind.image_source_mut() {
            *source = image_source(255);
        }

        let mut rasterizer = ImageRasterizer::new();
        let buffer = rasterizer.rasterize(&el, Size::new(100.0, 100.0)).unwrap();
        // Quarter turn about (50, 50): the wide strip becomes a tall one
        assert_eq!(buffer.alpha_at(Point::new(50.0, 15.0)), 255);
        assert_eq!(buffer.alpha_at(Point::new(15.0, 50.0)), 0);
        assert_eq!(rasterizer.cached_sources(), 1);
    }

    #[test]
    fn test_transparent_image_falls_through() {
        let (store, below, _) = store_with_stack(0);
        let mut resolver = HitTestResolver::new(Size::new(200.0, 200.0));
        assert_eq!(resolver.resolve(&store, Point::new(50.0, 50.0)), Some(below));
    }

    #[test]
    fn test_opaque_image_wins() {
        let (store, _, above) = store_with_stack(255);
        let mut resolver = HitTestResolver::new(Size::new(200.0, 200.0));
        assert_eq!(resolver.resolve(&store, Point::new(50.0, 50.0)), Some(above));
    }

    #[test]
    fn test_unrenderable_image_is_opaque() {
        let (mut store, _, above) = store_with_stack(0);
        let remote = ImageSource {
            src: Some("https://example.com/door.png".into()),
            ..Default::default()
        };
        store.update_element(above, &ElementPatch::new().with_image(remote));
        let mut resolver = HitTestResolver::new(Size::new(200.0, 200.0));
        assert_eq!(resolver.resolve(&store, Point::new(50.0, 50.0)), Some(above));
    }

    #[test]
    fn test_only_one_level_skipped() {
        let (mut store, _, _) = store_with_stack(0);
        let top = store
            .add_element(
                ElementType::Image,
                ElementPatch::new()
                    .with_position(Point::new(0.0, 0.0))
                    .with_size(Size::new(100.0, 100.0))
                    .with_image(image_source(0)),
            )
            .unwrap();
        let second = store.elements_at_point(Point::new(50.0, 50.0))[1];
        assert_ne!(second, top.id);

        let mut resolver = HitTestResolver::new(Size::new(200.0, 200.0));
        // The image right below is returned even though it is transparent too
        assert_eq!(resolver.resolve(&store, Point::new(50.0, 50.0)), Some(second));
    }

    #[test]
    fn test_nothing_under_pointer() {
        let (store, _, _) = store_with_stack(255);
        let mut resolver = HitTestResolver::new(Size::new(200.0, 200.0));
        assert_eq!(resolver.resolve(&store, Point::new(150.0, 150.0)), None);
    }
}
