//! Coordinate conversion between the on-screen image and the original image.
//!
//! Screen values are image-local: `(0, 0)` is the top-left corner of the displayed
//! image, not of the window. Image-space geometry is kept as unrounded `f64` and is
//! only rounded when a [`ScaledBox`] is produced for display or export.

use serde::{Deserialize, Serialize};

/// Space left free around the image inside the canvas, per axis.
pub const VIEWPORT_PADDING: f32 = 50.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Normalized rect spanning two corners given in any order.
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn clamp(&self, p: ScreenPoint) -> ScreenPoint {
        ScreenPoint {
            x: p.x.max(self.left).min(self.right()),
            y: p.y.max(self.top).min(self.bottom()),
        }
    }
}

/// Box geometry in original-image pixels. `(x, y)` is the center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Rounded, user-scaled geometry as shown in the list and exported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledBox {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

/// User-supplied export multipliers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportScale {
    pub x: f64,
    pub y: f64,
}

impl Default for ExportScale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

impl ExportScale {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parse the two text fields. Each reads its leading number and ignores the
    /// rest (`"2px"` is 2); a missing number, NaN or zero counts as 1.0.
    pub fn parse(x: &str, y: &str) -> Self {
        Self {
            x: parse_factor(x),
            y: parse_factor(y),
        }
    }
}

fn parse_factor(text: &str) -> f64 {
    leading_number(text)
        .filter(|v| !v.is_nan() && *v != 0.0)
        .unwrap_or(1.0)
}

/// Longest decimal prefix of `text` (after leading whitespace), or a signed
/// `Infinity`.
fn leading_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse().ok();
    }

    let int_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        end = frac_start;
        while is_digit(end) {
            end += 1;
        }
        mantissa_digits += end - frac_start;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_start = exp;
        while is_digit(exp) {
            exp += 1;
        }
        if exp > exp_start {
            end = exp;
        }
    }
    s[..end].parse().ok()
}

/// Displayed and original sizes of the loaded image, captured at the same moment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImageFrame {
    pub displayed: Size,
    pub original: Size,
}

impl ImageFrame {
    pub fn new(displayed: Size, original: Size) -> Self {
        Self {
            displayed,
            original,
        }
    }

    /// The displayed image in image-local screen coordinates.
    pub fn bounds(&self) -> ScreenRect {
        ScreenRect::new(0.0, 0.0, self.displayed.width, self.displayed.height)
    }

    pub fn is_empty(&self) -> bool {
        self.displayed.is_empty() || self.original.is_empty()
    }
}

/// Convert a drag rectangle on screen into center-based original-image geometry.
///
/// Returns `None` when either size has a zero dimension (no image loaded).
pub fn screen_rect_to_image_box(
    rect: ScreenRect,
    displayed: Size,
    original: Size,
) -> Option<Geometry> {
    if displayed.is_empty() || original.is_empty() {
        return None;
    }
    let scale_x = original.width as f64 / displayed.width as f64;
    let scale_y = original.height as f64 / displayed.height as f64;

    let w = rect.width as f64;
    let h = rect.height as f64;
    Some(Geometry {
        x: (rect.left as f64 + w / 2.0) * scale_x,
        y: (rect.top as f64 + h / 2.0) * scale_y,
        w: w * scale_x,
        h: h * scale_y,
    })
}

/// Inverse of [`screen_rect_to_image_box`], for painting stored boxes at the current
/// display size.
pub fn image_box_to_screen_rect(
    geometry: Geometry,
    displayed: Size,
    original: Size,
) -> Option<ScreenRect> {
    if displayed.is_empty() || original.is_empty() {
        return None;
    }
    let scale_x = displayed.width as f64 / original.width as f64;
    let scale_y = displayed.height as f64 / original.height as f64;

    let w = geometry.w * scale_x;
    let h = geometry.h * scale_y;
    Some(ScreenRect {
        left: (geometry.x * scale_x - w / 2.0) as f32,
        top: (geometry.y * scale_y - h / 2.0) as f32,
        width: w as f32,
        height: h as f32,
    })
}

/// Multiply by the user scale and round half away from zero.
pub fn apply_export_scale(geometry: Geometry, scale: ExportScale) -> ScaledBox {
    ScaledBox {
        x: (geometry.x * scale.x).round() as i64,
        y: (geometry.y * scale.y).round() as i64,
        w: (geometry.w * scale.x).round() as i64,
        h: (geometry.h * scale.y).round() as i64,
    }
}

/// Canvas size minus the fixed padding, never negative.
pub fn available_area(container: Size) -> Size {
    Size {
        width: (container.width - VIEWPORT_PADDING).max(0.0),
        height: (container.height - VIEWPORT_PADDING).max(0.0),
    }
}

/// Largest whole-pixel size that fits `original` into `available` without upscaling.
pub fn fit_to_viewport(available: Size, original: Size) -> Option<Size> {
    if original.is_empty() {
        return None;
    }
    let ow = original.width as f64;
    let oh = original.height as f64;
    let scale = (available.width as f64 / ow)
        .min(available.height as f64 / oh)
        .min(1.0)
        .max(0.0);

    Some(Size {
        width: (ow * scale).floor() as f32,
        height: (oh * scale).floor() as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn converts_drag_to_center_geometry() {
        let rect = ScreenRect::from_corners(
            ScreenPoint::new(100.0, 100.0),
            ScreenPoint::new(200.0, 180.0),
        );
        let g = screen_rect_to_image_box(rect, Size::new(500.0, 400.0), Size::new(1000.0, 800.0))
            .unwrap();
        assert!((g.x - 300.0).abs() < EPS);
        assert!((g.y - 280.0).abs() < EPS);
        assert!((g.w - 200.0).abs() < EPS);
        assert!((g.h - 160.0).abs() < EPS);
    }

    #[test]
    fn conversion_keeps_fractions() {
        let rect = ScreenRect::new(10.0, 10.0, 7.0, 9.0);
        let g = screen_rect_to_image_box(rect, Size::new(300.0, 300.0), Size::new(1000.0, 1000.0))
            .unwrap();
        assert!((g.w - 70.0 / 3.0).abs() < EPS);
        assert!(g.w.fract() != 0.0);
    }

    #[test]
    fn conversion_without_image_is_noop() {
        let rect = ScreenRect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(screen_rect_to_image_box(rect, Size::new(100.0, 100.0), Size::default()), None);
        assert_eq!(screen_rect_to_image_box(rect, Size::default(), Size::new(100.0, 100.0)), None);
        assert_eq!(
            image_box_to_screen_rect(Geometry::default(), Size::default(), Size::default()),
            None
        );
    }

    #[test]
    fn inverse_reconstructs_screen_rect() {
        let displayed = Size::new(733.0, 412.0);
        let original = Size::new(4032.0, 2268.0);
        for rect in [
            ScreenRect::new(0.0, 0.0, 5.0, 5.0),
            ScreenRect::new(12.5, 40.25, 300.0, 120.75),
            ScreenRect::new(700.0, 400.0, 33.0, 12.0),
        ] {
            let g = screen_rect_to_image_box(rect, displayed, original).unwrap();
            let back = image_box_to_screen_rect(g, displayed, original).unwrap();
            assert!((back.left - rect.left).abs() < 1e-3, "{back:?} vs {rect:?}");
            assert!((back.top - rect.top).abs() < 1e-3);
            assert!((back.width - rect.width).abs() < 1e-3);
            assert!((back.height - rect.height).abs() < 1e-3);
        }
    }

    #[test]
    fn export_scale_rounds_half_away_from_zero() {
        let g = Geometry {
            x: 100.4,
            y: 50.6,
            w: 20.2,
            h: 10.5,
        };
        assert_eq!(
            apply_export_scale(g, ExportScale::default()),
            ScaledBox {
                x: 100,
                y: 51,
                w: 20,
                h: 11
            }
        );

        let neg = Geometry {
            x: -2.5,
            y: 2.5,
            w: 0.0,
            h: 0.0,
        };
        let s = apply_export_scale(neg, ExportScale::default());
        assert_eq!((s.x, s.y), (-3, 3));
    }

    #[test]
    fn export_scale_applies_per_axis() {
        let g = Geometry {
            x: 100.0,
            y: 100.0,
            w: 10.0,
            h: 10.0,
        };
        let s = apply_export_scale(g, ExportScale::new(0.5, 3.0));
        assert_eq!(
            s,
            ScaledBox {
                x: 50,
                y: 300,
                w: 5,
                h: 30
            }
        );
    }

    #[test]
    fn scale_text_falls_back_to_one() {
        assert_eq!(ExportScale::parse("", "abc"), ExportScale::default());
        assert_eq!(ExportScale::parse("0", "NaN"), ExportScale::default());
        assert_eq!(ExportScale::parse("inf", "."), ExportScale::default());
        assert_eq!(ExportScale::parse("px2", "-0"), ExportScale::default());
        assert_eq!(ExportScale::parse(" 2.5 ", "0.25"), ExportScale::new(2.5, 0.25));
    }

    #[test]
    fn scale_text_reads_leading_number() {
        assert_eq!(ExportScale::parse("2px", " .5x"), ExportScale::new(2.0, 0.5));
        assert_eq!(ExportScale::parse("1e2e", "-3.0abc"), ExportScale::new(100.0, -3.0));
        assert_eq!(ExportScale::parse("4.", "7e"), ExportScale::new(4.0, 7.0));

        let s = ExportScale::parse("Infinity", "-Infinityish");
        assert_eq!(s.x, f64::INFINITY);
        assert_eq!(s.y, f64::NEG_INFINITY);
    }

    #[test]
    fn fit_never_upscales() {
        let fitted = fit_to_viewport(Size::new(2000.0, 2000.0), Size::new(640.0, 480.0)).unwrap();
        assert_eq!(fitted, Size::new(640.0, 480.0));
    }

    #[test]
    fn fit_uses_tighter_axis_and_floors() {
        let fitted = fit_to_viewport(Size::new(500.0, 400.0), Size::new(1000.0, 800.0)).unwrap();
        assert_eq!(fitted, Size::new(500.0, 400.0));

        let fitted = fit_to_viewport(Size::new(333.0, 1000.0), Size::new(1000.0, 700.0)).unwrap();
        assert_eq!(fitted, Size::new(333.0, 233.0));
    }

    #[test]
    fn fit_without_image_is_noop() {
        assert_eq!(fit_to_viewport(Size::new(500.0, 400.0), Size::new(0.0, 10.0)), None);
    }

    #[test]
    fn available_area_subtracts_padding() {
        assert_eq!(available_area(Size::new(550.0, 450.0)), Size::new(500.0, 400.0));
        assert_eq!(available_area(Size::new(20.0, 60.0)), Size::new(0.0, 10.0));
    }

    #[test]
    fn clamp_keeps_point_inside() {
        let bounds = ScreenRect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(bounds.clamp(ScreenPoint::new(-5.0, 70.0)), ScreenPoint::new(0.0, 50.0));
        assert_eq!(bounds.clamp(ScreenPoint::new(30.0, 20.0)), ScreenPoint::new(30.0, 20.0));
    }
}
