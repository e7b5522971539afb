//! Slide geometry in centimetres
//!
//! Everything here is pure arithmetic: no files, no document types. The deck
//! writer converts to EMU only when emitting shapes.

/// EMU (English Metric Units) per centimetre, the OOXML coordinate unit
pub const EMU_PER_CM: f64 = 360_000.0;

pub const CANVAS_WIDTH_CM: f64 = 33.87;
pub const CANVAS_HEIGHT_CM: f64 = 19.05;

/// Height every marker image is scaled to
pub const MARKER_HEIGHT_CM: f64 = 8.61;

// Condition grid, authored at full size then scaled by 0.7
const GRID_SCALE: f64 = 0.7;
pub const LABEL_SPACING_CM: f64 = 1.33 * GRID_SCALE;
pub const CONNECTOR_LENGTH_CM: f64 = 1.1 * GRID_SCALE;
pub const LABEL_WIDTH_CM: f64 = 1.5 * GRID_SCALE;
pub const LABEL_HEIGHT_CM: f64 = 0.3 * GRID_SCALE;
pub const LABEL_TOP_CM: f64 = 15.0 * GRID_SCALE;
pub const CONNECTOR_Y_CM: f64 = LABEL_TOP_CM - 0.1 * GRID_SCALE;

/// Converts centimetres to whole EMU
pub fn cm_to_emu(cm: f64) -> i64 {
    (cm * EMU_PER_CM).round() as i64
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_size(left: f64, top: f64, size: Size) -> Self {
        Rect::new(left, top, size.width, size.height)
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Straight line segment from `(x1, y1)` to `(x2, y2)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Line {
    pub fn horizontal(x: f64, y: f64, length: f64) -> Self {
        Line {
            x1: x,
            y1: y,
            x2: x + length,
            y2: y,
        }
    }

    pub fn length(&self) -> f64 {
        ((self.x2 - self.x1).powi(2) + (self.y2 - self.y1).powi(2)).sqrt()
    }
}

/// The fixed slide area all placement is computed against
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas {
            width: CANVAS_WIDTH_CM,
            height: CANVAS_HEIGHT_CM,
        }
    }
}

impl Canvas {
    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    /// Places `size` so its center is the canvas center
    pub fn center(&self, size: Size) -> Rect {
        Rect::from_size(
            (self.width - size.width) / 2.0,
            (self.height - size.height) / 2.0,
            size,
        )
    }

    /// Places `size` flush with the bottom-right corner
    pub fn pin_bottom_right(&self, size: Size) -> Rect {
        Rect::from_size(self.width - size.width, self.height - size.height, size)
    }
}

/// Scales pixel dimensions to a fixed height, keeping the aspect ratio
///
/// # Arguments
/// * `width_px`, `height_px` - Pixel size, `height_px` must be non-zero
/// * `target_height` - Height of the result in centimetres
///
/// # Examples
/// ```
/// use westernizer::geometry::fit_height;
///
/// let size = fit_height(2000, 1000, 19.05);
/// assert_eq!(size.height, 19.05);
/// assert!((size.width - 38.1).abs() < 1e-9);
/// ```
pub fn fit_height(width_px: u32, height_px: u32, target_height: f64) -> Size {
    let aspect_ratio = width_px as f64 / height_px as f64;
    Size {
        width: target_height * aspect_ratio,
        height: target_height,
    }
}

/// Main gel image: full canvas height, centered both ways
pub fn place_main_image(canvas: &Canvas, width_px: u32, height_px: u32) -> Rect {
    canvas.center(fit_height(width_px, height_px, canvas.height))
}

/// Marker image: fixed height, pinned to the bottom-right corner
pub fn place_marker_image(canvas: &Canvas, width_px: u32, height_px: u32) -> Rect {
    canvas.pin_bottom_right(fit_height(width_px, height_px, MARKER_HEIGHT_CM))
}

/// Connector and text box for one condition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelSlot {
    pub index: usize,
    pub connector: Line,
    pub text_rect: Rect,
}

/// Left edge of the connector for label `index` out of `count`
pub fn label_x(canvas: &Canvas, count: usize, index: usize) -> f64 {
    canvas.center_x() - (count as f64 * LABEL_SPACING_CM) / 2.0 + index as f64 * LABEL_SPACING_CM
}

/// Evenly spaced condition slots across the canvas center
///
/// Slot `i` starts its connector at `center - count*S/2 + i*S` and the text
/// box sits below it, shifted so it straddles the connector.
pub fn condition_grid(canvas: &Canvas, count: usize) -> Vec<LabelSlot> {
    let text_offset = (CONNECTOR_LENGTH_CM - LABEL_WIDTH_CM).abs() / 2.0;
    (0..count)
        .map(|index| {
            let x = label_x(canvas, count, index);
            LabelSlot {
                index,
                connector: Line::horizontal(x, CONNECTOR_Y_CM, CONNECTOR_LENGTH_CM),
                text_rect: Rect::new(x - text_offset, LABEL_TOP_CM, LABEL_WIDTH_CM, LABEL_HEIGHT_CM),
            }
        })
        .collect()
}

/// Text for a condition label; numbers typed as `5.0` show as `5`
pub fn condition_display_text(text: &str) -> &str {
    text.strip_suffix(".0").unwrap_or(text)
}

/// Filename caption and kDa axis marker, identical on every content slide
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Annotations {
    pub caption: Rect,
    pub kda_label: Rect,
    pub kda_tick: Line,
}

impl Default for Annotations {
    fn default() -> Self {
        Annotations {
            caption: Rect::new(0.0, 0.0, 24.0, 2.0),
            kda_label: Rect::new(0.0, 10.0, 3.0, 1.0),
            kda_tick: Line::horizontal(3.0, 10.5, 1.0),
        }
    }
}

/// Placement for one content slide
#[derive(Clone, Debug, PartialEq)]
pub struct SlideGeometryPlan {
    pub image: Rect,
    pub marker: Option<Rect>,
    /// Present only when the condition grid is drawn on this slide
    pub labels: Option<Vec<LabelSlot>>,
    pub annotations: Annotations,
}

/// Computes the full placement for one gel slide
///
/// # Arguments
/// * `canvas` - Slide area
/// * `image_px` - Gel image pixel size `(width, height)`
/// * `marker_px` - Marker image pixel size, when an overlay is placed
/// * `condition_count` - Number of labels, `None` to leave the grid off
pub fn plan_slide(
    canvas: &Canvas,
    image_px: (u32, u32),
    marker_px: Option<(u32, u32)>,
    condition_count: Option<usize>,
) -> SlideGeometryPlan {
    SlideGeometryPlan {
        image: place_main_image(canvas, image_px.0, image_px.1),
        marker: marker_px.map(|(w, h)| place_marker_image(canvas, w, h)),
        labels: condition_count.map(|count| condition_grid(canvas, count)),
        annotations: Annotations::default(),
    }
}
