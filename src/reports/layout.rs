//! Page layout geometry
//!
//! Top-down flow layout for fixed-height bands. All values are millimetres;
//! `LayoutCursor` tracks the distance from the top edge and converts it to
//! the bottom-up coordinates PDF drawing expects.

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

const MM_PER_PT: f32 = 0.352_778;
const MM_PER_INCH: f32 = 25.4;

/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    page_height: f32,
    top_margin: f32,
    bottom_margin: f32,
    offset: f32,
}

impl LayoutCursor {
    pub fn new(page_height: f32, top_margin: f32, bottom_margin: f32) -> Self {
        Self {
            page_height,
            top_margin,
            bottom_margin,
            offset: top_margin,
        }
    }

    /// Cursor for an A4 portrait page starting at the very top
    pub fn a4(bottom_margin: f32) -> Self {
        Self::new(A4_HEIGHT_MM, 0.0, bottom_margin)
    }

    /// Distance from the top edge to the next free band
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn advance(&mut self, height: f32) {
        self.offset += height;
    }

    /// PDF y of the cursor position
    pub fn y(&self) -> f32 {
        self.page_height - self.offset
    }

    /// PDF y of the bottom edge of a band of `height` placed at the cursor
    pub fn band_bottom(&self, height: f32) -> f32 {
        self.page_height - self.offset - height
    }

    pub fn remaining(&self) -> f32 {
        self.page_height - self.bottom_margin - self.offset
    }

    pub fn fits(&self, height: f32) -> bool {
        height <= self.remaining()
    }

    /// Restart at the top margin of a fresh page
    pub fn new_page(&mut self) {
        self.offset = self.top_margin;
    }

    pub fn with_top_margin(mut self, top_margin: f32) -> Self {
        self.top_margin = top_margin;
        self
    }
}

/// Width of each of `columns` equal columns separated by `gap`
pub fn column_width(content_width: f32, columns: usize, gap: f32) -> f32 {
    if columns == 0 {
        return 0.0;
    }
    (content_width - gap * (columns - 1) as f32) / columns as f32
}

/// Left edge of column `index`: `margin + index * (width + gap)`
pub fn column_x(margin: f32, index: usize, width: f32, gap: f32) -> f32 {
    margin + index as f32 * (width + gap)
}

/// Placement size of an image scaled into a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedImage {
    pub width: f32,
    pub height: f32,
    /// DPI that renders the source pixels at this size
    pub dpi: f32,
}

/// Scale `px_width x px_height` to `max_width`, preserving aspect ratio,
/// then shrink further if the height exceeds `max_height`
pub fn fit_image(px_width: u32, px_height: u32, max_width: f32, max_height: f32) -> FittedImage {
    let px_width = px_width.max(1) as f32;
    let px_height = px_height.max(1) as f32;
    let aspect = px_height / px_width;

    let mut width = max_width;
    let mut height = width * aspect;
    if height > max_height {
        height = max_height;
        width = height / aspect;
    }

    FittedImage {
        width,
        height,
        dpi: px_width * MM_PER_INCH / width,
    }
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}

/// Approximate rendered width of `text` in a builtin sans font
pub fn text_width(text: &str, font_size: f32) -> f32 {
    pt_to_mm(text.chars().count() as f32 * font_size * AVG_GLYPH_WIDTH)
}

/// Left x that centers `text` on a page of `page_width`
pub fn centered_x(text: &str, font_size: f32, page_width: f32) -> f32 {
    ((page_width - text_width(text, font_size)) / 2.0).max(0.0)
}
