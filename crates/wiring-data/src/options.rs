use crate::types::{DataError, Result};

const MM_PER_PT: f32 = 25.4 / 72.0;

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}

/// A3 in landscape, width by height
const A3_LANDSCAPE_MM: (f32, f32) = (420.0, 297.0);

/// Page geometry and type sizes for a room's data pages
#[derive(Debug, Clone)]
pub struct DataPageOptions {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub title_font_size_pt: f32,
    pub heading_font_size_pt: f32,
    pub body_font_size_pt: f32,
    pub footer_font_size_pt: f32,
    pub cell_padding_mm: f32,
}

impl Default for DataPageOptions {
    fn default() -> Self {
        let (width, height) = A3_LANDSCAPE_MM;
        Self {
            page_width_mm: width,
            page_height_mm: height,
            margin_mm: 25.4,
            title_font_size_pt: 16.5,
            heading_font_size_pt: 12.5,
            body_font_size_pt: 8.25,
            footer_font_size_pt: 8.25,
            cell_padding_mm: 2.1,
        }
    }
}

impl DataPageOptions {
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    /// Distance from the top edge below which body content may not go
    pub fn body_bottom_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm
    }

    pub fn line_height_mm(&self, font_size_pt: f32) -> f32 {
        pt_to_mm(font_size_pt) * 1.2
    }

    /// Height of a table row whose tallest cell wraps to `lines` lines
    pub fn row_height_mm(&self, lines: usize) -> f32 {
        lines.max(1) as f32 * self.line_height_mm(self.body_font_size_pt)
            + 2.0 * self.cell_padding_mm
    }

    pub fn title_height_mm(&self) -> f32 {
        self.line_height_mm(self.title_font_size_pt) * 1.6
    }

    pub fn heading_height_mm(&self) -> f32 {
        self.line_height_mm(self.heading_font_size_pt) * 1.8
    }

    pub fn notice_height_mm(&self) -> f32 {
        self.line_height_mm(self.body_font_size_pt) * 1.5
    }

    pub fn validate(&self) -> Result<()> {
        if self.content_width_mm() <= 0.0 {
            return Err(DataError::InvalidOptions(format!(
                "margins of {}mm leave no room across a {}mm page",
                self.margin_mm, self.page_width_mm
            )));
        }
        let needed = self.title_height_mm() + 2.0 * self.row_height_mm(1);
        if self.body_bottom_mm() - self.margin_mm < needed {
            return Err(DataError::InvalidOptions(format!(
                "a {}mm page is too short for a title and a table row",
                self.page_height_mm
            )));
        }
        if self.body_font_size_pt <= 0.0 || self.cell_padding_mm < 0.0 {
            return Err(DataError::InvalidOptions(
                "font sizes must be positive and padding non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
