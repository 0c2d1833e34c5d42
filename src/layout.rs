//! Layout Settings
//!
//! Page geometry, type sizes and thumbnail parameters for the rendered document.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const POINTS_PER_INCH: f32 = 72.0;

/// Where the layout values came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutAuthority {
    /// Built-in defaults
    System,
    /// User-provided overrides (with validation)
    User,
}

impl Default for LayoutAuthority {
    fn default() -> Self {
        Self::System
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    Letter,
    A4,
}

impl PageSize {
    /// Width and height in PDF points.
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::Letter
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "letter" => Ok(PageSize::Letter),
            "a4" => Ok(PageSize::A4),
            other => Err(format!("Unknown page size '{}', expected letter or a4", other)),
        }
    }
}

/// Font size and line height of one text style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub size: f32,
    pub leading: f32,
    pub space_after: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub authority: LayoutAuthority,
    pub page_size: PageSize,
    pub margin_pt: f32,
    pub title: TextStyle,
    pub label: TextStyle,
    pub skills: TextStyle,
    /// Thumbnails are shrunk to fit a square of this many pixels.
    pub thumbnail_box_px: u32,
    /// Side of the square the thumbnail is drawn into on the page.
    pub thumbnail_display_pt: f32,
    pub jpeg_quality: u8,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            authority: LayoutAuthority::System,
            page_size: PageSize::Letter,
            margin_pt: POINTS_PER_INCH,
            title: TextStyle { size: 20.0, leading: 24.0, space_after: 12.0 },
            label: TextStyle { size: 12.0, leading: 14.4, space_after: 2.0 },
            skills: TextStyle { size: 10.0, leading: 12.0, space_after: 12.0 },
            thumbnail_box_px: 200,
            thumbnail_display_pt: 2.0 * POINTS_PER_INCH,
            jpeg_quality: 85,
        }
    }
}

impl LayoutSettings {
    /// Create from user overrides with validation. `None` keeps the default.
    pub fn from_user(page_size: Option<&str>, jpeg_quality: Option<u8>) -> Result<Self, String> {
        let mut settings = Self::default();
        if page_size.is_none() && jpeg_quality.is_none() {
            return Ok(settings);
        }

        if let Some(page_size) = page_size {
            settings.page_size = page_size.parse()?;
        }
        if let Some(quality) = jpeg_quality {
            if !(1..=100).contains(&quality) {
                return Err("JPEG quality must be between 1 and 100".to_string());
            }
            settings.jpeg_quality = quality;
        }
        settings.authority = LayoutAuthority::User;
        Ok(settings)
    }

    /// Horizontal space available to text.
    pub fn column_width(&self) -> f32 {
        self.page_size.dimensions().0 - 2.0 * self.margin_pt
    }
}
