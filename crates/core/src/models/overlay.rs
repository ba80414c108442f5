//! Overlay placement for CTA buttons and countdown timers

use serde::{Deserialize, Serialize};

/// Where an overlay sits relative to the video surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayPosition {
    Above,
    Below,
    Left,
    Right,
}

/// Stacking direction implied by a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutAxis {
    /// Stacked above or below the video: overlays flow horizontally
    Horizontal,
    /// Docked left or right of the video: overlays flow vertically
    Vertical,
}

impl OverlayPosition {
    /// Layout-selection for the rendering layer. Concurrent overlays at the
    /// same position stack along this axis.
    pub fn layout_axis(self) -> LayoutAxis {
        match self {
            OverlayPosition::Above | OverlayPosition::Below => LayoutAxis::Horizontal,
            OverlayPosition::Left | OverlayPosition::Right => LayoutAxis::Vertical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OverlayPosition::Above => "above",
            OverlayPosition::Below => "below",
            OverlayPosition::Left => "left",
            OverlayPosition::Right => "right",
        }
    }

    /// Parse a stored position, defaulting to `Below` for unknown values
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "above" => OverlayPosition::Above,
            "left" => OverlayPosition::Left,
            "right" => OverlayPosition::Right,
            _ => OverlayPosition::Below,
        }
    }
}
