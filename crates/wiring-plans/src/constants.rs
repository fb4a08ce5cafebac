//! Shared constants for the plan pipeline

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Cropping
// =============================================================================

/// Resource name of the embedded source page on a cropped page
pub const CROP_XOBJECT_NAME: &str = "Plan";

// =============================================================================
// File Names
// =============================================================================

/// Default glob for locating a tab's plan PDF; `{tab}` is replaced by the tab
pub const DEFAULT_PDF_FILENAME_PATTERN: &str = "*{tab}*.pdf";

/// Placeholder substituted in filename patterns
pub const TAB_PLACEHOLDER: &str = "{tab}";
