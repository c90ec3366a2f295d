//=========================================================================
// Geometry & Color
//=========================================================================
//
// Integer screen geometry in watch display units (top-left origin) and
// the small color palette the host understands.
//
//=========================================================================

//=== Screen Constants ====================================================

/// Width of the watch display.
pub const SCREEN_WIDTH: i16 = 144;

/// Height of the watch display.
pub const SCREEN_HEIGHT: i16 = 168;

/// Full-screen bounds, also the default engine surface frame.
pub const SCREEN_BOUNDS: GRect = GRect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);

//=== GPoint ==============================================================

/// A point in display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GPoint {
    pub x: i16,
    pub y: i16,
}

impl GPoint {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

//=== GSize ===============================================================

/// A width/height pair in display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GSize {
    pub w: i16,
    pub h: i16,
}

impl GSize {
    pub const fn new(w: i16, h: i16) -> Self {
        Self { w, h }
    }
}

//=== GRect ===============================================================

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GRect {
    pub origin: GPoint,
    pub size: GSize,
}

impl GRect {
    pub const fn new(x: i16, y: i16, w: i16, h: i16) -> Self {
        Self {
            origin: GPoint::new(x, y),
            size: GSize::new(w, h),
        }
    }

    /// Returns `true` if `point` lies inside the rectangle (right/bottom exclusive).
    pub const fn contains(&self, point: GPoint) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x + self.size.w
            && point.y < self.origin.y + self.size.h
    }

    /// Returns `true` if the rectangles overlap.
    pub const fn intersects(&self, other: &GRect) -> bool {
        self.origin.x < other.origin.x + other.size.w
            && other.origin.x < self.origin.x + self.size.w
            && self.origin.y < other.origin.y + other.size.h
            && other.origin.y < self.origin.y + self.size.h
    }

    /// Returns `true` if either dimension is zero or negative.
    pub const fn is_empty(&self) -> bool {
        self.size.w <= 0 || self.size.h <= 0
    }
}

//=== GColor ==============================================================

/// Display colors.
///
/// `Clear` draws nothing and is used for transparent text backgrounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GColor {
    #[default]
    Clear,
    Black,
    White,
    Rgb { r: u8, g: u8, b: u8 },
}

//=========================================================================
// Unit Tests
//=========================================================================
