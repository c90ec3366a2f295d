//=========================================================================
// Canvas
//=========================================================================
//
// Recording draw context handed to custom layers by `SimHost`.
//
// Drawing calls are captured as `DrawCommand`s instead of being
// rasterized, so tests can assert on what a frame drew. Anything drawn
// with `GColor::Clear` is dropped, matching a real display.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::platform::geometry::{GColor, GPoint, GRect};
use crate::platform::{SystemFont, TextAlignment};

//=== DrawCommand =========================================================

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    FillRect { rect: GRect, color: GColor },
    DrawRect { rect: GRect, color: GColor },
    FillCircle { center: GPoint, radius: u16, color: GColor },
    DrawLine { from: GPoint, to: GPoint, color: GColor },
    DrawPixel { point: GPoint, color: GColor },
    DrawText {
        text: String,
        rect: GRect,
        color: GColor,
        font: SystemFont,
        alignment: TextAlignment,
    },
}

//=== Canvas ==============================================================

/// Draw context for one layer during one redraw pass.
///
/// Coordinates are relative to the layer's own bounds.
#[derive(Debug, Clone)]
pub struct Canvas {
    bounds: GRect,
    fill_color: GColor,
    stroke_color: GColor,
    text_color: GColor,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    /// Creates an empty canvas. Fill and stroke default to black, text to white.
    pub fn new(bounds: GRect) -> Self {
        Self {
            bounds,
            fill_color: GColor::Black,
            stroke_color: GColor::Black,
            text_color: GColor::White,
            commands: Vec::new(),
        }
    }

    /// Returns the layer bounds, origin at (0, 0).
    pub fn bounds(&self) -> GRect {
        GRect::new(0, 0, self.bounds.size.w, self.bounds.size.h)
    }

    //--- State ------------------------------------------------------------

    pub fn set_fill_color(&mut self, color: GColor) {
        self.fill_color = color;
    }

    pub fn set_stroke_color(&mut self, color: GColor) {
        self.stroke_color = color;
    }

    pub fn set_text_color(&mut self, color: GColor) {
        self.text_color = color;
    }

    //--- Drawing ----------------------------------------------------------

    pub fn fill_rect(&mut self, rect: GRect) {
        let color = self.fill_color;
        self.record(color, DrawCommand::FillRect { rect, color });
    }

    pub fn draw_rect(&mut self, rect: GRect) {
        let color = self.stroke_color;
        self.record(color, DrawCommand::DrawRect { rect, color });
    }

    pub fn fill_circle(&mut self, center: GPoint, radius: u16) {
        let color = self.fill_color;
        self.record(color, DrawCommand::FillCircle { center, radius, color });
    }

    pub fn draw_line(&mut self, from: GPoint, to: GPoint) {
        let color = self.stroke_color;
        self.record(color, DrawCommand::DrawLine { from, to, color });
    }

    pub fn draw_pixel(&mut self, point: GPoint) {
        let color = self.stroke_color;
        self.record(color, DrawCommand::DrawPixel { point, color });
    }

    pub fn draw_text(&mut self, text: &str, font: SystemFont, rect: GRect, alignment: TextAlignment) {
        let color = self.text_color;
        self.record(
            color,
            DrawCommand::DrawText {
                text: text.to_owned(),
                rect,
                color,
                font,
                alignment,
            },
        );
    }

    //--- Inspection -------------------------------------------------------

    /// Returns the commands recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Consumes the canvas, returning its recorded commands.
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    fn record(&mut self, color: GColor, command: DrawCommand) {
        if color != GColor::Clear {
            self.commands.push(command);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::geometry::SCREEN_BOUNDS;

    #[test]
    fn bounds_are_layer_relative() {
        let canvas = Canvas::new(GRect::new(20, 30, 50, 60));
        assert_eq!(canvas.bounds(), GRect::new(0, 0, 50, 60));
    }

    #[test]
    fn records_commands_in_order() {
        let mut canvas = Canvas::new(SCREEN_BOUNDS);
        canvas.set_fill_color(GColor::White);
        canvas.fill_rect(GRect::new(0, 0, 10, 10));
        canvas.draw_line(GPoint::new(0, 0), GPoint::new(5, 5));

        assert_eq!(
            canvas.commands(),
            &[
                DrawCommand::FillRect {
                    rect: GRect::new(0, 0, 10, 10),
                    color: GColor::White,
                },
                DrawCommand::DrawLine {
                    from: GPoint::new(0, 0),
                    to: GPoint::new(5, 5),
                    color: GColor::Black,
                },
            ]
        );
    }

    #[test]
    fn clear_color_draws_nothing() {
        let mut canvas = Canvas::new(SCREEN_BOUNDS);
        canvas.set_fill_color(GColor::Clear);
        canvas.fill_rect(SCREEN_BOUNDS);
        canvas.fill_circle(GPoint::new(10, 10), 4);
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn text_uses_text_color() {
        let mut canvas = Canvas::new(SCREEN_BOUNDS);
        canvas.set_text_color(GColor::Black);
        canvas.draw_text("Hi", SystemFont::Gothic18Bold, SCREEN_BOUNDS, TextAlignment::Center);

        match canvas.into_commands().as_slice() {
            [DrawCommand::DrawText { text, color, .. }] => {
                assert_eq!(text, "Hi");
                assert_eq!(*color, GColor::Black);
            }
            other => panic!("Expected one text command, got {:?}", other),
        }
    }
}
