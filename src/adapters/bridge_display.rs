//! Display adapter that forwards every draw over a [`CommandBridge`].
//!
//! Lines, circles, pixels and text map one-to-one onto native bridge
//! commands.  The dispatcher has no rectangle primitive, so rectangles are
//! rasterised into a local mirror of the matrix and pushed as a full image.

use log::warn;

use crate::app::ports::{CommandBridge, DisplaySink};
use crate::bridge::{BridgeCommand, Colour};
use crate::error::{BridgeError, RenderError};
use crate::frame::{RenderFrame, Rgb, Shape};

#[derive(Clone)]
pub struct BridgeDisplay<B> {
    bridge: B,
    mirror: RenderFrame,
}

impl<B: CommandBridge> BridgeDisplay<B> {
    pub fn new(bridge: B) -> Self {
        Self {
            bridge,
            mirror: RenderFrame::new(),
        }
    }

    /// Last image this adapter believes is on the matrix.
    pub fn mirror(&self) -> &RenderFrame {
        &self.mirror
    }

    async fn forward(&mut self, command: BridgeCommand) -> Result<(), RenderError> {
        let name = command.name();
        let response = self.bridge.send(command).await.map_err(render_error)?;
        response.into_result().map(|_| ()).map_err(|e| {
            warn!("Display command {} refused: {}", name, e);
            render_error(e)
        })
    }

    async fn push_mirror(&mut self) -> Result<(), RenderError> {
        let pixels = self.mirror.to_pixels();
        self.forward(BridgeCommand::SetImage { pixels }).await
    }
}

fn render_error(e: BridgeError) -> RenderError {
    match e {
        BridgeError::Disconnected => RenderError::Disconnected,
        other => RenderError::Bridge(other),
    }
}

impl<B: CommandBridge> DisplaySink for BridgeDisplay<B> {
    async fn set_image(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        self.mirror = frame.clone();
        self.push_mirror().await
    }

    async fn set_pixel(&mut self, x: usize, y: usize, colour: Rgb) -> Result<(), RenderError> {
        if !self.mirror.set(x, y, colour) {
            return Err(RenderError::Rejected("pixel outside the matrix"));
        }
        self.forward(BridgeCommand::DrawPixel {
            x: x as i32,
            y: y as i32,
            colour: colour.into(),
        })
        .await
    }

    async fn clear(&mut self) -> Result<(), RenderError> {
        self.mirror = RenderFrame::new();
        self.forward(BridgeCommand::ClearMatrix).await
    }

    async fn draw_shape(&mut self, shape: &Shape) -> Result<(), RenderError> {
        self.mirror.draw(shape);
        let command = match shape {
            Shape::Rect { .. } => return self.push_mirror().await,
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                colour,
            } => BridgeCommand::DrawLine {
                x1: *x1,
                y1: *y1,
                x2: *x2,
                y2: *y2,
                colour: Colour::from(*colour),
            },
            Shape::Circle {
                x,
                y,
                radius,
                colour,
            } => BridgeCommand::DrawCircle {
                x: *x,
                y: *y,
                radius: *radius,
                colour: Colour::from(*colour),
            },
            Shape::Text { x, y, text, colour } => BridgeCommand::DrawText {
                x: *x,
                y: *y,
                text: text.as_str().into(),
                colour: Colour::from(*colour),
            },
        };
        self.forward(command).await
    }
}
