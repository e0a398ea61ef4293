//! Software LED matrix behind a [`BridgeEndpoint`].
//!
//! [`MatrixSimulator`] plays the dispatcher's role for the display
//! commands: it applies each one to a [`SharedFramebuffer`] and answers
//! the way the real matrix service does.  Audio commands are answered
//! with an error status.

use std::collections::HashMap;

use log::{debug, info};
use serde_json::json;

use super::framebuffer::{Framebuffer, SharedFramebuffer};
use crate::bridge::{BridgeCommand, BridgeEndpoint, BridgeResponse};
use crate::error::RenderError;
use crate::frame::{RenderFrame, Shape};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimSprite {
    pub width: u16,
    pub height: u16,
    /// Row-major RGB triplets; empty until the first update.
    pub frame_data: Vec<u8>,
    /// Animation rate while animating.
    pub fps: Option<u8>,
}

pub struct MatrixSimulator {
    display: SharedFramebuffer,
    sprites: HashMap<String, SimSprite>,
    next_sprite: u32,
    handled: u64,
}

impl MatrixSimulator {
    pub fn new(display: SharedFramebuffer) -> Self {
        Self {
            display,
            sprites: HashMap::new(),
            next_sprite: 1,
            handled: 0,
        }
    }

    pub fn display(&self) -> &SharedFramebuffer {
        &self.display
    }

    pub fn sprite(&self, id: &str) -> Option<&SimSprite> {
        self.sprites.get(id)
    }

    /// Commands answered so far.
    pub fn handled(&self) -> u64 {
        self.handled
    }

    /// Serve requests forever.  Run it next to the client with
    /// `futures_lite::future::or` so it ends with the client.
    pub async fn run(&mut self, endpoint: &BridgeEndpoint) {
        info!("Matrix simulator serving");
        loop {
            let request = endpoint.receive().await;
            let response = self.handle(request.command);
            endpoint.reply(request.id, response).await;
        }
    }

    /// Apply one command and build its response.
    pub fn handle(&mut self, command: BridgeCommand) -> BridgeResponse {
        self.handled += 1;
        debug!("simulator <- {}", command.name());
        match command {
            BridgeCommand::SetBackground(colour) => self.draw(|fb| fb.fill(colour.into())),
            BridgeCommand::ClearMatrix => self.draw(Framebuffer::blank),
            BridgeCommand::SetBrightness { brightness } => {
                self.display.with(|fb| fb.set_brightness(brightness));
                BridgeResponse::ok_with(json!({ "brightness": brightness.min(100) }))
            }
            BridgeCommand::DrawPixel { x, y, colour } => {
                if x < 0 || y < 0 {
                    return BridgeResponse::error("pixel outside the matrix");
                }
                self.draw(|fb| fb.plot(x as usize, y as usize, colour.into()))
            }
            BridgeCommand::DrawCircle {
                x,
                y,
                radius,
                colour,
            } => self.draw(|fb| {
                fb.shape(&Shape::Circle {
                    x,
                    y,
                    radius,
                    colour: colour.into(),
                })
            }),
            BridgeCommand::DrawLine {
                x1,
                y1,
                x2,
                y2,
                colour,
            } => self.draw(|fb| {
                fb.shape(&Shape::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    colour: colour.into(),
                })
            }),
            BridgeCommand::DrawText { x, y, text, colour } => {
                self.draw(|fb| fb.shape(&Shape::text(x, y, &text, colour.into())))
            }
            BridgeCommand::SetImage { pixels } => match RenderFrame::from_pixels(&pixels) {
                Some(frame) => self.draw(|fb| fb.replace(&frame)),
                None => BridgeResponse::error(format!("image has {} pixels, expected 4096", pixels.len())),
            },
            BridgeCommand::CreateSprite { width, height } => self.create_sprite(width, height),
            BridgeCommand::DrawSprite { sprite_id, x, y } => self.draw_sprite(&sprite_id, x, y),
            BridgeCommand::UpdateSprite {
                sprite_id,
                frame_data,
            } => self.with_sprite(&sprite_id, |sprite| {
                let expected = usize::from(sprite.width) * usize::from(sprite.height) * 3;
                if frame_data.len() != expected {
                    return Err(format!(
                        "frame has {} bytes, expected {}",
                        frame_data.len(),
                        expected
                    ));
                }
                sprite.frame_data = frame_data;
                Ok(())
            }),
            BridgeCommand::DeleteSprite { sprite_id } => match self.sprites.remove(&sprite_id) {
                Some(_) => BridgeResponse::ok(),
                None => unknown_sprite(&sprite_id),
            },
            BridgeCommand::StartAnimation { sprite_id, fps } => {
                self.with_sprite(&sprite_id, |sprite| {
                    sprite.fps = Some(fps);
                    Ok(())
                })
            }
            BridgeCommand::StopAnimation { sprite_id } => self.with_sprite(&sprite_id, |sprite| {
                sprite.fps = None;
                Ok(())
            }),
            other => BridgeResponse::error(format!("{} is not handled by the matrix", other.name())),
        }
    }

    fn draw(&self, f: impl FnOnce(&mut Framebuffer) -> Result<(), RenderError>) -> BridgeResponse {
        match self.display.with(f) {
            Ok(()) => BridgeResponse::ok(),
            Err(e) => BridgeResponse::error(e.to_string()),
        }
    }

    fn create_sprite(&mut self, width: u16, height: u16) -> BridgeResponse {
        if width == 0 || height == 0 {
            return BridgeResponse::error("sprite must be at least 1x1");
        }
        let id = format!("sprite-{}", self.next_sprite);
        self.next_sprite += 1;
        self.sprites.insert(
            id.clone(),
            SimSprite {
                width,
                height,
                frame_data: Vec::new(),
                fps: None,
            },
        );
        BridgeResponse::ok_with(json!({ "sprite_id": id, "width": width, "height": height }))
    }

    fn draw_sprite(&self, id: &str, x: i32, y: i32) -> BridgeResponse {
        let Some(sprite) = self.sprites.get(id) else {
            return unknown_sprite(id);
        };
        let width = usize::from(sprite.width);
        let pixels = sprite.frame_data.chunks_exact(3).enumerate();
        self.display.with(|fb| {
            for (i, px) in pixels {
                let (px_x, px_y) = (x + (i % width) as i32, y + (i / width) as i32);
                if px_x >= 0 && px_y >= 0 {
                    // Off-matrix pixels are clipped.
                    let _ = fb.plot(px_x as usize, px_y as usize, (px[0], px[1], px[2]));
                }
            }
        });
        BridgeResponse::ok()
    }

    fn with_sprite(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut SimSprite) -> Result<(), String>,
    ) -> BridgeResponse {
        match self.sprites.get_mut(id) {
            Some(sprite) => match f(sprite) {
                Ok(()) => BridgeResponse::ok(),
                Err(message) => BridgeResponse::error(message),
            },
            None => unknown_sprite(id),
        }
    }
}

fn unknown_sprite(id: &str) -> BridgeResponse {
    BridgeResponse::error(format!("sprite {id} not found"))
}
