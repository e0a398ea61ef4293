//! LED matrix controller: thin forwarders onto the command bridge plus a
//! local sprite registry.
//!
//! Sprites are created on the far side; the controller only remembers the
//! ids it was handed.  Any call naming an id it does not know fails with
//! [`Error::UnknownHandle`] without touching the bridge.

use core::fmt;
use std::collections::HashMap;

use log::{error, info};
use serde_json::Value;

use crate::app::ports::CommandBridge;
use crate::bridge::{BridgeCommand, BridgeResponse, Colour};
use crate::config::MatrixConfig;
use crate::error::{Error, Result};
use crate::frame::Rgb;

/// Opaque sprite identifier issued by the matrix service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpriteId(String);

impl SpriteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the registry remembers about a sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteInfo {
    pub width: u16,
    pub height: u16,
    /// Animation rate, while animating.
    pub fps: Option<u8>,
    /// Full `create_sprite` payload.
    pub metadata: Value,
}

pub struct MatrixController<B> {
    bridge: B,
    sprites: HashMap<SpriteId, SpriteInfo>,
    default_fps: u8,
}

impl<B: CommandBridge> MatrixController<B> {
    pub fn new(bridge: B, config: &MatrixConfig) -> Self {
        Self {
            bridge,
            sprites: HashMap::new(),
            default_fps: config.animation_fps,
        }
    }

    // ── Drawing ───────────────────────────────────────────────

    pub async fn set_background(&mut self, colour: Rgb) -> Result<()> {
        self.send(BridgeCommand::SetBackground(colour.into())).await.map(drop)
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.send(BridgeCommand::ClearMatrix).await.map(drop)
    }

    /// Out-of-range levels are clamped to 0–100.  Returns the level sent.
    pub async fn set_brightness(&mut self, brightness: i32) -> Result<u8> {
        let level = brightness.clamp(0, 100) as u8;
        self.send(BridgeCommand::SetBrightness { brightness: level })
            .await?;
        Ok(level)
    }

    pub async fn draw_pixel(&mut self, x: i32, y: i32, colour: Rgb) -> Result<()> {
        let colour = Colour::from(colour);
        self.send(BridgeCommand::DrawPixel { x, y, colour }).await.map(drop)
    }

    pub async fn draw_circle(&mut self, x: i32, y: i32, radius: u16, colour: Rgb) -> Result<()> {
        let colour = Colour::from(colour);
        self.send(BridgeCommand::DrawCircle {
            x,
            y,
            radius,
            colour,
        })
        .await
        .map(drop)
    }

    pub async fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), colour: Rgb) -> Result<()> {
        self.send(BridgeCommand::DrawLine {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            colour: colour.into(),
        })
        .await
        .map(drop)
    }

    pub async fn draw_text(&mut self, x: i32, y: i32, text: &str, colour: Rgb) -> Result<()> {
        self.send(BridgeCommand::DrawText {
            x,
            y,
            text: text.into(),
            colour: colour.into(),
        })
        .await
        .map(drop)
    }

    // ── Sprites ───────────────────────────────────────────────

    /// Create a sprite and register the id the service hands back.
    pub async fn create_sprite(&mut self, width: u16, height: u16) -> Result<SpriteId> {
        let response = self
            .send(BridgeCommand::CreateSprite { width, height })
            .await?;
        let id = SpriteId::new(response.str_field("sprite_id").inspect_err(|e| {
            error!("create_sprite: {}", e);
        })?);
        info!("Registered sprite {} ({}x{})", id, width, height);
        self.sprites.insert(
            id.clone(),
            SpriteInfo {
                width,
                height,
                fps: None,
                metadata: response.data,
            },
        );
        Ok(id)
    }

    pub async fn draw_sprite(&mut self, id: &SpriteId, x: i32, y: i32) -> Result<()> {
        self.known(id)?;
        self.send(BridgeCommand::DrawSprite {
            sprite_id: id.to_string(),
            x,
            y,
        })
        .await
        .map(drop)
    }

    pub async fn update_sprite(&mut self, id: &SpriteId, frame_data: &[u8]) -> Result<()> {
        self.known(id)?;
        self.send(BridgeCommand::UpdateSprite {
            sprite_id: id.to_string(),
            frame_data: frame_data.to_vec(),
        })
        .await
        .map(drop)
    }

    /// Delete on the far side, then forget the id.
    pub async fn delete_sprite(&mut self, id: &SpriteId) -> Result<()> {
        self.known(id)?;
        self.send(BridgeCommand::DeleteSprite {
            sprite_id: id.to_string(),
        })
        .await?;
        self.sprites.remove(id);
        Ok(())
    }

    /// Start animating at `fps`, or at the configured rate when `None`.
    pub async fn start_animation(&mut self, id: &SpriteId, fps: Option<u8>) -> Result<()> {
        self.known(id)?;
        let fps = fps.unwrap_or(self.default_fps);
        self.send(BridgeCommand::StartAnimation {
            sprite_id: id.to_string(),
            fps,
        })
        .await?;
        if let Some(info) = self.sprites.get_mut(id) {
            info.fps = Some(fps);
        }
        Ok(())
    }

    pub async fn stop_animation(&mut self, id: &SpriteId) -> Result<()> {
        self.known(id)?;
        self.send(BridgeCommand::StopAnimation {
            sprite_id: id.to_string(),
        })
        .await?;
        if let Some(info) = self.sprites.get_mut(id) {
            info.fps = None;
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn sprite(&self, id: &SpriteId) -> Option<&SpriteInfo> {
        self.sprites.get(id)
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    // ── Internal ──────────────────────────────────────────────

    fn known(&self, id: &SpriteId) -> Result<()> {
        if self.sprites.contains_key(id) {
            Ok(())
        } else {
            Err(Error::UnknownHandle(id.clone()))
        }
    }

    async fn send(&mut self, command: BridgeCommand) -> Result<BridgeResponse> {
        let name = command.name();
        let response = self.bridge.send(command).await.inspect_err(|e| {
            error!("Matrix command {} failed: {}", name, e);
        })?;
        if let Err(e) = response.clone().into_result() {
            error!("Matrix command {} refused: {}", name, e);
            return Err(e.into());
        }
        Ok(response)
    }
}
