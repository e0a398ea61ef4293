//! Bridge wire types.
//!
//! Every request is `{"command_type": "...", "data": {...}}`; every
//! response is `{"status": "ok" | "error", "message"?: "...", "data": {...}}`.
//! Colours travel flattened as `r`, `g`, `b` next to the other fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;
use crate::frame::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<Rgb> for Colour {
    fn from((r, g, b): Rgb) -> Self {
        Self { r, g, b }
    }
}

impl From<Colour> for Rgb {
    fn from(c: Colour) -> Self {
        (c.r, c.g, c.b)
    }
}

/// Typed request payloads understood by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command_type", content = "data", rename_all = "snake_case")]
pub enum BridgeCommand {
    // ── Display ───────────────────────────────────────────────
    SetBackground(Colour),
    ClearMatrix,
    SetBrightness {
        brightness: u8,
    },
    DrawPixel {
        x: i32,
        y: i32,
        #[serde(flatten)]
        colour: Colour,
    },
    DrawCircle {
        x: i32,
        y: i32,
        radius: u16,
        #[serde(flatten)]
        colour: Colour,
    },
    DrawLine {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        #[serde(flatten)]
        colour: Colour,
    },
    DrawText {
        x: i32,
        y: i32,
        text: String,
        #[serde(flatten)]
        colour: Colour,
    },
    /// Replace the whole image; `pixels` is row-major, 64×64.
    SetImage {
        pixels: Vec<Rgb>,
    },
    CreateSprite {
        width: u16,
        height: u16,
    },
    DrawSprite {
        sprite_id: String,
        x: i32,
        y: i32,
    },
    UpdateSprite {
        sprite_id: String,
        frame_data: Vec<u8>,
    },
    DeleteSprite {
        sprite_id: String,
    },
    StartAnimation {
        sprite_id: String,
        fps: u8,
    },
    StopAnimation {
        sprite_id: String,
    },

    // ── Audio (passed through, never interpreted here) ────────
    Vad {
        audio_data: Vec<u8>,
    },
    Tts {
        text: String,
    },
    Asr {
        audio_data: Vec<u8>,
    },
    Kws {
        audio_data: Vec<u8>,
    },
    RecordAudio {
        duration_ms: u32,
    },
    AnalyzeFrequency {
        audio_data: Vec<u8>,
    },
    ProcessAmplitude {
        audio_data: Vec<u8>,
    },
    ExtractTemporal {
        audio_data: Vec<u8>,
    },
}

impl BridgeCommand {
    /// Wire name of the command, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetBackground(_) => "set_background",
            Self::ClearMatrix => "clear_matrix",
            Self::SetBrightness { .. } => "set_brightness",
            Self::DrawPixel { .. } => "draw_pixel",
            Self::DrawCircle { .. } => "draw_circle",
            Self::DrawLine { .. } => "draw_line",
            Self::DrawText { .. } => "draw_text",
            Self::SetImage { .. } => "set_image",
            Self::CreateSprite { .. } => "create_sprite",
            Self::DrawSprite { .. } => "draw_sprite",
            Self::UpdateSprite { .. } => "update_sprite",
            Self::DeleteSprite { .. } => "delete_sprite",
            Self::StartAnimation { .. } => "start_animation",
            Self::StopAnimation { .. } => "stop_animation",
            Self::Vad { .. } => "vad",
            Self::Tts { .. } => "tts",
            Self::Asr { .. } => "asr",
            Self::Kws { .. } => "kws",
            Self::RecordAudio { .. } => "record_audio",
            Self::AnalyzeFrequency { .. } => "analyze_frequency",
            Self::ProcessAmplitude { .. } => "process_amplitude",
            Self::ExtractTemporal { .. } => "extract_temporal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// One structured answer to one [`BridgeCommand`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl BridgeResponse {
    pub fn ok() -> Self {
        Self::ok_with(Value::Null)
    }

    pub fn ok_with(data: Value) -> Self {
        Self {
            status: ResponseStatus::Ok,
            message: None,
            data,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            data: Value::Null,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResponseStatus::Ok
    }

    /// Turn an error status into [`BridgeError::Remote`]; keep the payload
    /// otherwise.
    pub fn into_result(self) -> Result<Value, BridgeError> {
        match self.status {
            ResponseStatus::Ok => Ok(self.data),
            ResponseStatus::Error => Err(BridgeError::remote(
                self.message.as_deref().unwrap_or("unspecified error"),
            )),
        }
    }

    /// String field `key` of the payload.
    pub fn str_field(&self, key: &'static str) -> Result<&str, BridgeError> {
        self.data
            .get(key)
            .and_then(Value::as_str)
            .ok_or(BridgeError::MalformedResponse(key))
    }
}
