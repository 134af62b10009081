//! Ingress models
//!
//! Mirrors the provider's ingress admin messages. Field names follow the
//! provider's JSON encoding (proto field names), and every response field is
//! defaulted because the provider omits zero values.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::{Error, Result};

/// How a broadcaster pushes media into an ingress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngressInput {
    /// RTMP push of pre-encoded media, re-encoded with explicit presets
    RtmpInput,
    /// Browser WHIP push, transcoded by the provider
    WhipInput,
}

impl IngressInput {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RtmpInput => "RTMP_INPUT",
            Self::WhipInput => "WHIP_INPUT",
        }
    }

    #[must_use]
    pub const fn is_whip(&self) -> bool {
        matches!(self, Self::WhipInput)
    }
}

impl Display for IngressInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngressInput {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rtmp" | "rtmp_input" => Ok(Self::RtmpInput),
            "whip" | "whip_input" => Ok(Self::WhipInput),
            _ => Err(Error::InvalidInput(format!("Unknown ingress input: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackSource {
    Unknown,
    Camera,
    Microphone,
    ScreenShare,
    ScreenShareAudio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum IngressVideoEncodingPreset {
    #[serde(rename = "H264_720P_30FPS_3_LAYERS")]
    H264_720p30fps3Layers,
    #[serde(rename = "H264_1080P_30FPS_3_LAYERS")]
    H264_1080p30fps3Layers,
    #[serde(rename = "H264_540P_25FPS_2_LAYERS")]
    H264_540p25fps2Layers,
    #[serde(rename = "H264_720P_30FPS_1_LAYER")]
    H264_720p30fps1Layer,
    #[serde(rename = "H264_1080P_30FPS_1_LAYER")]
    H264_1080p30fps1Layer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngressAudioEncodingPreset {
    #[serde(rename = "OPUS_STEREO_96KBPS")]
    OpusStereo96kbps,
    #[serde(rename = "OPUS_MONO_64KBS")]
    OpusMono64kbps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressVideoOptions {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub source: TrackSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<IngressVideoEncodingPreset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressAudioOptions {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub source: TrackSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<IngressAudioEncodingPreset>,
}

impl IngressVideoOptions {
    /// Camera track, 1080p30 with three simulcast layers
    #[must_use]
    pub fn hd_camera() -> Self {
        Self {
            name: String::new(),
            source: TrackSource::Camera,
            preset: Some(IngressVideoEncodingPreset::H264_1080p30fps3Layers),
        }
    }
}

impl IngressAudioOptions {
    /// Microphone track, stereo Opus at 96kbps
    #[must_use]
    pub fn stereo_microphone() -> Self {
        Self {
            name: "audio".to_string(),
            source: TrackSource::Microphone,
            preset: Some(IngressAudioEncodingPreset::OpusStereo96kbps),
        }
    }
}

/// Options sent with a create-ingress request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIngressOptions {
    pub name: String,
    pub room_name: String,
    pub participant_identity: String,
    pub participant_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_transcoding: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<IngressVideoOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<IngressAudioOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngressState {
    pub status: String,
    pub error: String,
    pub room_id: String,
}

/// Ingress as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngressInfo {
    pub ingress_id: String,
    pub name: String,
    pub stream_key: String,
    pub url: String,
    /// Absent on the wire for RTMP input (the zero value)
    pub input_type: String,
    pub room_name: String,
    pub participant_identity: String,
    pub participant_name: String,
    pub enable_transcoding: Option<bool>,
    pub reusable: bool,
    pub state: Option<IngressState>,
}

/// Connection details persisted onto a host's stream record
///
/// All three fields are non-empty; an incomplete provider response never
/// produces a value of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressCredentials {
    pub ingress_id: String,
    pub server_url: String,
    pub stream_key: String,
}

impl IngressCredentials {
    /// Extract credentials from a create-ingress response
    pub fn from_info(info: &IngressInfo) -> Result<Self> {
        let mut missing = Vec::new();
        if info.ingress_id.is_empty() {
            missing.push("ingress_id");
        }
        if info.url.is_empty() {
            missing.push("url");
        }
        if info.stream_key.is_empty() {
            missing.push("stream_key");
        }

        if !missing.is_empty() {
            return Err(Error::MalformedResponse(format!(
                "Failed to create ingress: missing {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            ingress_id: info.ingress_id.clone(),
            server_url: info.url.clone(),
            stream_key: info.stream_key.clone(),
        })
    }
}
