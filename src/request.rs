//! Request model for the generative inference endpoint
//!
//! These types serialize to the exact JSON shapes the endpoint accepts:
//! `{"taskType": ..., "<task>Params": {...}, "<task>GenerationConfig": {...}}`.
//! A request is built once per invocation and never mutated.

use crate::payload;
use rand::Rng;
use serde::Serialize;

/// Default negative prompt for outpainting, matching the model's
/// recommended quality guards
pub const DEFAULT_NEGATIVE_TEXT: &str = "bad quality, low resolution, cartoon";

/// Supported video output dimension
pub const VIDEO_DIMENSION_720P: &str = "1280x720";

/// Outpainting mask behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutPaintingMode {
    Default,
    Precise,
}

/// Parameters for the background-removal task
#[derive(Debug, Clone, Serialize)]
pub struct BackgroundRemovalParams {
    /// Transport-encoded input image
    pub image: String,
}

/// Parameters for the outpainting (background replacement) task
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutPaintingParams {
    /// Description of the desired background
    pub text: String,
    pub negative_text: String,
    /// Transport-encoded input image
    pub image: String,
    /// Natural-language description of the region to keep
    pub mask_prompt: String,
    pub out_painting_mode: OutPaintingMode,
}

/// Reference image attached to a text-to-video request
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceImage {
    pub format: String,
    pub source: ImageSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageSource {
    /// Transport-encoded image bytes
    pub bytes: String,
}

/// Parameters for the text-to-video task
#[derive(Debug, Clone, Serialize)]
pub struct TextToVideoParams {
    /// Description of the desired video
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ReferenceImage>,
}

/// Generation tuning for image tasks
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    pub number_of_images: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub cfg_scale: f32,
    pub seed: u32,
}

impl Default for ImageGenerationConfig {
    fn default() -> Self {
        Self {
            number_of_images: 1,
            width: None,
            height: None,
            cfg_scale: 8.0,
            seed: random_image_seed(),
        }
    }
}

/// Generation tuning for video tasks
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGenerationConfig {
    pub duration_seconds: u32,
    pub fps: u32,
    pub dimension: String,
    pub seed: u32,
}

impl Default for VideoGenerationConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 6,
            fps: 24,
            dimension: VIDEO_DIMENSION_720P.to_string(),
            seed: random_video_seed(),
        }
    }
}

/// A complete, task-specific request body for the inference endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "taskType")]
pub enum GenerationRequest {
    #[serde(rename = "BACKGROUND_REMOVAL", rename_all = "camelCase")]
    BackgroundRemoval {
        background_removal_params: BackgroundRemovalParams,
    },
    #[serde(rename = "OUTPAINTING", rename_all = "camelCase")]
    Outpainting {
        out_painting_params: OutPaintingParams,
        image_generation_config: ImageGenerationConfig,
    },
    #[serde(rename = "TEXT_VIDEO", rename_all = "camelCase")]
    TextVideo {
        text_to_video_params: TextToVideoParams,
        video_generation_config: VideoGenerationConfig,
    },
}

impl GenerationRequest {
    /// Build a background-removal request from raw image bytes
    #[must_use]
    pub fn background_removal(image_bytes: &[u8]) -> Self {
        Self::BackgroundRemoval {
            background_removal_params: BackgroundRemovalParams {
                image: payload::encode(image_bytes),
            },
        }
    }

    /// Build an outpainting request that replaces everything outside the
    /// masked subject with the prompted background
    #[must_use]
    pub fn outpainting(
        image_bytes: &[u8],
        background_prompt: &str,
        mask_prompt: &str,
        config: ImageGenerationConfig,
    ) -> Self {
        Self::Outpainting {
            out_painting_params: OutPaintingParams {
                text: background_prompt.to_string(),
                negative_text: DEFAULT_NEGATIVE_TEXT.to_string(),
                image: payload::encode(image_bytes),
                mask_prompt: mask_prompt.to_string(),
                out_painting_mode: OutPaintingMode::Precise,
            },
            image_generation_config: config,
        }
    }

    /// Build a text-to-video request, optionally seeded with a PNG
    /// reference frame
    #[must_use]
    pub fn text_to_video(
        prompt: &str,
        reference_png: Option<&[u8]>,
        config: VideoGenerationConfig,
    ) -> Self {
        let images = reference_png
            .map(|bytes| {
                vec![ReferenceImage {
                    format: "png".to_string(),
                    source: ImageSource {
                        bytes: payload::encode(bytes),
                    },
                }]
            })
            .unwrap_or_default();
        Self::TextVideo {
            text_to_video_params: TextToVideoParams {
                text: prompt.to_string(),
                images,
            },
            video_generation_config: config,
        }
    }

    /// Task type discriminator as it appears on the wire
    #[must_use]
    pub fn task_type(&self) -> &'static str {
        match self {
            Self::BackgroundRemoval { .. } => "BACKGROUND_REMOVAL",
            Self::Outpainting { .. } => "OUTPAINTING",
            Self::TextVideo { .. } => "TEXT_VIDEO",
        }
    }

    /// Serialize to the JSON body the endpoint accepts
    pub fn to_body(&self) -> crate::error::Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            crate::error::GenMediaError::invalid_config(format!(
                "failed to serialize {} request: {e}",
                self.task_type()
            ))
        })
    }
}

/// Random default seed for image tasks
#[must_use]
pub fn random_image_seed() -> u32 {
    rand::thread_rng().gen_range(0..=100_000)
}

/// Random default seed for video tasks
#[must_use]
pub fn random_video_seed() -> u32 {
    rand::thread_rng().gen_range(0..=2_147_483_647)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_background_removal_wire_shape() {
        let req = GenerationRequest::background_removal(b"img");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "taskType": "BACKGROUND_REMOVAL",
                "backgroundRemovalParams": { "image": "aW1n" }
            })
        );
    }

    #[test]
    fn test_outpainting_wire_shape() {
        let config = ImageGenerationConfig {
            seed: 42,
            ..Default::default()
        };
        let req = GenerationRequest::outpainting(b"img", "a sandy beach", "person", config);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "taskType": "OUTPAINTING",
                "outPaintingParams": {
                    "text": "a sandy beach",
                    "negativeText": DEFAULT_NEGATIVE_TEXT,
                    "image": "aW1n",
                    "maskPrompt": "person",
                    "outPaintingMode": "PRECISE"
                },
                "imageGenerationConfig": {
                    "numberOfImages": 1,
                    "cfgScale": 8.0,
                    "seed": 42
                }
            })
        );
    }

    #[test]
    fn test_text_to_video_wire_shape() {
        let config = VideoGenerationConfig {
            seed: 7,
            ..Default::default()
        };
        let req = GenerationRequest::text_to_video("drone view of a fort", Some(b"png"), config);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "taskType": "TEXT_VIDEO",
                "textToVideoParams": {
                    "text": "drone view of a fort",
                    "images": [
                        { "format": "png", "source": { "bytes": "cG5n" } }
                    ]
                },
                "videoGenerationConfig": {
                    "durationSeconds": 6,
                    "fps": 24,
                    "dimension": "1280x720",
                    "seed": 7
                }
            })
        );
    }

    #[test]
    fn test_text_to_video_without_reference_omits_images() {
        let req = GenerationRequest::text_to_video("waves", None, VideoGenerationConfig::default());
        let value = serde_json::to_value(&req).unwrap();
        let params = value.get("textToVideoParams").unwrap();
        assert_eq!(params.get("images"), None::<&Value>);
    }

    #[test]
    fn test_default_seeds_in_range() {
        for _ in 0..32 {
            assert!(random_image_seed() <= 100_000);
        }
    }
}
