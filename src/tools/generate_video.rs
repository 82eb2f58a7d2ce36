//! `generate_video` tool - asynchronous video generation and editing
//!
//! Branches on whether a source video reference is supplied: with
//! `video_url` the call maps to the upstream edit endpoint, without it to
//! the generation endpoint. The two branches are mutually exclusive per
//! call and accept different fields - duration is meaningful only for
//! generation.
//!
//! By default the handler waits for the job via the bounded polling loop;
//! with `wait_for_completion: false` it returns the job identifier
//! immediately with status `pending`.

use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::error::{GrokMcpError, Result};
use crate::tools::{parse_input, ToolDescriptor};
use crate::xai::poll::{poll_video_job, PollConfig};
use crate::xai::types::{VideoEditRequest, VideoGenerationRequest, VideoJob};
use crate::xai::XaiApi;

pub const NAME: &str = "generate_video";

/// Model used for video generation and editing
pub const VIDEO_MODEL: &str = "grok-imagine";

const ASPECT_RATIOS: [&str; 3] = ["16:9", "9:16", "1:1"];

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: NAME,
        description: "Generate a video from a prompt, or edit an existing video when \
                      video_url is supplied. Waits for completion unless \
                      wait_for_completion is false.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "Description of the video to generate, or the edit to apply"
                },
                "video_url": {
                    "type": "string",
                    "description": "Existing video to edit; selects the edit endpoint"
                },
                "duration_seconds": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 15,
                    "description": "Clip length; generation only"
                },
                "aspect_ratio": {
                    "type": "string",
                    "enum": ASPECT_RATIOS
                },
                "wait_for_completion": {
                    "type": "boolean",
                    "description": "Poll until the job finishes (default true)"
                }
            },
            "required": ["prompt"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateVideoInput {
    pub prompt: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default = "default_wait")]
    pub wait_for_completion: bool,
}

fn default_wait() -> bool {
    true
}

impl GenerateVideoInput {
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(GrokMcpError::invalid_input("prompt must not be empty"));
        }
        if let Some(duration) = self.duration_seconds {
            if !(1..=15).contains(&duration) {
                return Err(GrokMcpError::invalid_input(format!(
                    "duration_seconds must be between 1 and 15, got {}",
                    duration
                )));
            }
            if self.video_url.is_some() {
                return Err(GrokMcpError::invalid_input(
                    "duration_seconds applies to generation only, not video edits",
                ));
            }
        }
        if let Some(url) = &self.video_url {
            if url.trim().is_empty() {
                return Err(GrokMcpError::invalid_input("video_url must not be empty"));
            }
        }
        if let Some(ratio) = &self.aspect_ratio {
            if !ASPECT_RATIOS.contains(&ratio.as_str()) {
                return Err(GrokMcpError::invalid_input(format!(
                    "aspect_ratio must be one of {:?}, got {:?}",
                    ASPECT_RATIOS, ratio
                )));
            }
        }
        Ok(())
    }
}

pub async fn run(
    args: Value,
    api: &dyn XaiApi,
    poll: &PollConfig,
    cancel: &CancellationToken,
) -> Result<Value> {
    let input: GenerateVideoInput = parse_input(NAME, args)?;
    input.validate()?;

    let (job, mode) = match &input.video_url {
        Some(video_url) => {
            let request = VideoEditRequest {
                model: VIDEO_MODEL.to_string(),
                prompt: input.prompt.clone(),
                video_url: video_url.clone(),
            };
            (api.edit_video(&request).await?, "edit")
        }
        None => {
            let request = VideoGenerationRequest {
                model: VIDEO_MODEL.to_string(),
                prompt: input.prompt.clone(),
                duration_seconds: input.duration_seconds,
                aspect_ratio: input.aspect_ratio.clone(),
            };
            (api.generate_video(&request).await?, "generate")
        }
    };

    if !input.wait_for_completion {
        return Ok(json!({
            "job_id": job.id,
            "status": job.status.unwrap_or_else(|| "pending".to_string()),
            "mode": mode,
        }));
    }

    let final_job: VideoJob = if job.is_terminal() {
        job
    } else {
        poll_video_job(api, &job.id, poll, cancel).await?
    };

    if final_job.is_failed() {
        let message = final_job
            .error
            .unwrap_or_else(|| "no failure detail provided".to_string());
        return Err(GrokMcpError::video_failed(final_job.id, message));
    }

    Ok(json!({
        "job_id": final_job.id,
        "status": final_job.status.unwrap_or_else(|| "completed".to_string()),
        "url": final_job.url,
        "mode": mode,
    }))
}
