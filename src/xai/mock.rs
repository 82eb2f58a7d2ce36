//! Scripted test double for the upstream API
//!
//! `MockXaiApi` records every call with atomic counters and captures the
//! last request per endpoint, so tests can assert that validation failures
//! never reach the network and that request shaping is exact. Video status
//! responses are scripted as a queue with an optional repeating fallback.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{GrokMcpError, Result};
use crate::xai::client::XaiApi;
use crate::xai::types::{
    AssistantMessage, ChatChoice, ChatCompletionRequest, ChatCompletionResponse, GeneratedImage,
    ImageGenerationRequest, ImageGenerationResponse, ModelList, ResponsesRequest,
    ResponsesResponse, Usage, VideoEditRequest, VideoGenerationRequest, VideoJob,
};

/// Scripted [`XaiApi`] implementation for unit tests
#[derive(Default)]
pub struct MockXaiApi {
    pub list_models_calls: AtomicU32,
    pub chat_calls: AtomicU32,
    pub image_calls: AtomicU32,
    pub video_generate_calls: AtomicU32,
    pub video_edit_calls: AtomicU32,
    pub video_status_calls: AtomicU32,
    pub responses_calls: AtomicU32,

    pub last_chat_request: Mutex<Option<ChatCompletionRequest>>,
    pub last_image_request: Mutex<Option<ImageGenerationRequest>>,
    pub last_video_request: Mutex<Option<VideoGenerationRequest>>,
    pub last_edit_request: Mutex<Option<VideoEditRequest>>,
    pub last_responses_request: Mutex<Option<ResponsesRequest>>,

    chat_response: Mutex<Option<ChatCompletionResponse>>,
    image_response: Mutex<Option<ImageGenerationResponse>>,
    responses_response: Mutex<Option<ResponsesResponse>>,
    video_job: Mutex<Option<VideoJob>>,
    video_status_script: Mutex<VecDeque<VideoJob>>,
    default_video_status: Mutex<Option<VideoJob>>,

    fail_with: Mutex<Option<GrokMcpError>>,
}

impl MockXaiApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every endpoint fail with the given error
    pub fn fail_with(&self, error: GrokMcpError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }

    /// Set the canned chat completion answer text
    pub fn set_chat_text(&self, text: &str) {
        *self.chat_response.lock().unwrap() = Some(ChatCompletionResponse {
            id: Some("chatcmpl-1".to_string()),
            model: Some("grok-3".to_string()),
            choices: vec![ChatChoice {
                message: AssistantMessage {
                    role: Some("assistant".to_string()),
                    content: Some(text.to_string()),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 20,
                total_tokens: 30,
            }),
        });
    }

    pub fn set_image_response(&self, images: Vec<GeneratedImage>) {
        *self.image_response.lock().unwrap() = Some(ImageGenerationResponse { data: images });
    }

    pub fn set_responses_response(&self, response: ResponsesResponse) {
        *self.responses_response.lock().unwrap() = Some(response);
    }

    /// Job descriptor returned by generation and edit calls
    pub fn set_video_job(&self, job: VideoJob) {
        *self.video_job.lock().unwrap() = Some(job);
    }

    /// Queue the next status response; consumed in FIFO order
    pub fn push_video_status(&self, job: VideoJob) {
        self.video_status_script.lock().unwrap().push_back(job);
    }

    /// Status returned once the script queue runs dry
    pub fn set_default_video_status(&self, job: VideoJob) {
        *self.default_video_status.lock().unwrap() = Some(job);
    }

    /// Total calls across all endpoints; zero proves validation failed
    /// before any network activity
    pub fn total_calls(&self) -> u32 {
        self.list_models_calls.load(Ordering::SeqCst)
            + self.chat_calls.load(Ordering::SeqCst)
            + self.image_calls.load(Ordering::SeqCst)
            + self.video_generate_calls.load(Ordering::SeqCst)
            + self.video_edit_calls.load(Ordering::SeqCst)
            + self.video_status_calls.load(Ordering::SeqCst)
            + self.responses_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<()> {
        match self.fail_with.lock().unwrap().as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn default_chat_response() -> ChatCompletionResponse {
        ChatCompletionResponse {
            id: Some("chatcmpl-1".to_string()),
            model: Some("grok-3".to_string()),
            choices: vec![ChatChoice {
                message: AssistantMessage {
                    role: Some("assistant".to_string()),
                    content: Some("mock answer".to_string()),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: Some(Usage {
                prompt_tokens: 1,
                completion_tokens: 2,
                total_tokens: 3,
            }),
        }
    }

    fn default_video_job() -> VideoJob {
        VideoJob {
            id: "vid_1".to_string(),
            status: Some("pending".to_string()),
            url: None,
            error: None,
        }
    }
}

#[async_trait]
impl XaiApi for MockXaiApi {
    async fn list_models(&self) -> Result<ModelList> {
        self.list_models_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(ModelList { data: vec![] })
    }

    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_chat_request.lock().unwrap() = Some(request.clone());
        self.check_failure()?;
        Ok(self
            .chat_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(Self::default_chat_response))
    }

    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_image_request.lock().unwrap() = Some(request.clone());
        self.check_failure()?;
        Ok(self
            .image_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| ImageGenerationResponse {
                data: vec![GeneratedImage {
                    url: Some("https://example.test/image.png".to_string()),
                    ..Default::default()
                }],
            }))
    }

    async fn generate_video(&self, request: &VideoGenerationRequest) -> Result<VideoJob> {
        self.video_generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_video_request.lock().unwrap() = Some(request.clone());
        self.check_failure()?;
        Ok(self
            .video_job
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(Self::default_video_job))
    }

    async fn edit_video(&self, request: &VideoEditRequest) -> Result<VideoJob> {
        self.video_edit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_edit_request.lock().unwrap() = Some(request.clone());
        self.check_failure()?;
        Ok(self
            .video_job
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(Self::default_video_job))
    }

    async fn video_status(&self, _job_id: &str) -> Result<VideoJob> {
        self.video_status_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        if let Some(job) = self.video_status_script.lock().unwrap().pop_front() {
            return Ok(job);
        }
        self.default_video_status
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| GrokMcpError::network("mock video status script exhausted"))
    }

    async fn create_response(&self, request: &ResponsesRequest) -> Result<ResponsesResponse> {
        self.responses_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_responses_request.lock().unwrap() = Some(request.clone());
        self.check_failure()?;
        Ok(self
            .responses_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_default())
    }
}
