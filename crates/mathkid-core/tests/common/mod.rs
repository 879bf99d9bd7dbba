//! Scripted in-memory generation service shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbImage};
use mathkid_core::{
    Config, FileHandle, GenerationRequest, GenerationService, MathKidError, Result,
};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const TEXT_MODEL: &str = "text-model";
pub const VISION_MODEL: &str = "vision-model";

/// What the service saw when an upload arrived
#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub path: PathBuf,
    pub mime_type: String,
    pub bytes: Option<Vec<u8>>,
}

pub struct ScriptedService {
    expression: String,
    fail_on: Option<String>,
    fail_upload: bool,
    upload_delay: Option<Duration>,
    generate_delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<GenerationRequest>>,
    uploads: Mutex<Vec<UploadRecord>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self {
            expression: "2+2*3".to_string(),
            fail_on: None,
            fail_upload: false,
            upload_delay: None,
            generate_delay: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Text returned by the extraction call
    pub fn with_expression(mut self, expression: &str) -> Self {
        self.expression = expression.to_string();
        self
    }

    /// Fail any generate call whose prompt contains `fragment`
    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.fail_on = Some(fragment.to_string());
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = Some(delay);
        self
    }

    /// Every generate call sleeps for `delay` before answering
    pub fn with_generate_delay(mut self, delay: Duration) -> Self {
        self.generate_delay = Some(delay);
        self
    }

    /// Highest number of generate calls seen running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.uploads.lock().unwrap().clone()
    }

    /// The call whose prompt contains `fragment`
    pub fn call_containing(&self, fragment: &str) -> Option<GenerationRequest> {
        self.calls()
            .into_iter()
            .find(|c| c.prompt_text().contains(fragment))
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let prompt = request.prompt_text();
        self.calls.lock().unwrap().push(request);

        if let Some(delay) = self.generate_delay {
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        if let Some(fragment) = &self.fail_on {
            if prompt.contains(fragment.as_str()) {
                return Err(MathKidError::service("simulated outage"));
            }
        }

        // padded so the stages' trimming is observable
        let response = if prompt.contains("Identify the main mathematical expression") {
            format!("  {}\n", self.expression)
        } else if prompt.contains("visually intuitive example") {
            "\n🍎🍎 + 🍎🍎🍎🍎🍎🍎\n".to_string()
        } else if prompt.contains("What is the result") {
            " 8 ".to_string()
        } else {
            "unexpected prompt".to_string()
        };
        Ok(response)
    }

    async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<FileHandle> {
        let index = {
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(UploadRecord {
                path: path.to_path_buf(),
                mime_type: mime_type.to_string(),
                bytes: std::fs::read(path).ok(),
            });
            uploads.len()
        };

        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_upload {
            return Err(MathKidError::service("upload rejected"));
        }

        Ok(FileHandle {
            name: format!("files/upload-{}", index),
            uri: format!("https://files.test/upload-{}", index),
            mime_type: mime_type.to_string(),
        })
    }

    fn model_name(&self) -> &str {
        TEXT_MODEL
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.service.text_model = TEXT_MODEL.to_string();
    config.service.vision_model = VISION_MODEL.to_string();
    config
}

pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 200])
    }));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}
