//! Classifiers backed by an external model script.
//!
//! The script is invoked as
//! `<python> <script> --model=<model> (--text-stdin | --image=<path>)`.
//! Text is written to the script's stdin so that neither a leading `-` nor
//! the argument length limit gets in the way. The script must print one JSON
//! object on stdout:
//!
//! ```json
//! {"labels": ["form", "invoice", "list"], "probabilities": [0.1, 0.7, 0.2]}
//! ```
//!
//! `labels` may be omitted when the model does not expose its class names.

use anyhow::Context;
use serde::Deserialize;
use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

use crate::classify::{ImageClassifier, TextClassifier};
use crate::core::document::DocumentImage;
use crate::core::error::SignalError;
use crate::core::model::{ClassScores, LabelSpace};

#[derive(Debug, Clone, Deserialize)]
struct ModelOutput {
    #[serde(default)]
    labels: Vec<String>,
    probabilities: Vec<f64>,
}

/// What a single script invocation classifies.
#[derive(Debug, Clone, Copy)]
pub enum BridgeInput<'a> {
    Text(&'a str),
    Image(&'a Path),
}

impl BridgeInput<'_> {
    fn arg(&self) -> OsString {
        match self {
            BridgeInput::Text(_) => OsString::from("--text-stdin"),
            BridgeInput::Image(path) => {
                let mut arg = OsString::from("--image=");
                arg.push(path.as_os_str());
                arg
            }
        }
    }

    fn stdin(&self) -> Option<&[u8]> {
        match self {
            BridgeInput::Text(text) => Some(text.as_bytes()),
            BridgeInput::Image(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelBridge {
    python: PathBuf,
    script: PathBuf,
    model: PathBuf,
}

impl ModelBridge {
    pub fn new(script: PathBuf, model: PathBuf) -> Self {
        Self {
            python: PathBuf::from("python3"),
            script,
            model,
        }
    }

    pub fn with_python(mut self, python: PathBuf) -> Self {
        self.python = python;
        self
    }

    pub fn model(&self) -> &Path {
        &self.model
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Model artifact and script are both on disk.
    pub fn is_available(&self) -> bool {
        self.missing().is_none()
    }

    /// Reason the bridge cannot run, naming the file that is absent.
    pub fn missing(&self) -> Option<String> {
        if !self.model.is_file() {
            return Some(format!("model artifact not found: {}", self.model.display()));
        }
        if !self.script.is_file() {
            return Some(format!("model script not found: {}", self.script.display()));
        }
        None
    }

    pub fn run(&self, input: BridgeInput<'_>) -> Result<ClassScores, SignalError> {
        if let Some(reason) = self.missing() {
            return Err(SignalError::unavailable(reason));
        }

        let mut model_arg = OsString::from("--model=");
        model_arg.push(self.model.as_os_str());

        let payload = input.stdin();
        let child = Command::new(&self.python)
            .arg(&self.script)
            .arg(model_arg)
            .arg(input.arg())
            .stdin(if payload.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let mut child = match child {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SignalError::unavailable(format!(
                    "interpreter not found: {}",
                    self.python.display()
                )));
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context("failed to invoke model script")
                    .into())
            }
        };

        if let (Some(bytes), Some(mut stdin)) = (payload, child.stdin.take()) {
            // A script that exits without reading is judged by its exit status.
            match stdin.write_all(bytes) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(anyhow::Error::new(e)
                        .context("failed to send text to model script")
                        .into())
                }
                _ => {}
            }
        }
        let output = child
            .wait_with_output()
            .with_context(|| "failed to wait for model script")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow::anyhow!("model script failed: {stderr}").into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed: ModelOutput = serde_json::from_str(stdout.trim())
            .with_context(|| "failed to parse model script JSON response")?;
        debug!(
            model = %self.model.display(),
            classes = parsed.probabilities.len(),
            "model script finished"
        );
        Ok(ClassScores::new(
            LabelSpace::new(parsed.labels),
            parsed.probabilities,
        ))
    }
}

/// Text classifier served by [`ModelBridge`], text sent on stdin.
#[derive(Debug, Clone)]
pub struct ScriptTextClassifier {
    bridge: ModelBridge,
}

impl ScriptTextClassifier {
    pub fn new(bridge: ModelBridge) -> Self {
        Self { bridge }
    }
}

impl TextClassifier for ScriptTextClassifier {
    fn classify(&self, text: &str) -> Result<ClassScores, SignalError> {
        self.bridge.run(BridgeInput::Text(text))
    }

    fn is_available(&self) -> bool {
        self.bridge.is_available()
    }
}

/// Image classifier served by [`ModelBridge`] with `--image=<path>`.
#[derive(Debug, Clone)]
pub struct ScriptImageClassifier {
    bridge: ModelBridge,
}

impl ScriptImageClassifier {
    pub fn new(bridge: ModelBridge) -> Self {
        Self { bridge }
    }
}

impl ImageClassifier for ScriptImageClassifier {
    fn classify(&self, image: &DocumentImage) -> Result<ClassScores, SignalError> {
        self.bridge.run(BridgeInput::Image(image.path()))
    }

    fn is_available(&self) -> bool {
        self.bridge.is_available()
    }
}
