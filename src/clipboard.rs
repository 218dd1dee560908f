//! # Clipboard Feedback
//!
//! Copies the current payload to the system clipboard and flips the copy
//! button label to a confirmation for a short window.
//!
//! Copy failures are logged and otherwise invisible: the label stays as it
//! was and nothing is retried.

use async_trait::async_trait;
use serde::Serialize;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::RwLock;

use crate::error::ClipboardError;

/// Label at rest.
pub const COPY_LABEL: &str = "Copy payload";

/// Label during the confirmation window.
pub const COPIED_LABEL: &str = "Copied!";

/// How long the confirmation label stays up.
pub const CONFIRMATION_WINDOW: Duration = Duration::from_secs(2);

/// System clipboard.
#[async_trait]
pub trait ClipboardService: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard backed by an external program that reads the text on stdin
/// (`pbcopy`, `wl-copy`, `xclip -selection clipboard`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Split a command line on whitespace into program and arguments.
    pub fn parse(command: &str) -> Result<Self, ClipboardError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ClipboardError::NotConfigured)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Usual clipboard command for the build platform.
    pub fn platform_default() -> &'static str {
        if cfg!(target_os = "macos") {
            "pbcopy"
        } else {
            "xclip -selection clipboard"
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl ClipboardService for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let io_err = |source| ClipboardError::Io {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(io_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await.map_err(io_err)?;
            // Closing stdin lets the program finish
        }

        let status = child.wait().await.map_err(io_err)?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Exit {
                program: self.program.clone(),
                status: status.to_string(),
            })
        }
    }
}

/// Result of a copy action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyOutcome {
    /// Nothing to copy
    Skipped,
    Copied,
    /// Clipboard write failed (logged)
    Failed,
}

#[derive(Debug)]
struct Label {
    text: &'static str,
    /// Bumped on every confirmation so only the latest one reverts the label
    generation: u64,
}

/// Copy action with transient label feedback.
pub struct ClipboardFeedback {
    service: Arc<dyn ClipboardService>,
    window: Duration,
    label: Arc<RwLock<Label>>,
}

impl ClipboardFeedback {
    pub fn new(service: Arc<dyn ClipboardService>) -> Self {
        Self::with_window(service, CONFIRMATION_WINDOW)
    }

    pub fn with_window(service: Arc<dyn ClipboardService>, window: Duration) -> Self {
        Self {
            service,
            window,
            label: Arc::new(RwLock::new(Label {
                text: COPY_LABEL,
                generation: 0,
            })),
        }
    }

    /// Copy `text`; a no-op for empty text.
    pub async fn copy(&self, text: &str) -> CopyOutcome {
        if text.is_empty() {
            return CopyOutcome::Skipped;
        }

        if let Err(e) = self.service.write_text(text).await {
            tracing::warn!(error = %e, "clipboard copy failed");
            return CopyOutcome::Failed;
        }

        let generation = {
            let mut label = self.label.write().await;
            label.generation += 1;
            label.text = COPIED_LABEL;
            label.generation
        };

        let label = self.label.clone();
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut label = label.write().await;
            if label.generation == generation {
                label.text = COPY_LABEL;
            }
        });

        CopyOutcome::Copied
    }

    /// Current button label.
    pub async fn label(&self) -> &'static str {
        self.label.read().await.text
    }
}
