//! # Render Serializer
//!
//! Feeds render requests to a [`QrRenderer`] one at a time, in the order
//! they were submitted, and applies each result to the shared
//! [`QrDisplay`].
//!
//! ## Ordering
//!
//! Requests go through an unbounded FIFO channel drained by a single worker
//! task. Sequence numbering and enqueueing happen under one lock without
//! suspending, so queue order always equals submission order. The worker
//! awaits each render to completion before taking the next job, so:
//!
//! - the renderer is never called concurrently
//! - an image is never replaced by one from an earlier submission
//! - a superseded request still renders; there is no cancellation
//!
//! Dropping the future returned by [`RenderSerializer::request`] does not
//! remove the job from the queue.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot, watch};

use super::{QrImage, QrOptions, QrRenderer};
use crate::error::RenderError;

/// Accessible description while a render is pending.
pub const GENERATING_ALT: &str = "QR preview is generating...";

/// A payload waiting for its image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub payload: String,
    /// Monotonic, starting at 1
    pub sequence: u64,
}

/// What the QR image element currently shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QrDisplay {
    /// Image source (data URL), absent while hidden
    pub src: Option<String>,
    /// Accessible description
    pub alt: String,
    pub hidden: bool,
    /// Payload the visible image encodes
    pub payload: Option<String>,
    /// Sequence of the request that produced the visible image, 0 if none
    pub sequence: u64,
    #[serde(skip)]
    pub image: Option<Arc<QrImage>>,
}

impl QrDisplay {
    /// Nothing rendered yet.
    pub fn empty() -> Self {
        Self {
            hidden: true,
            ..Self::default()
        }
    }

    /// Hidden, labelled as generating.
    pub fn placeholder() -> Self {
        Self {
            alt: GENERATING_ALT.to_string(),
            hidden: true,
            ..Self::default()
        }
    }

    /// Visible image for a completed request.
    pub fn rendered(request: &RenderRequest, image: QrImage) -> Self {
        Self {
            src: Some(image.data_url()),
            alt: format!("QR code for {}", request.payload),
            hidden: false,
            payload: Some(request.payload.clone()),
            sequence: request.sequence,
            image: Some(Arc::new(image)),
        }
    }
}

/// A queued render that has not been awaited yet.
#[derive(Debug)]
pub struct PendingRender {
    pub sequence: u64,
    reply: oneshot::Receiver<Result<QrDisplay, RenderError>>,
}

impl PendingRender {
    /// Wait until the render has been applied (or failed).
    pub async fn finish(self) -> Result<QrDisplay, RenderError> {
        self.reply.await.map_err(|_| RenderError::Closed)?
    }
}

struct RenderJob {
    request: RenderRequest,
    reply: oneshot::Sender<Result<QrDisplay, RenderError>>,
}

struct Queue {
    next_sequence: u64,
    jobs: mpsc::UnboundedSender<RenderJob>,
}

/// Serializes QR renders into a single display.
///
/// Must be created inside a tokio runtime; the worker task lives as long as
/// the serializer.
pub struct RenderSerializer {
    queue: Mutex<Queue>,
    display: Arc<watch::Sender<QrDisplay>>,
}

impl RenderSerializer {
    pub fn new(renderer: Arc<dyn QrRenderer>, options: QrOptions) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        let (display, _) = watch::channel(QrDisplay::empty());
        let display = Arc::new(display);

        tokio::spawn(run_worker(renderer, options, rx, display.clone()));

        Self {
            queue: Mutex::new(Queue {
                next_sequence: 0,
                jobs,
            }),
            display,
        }
    }

    /// Queue `payload` for rendering and wait for its image to be applied.
    ///
    /// The display switches to the placeholder immediately. On failure the
    /// display stays hidden and the error is logged and returned.
    pub async fn request(&self, payload: impl Into<String>) -> Result<QrDisplay, RenderError> {
        self.enqueue(payload)?.finish().await
    }

    /// Queue `payload` without waiting.
    ///
    /// Never suspends, so a caller holding its own lock can enqueue and
    /// record related state in one step.
    pub fn enqueue(&self, payload: impl Into<String>) -> Result<PendingRender, RenderError> {
        let mut queue = self.queue.lock().map_err(|_| RenderError::Closed)?;
        queue.next_sequence += 1;
        let request = RenderRequest {
            payload: payload.into(),
            sequence: queue.next_sequence,
        };
        let sequence = request.sequence;

        self.display.send_replace(QrDisplay::placeholder());

        let (reply, rx) = oneshot::channel();
        queue
            .jobs
            .send(RenderJob { request, reply })
            .map_err(|_| RenderError::Closed)?;

        Ok(PendingRender {
            sequence,
            reply: rx,
        })
    }

    /// Snapshot of the display.
    pub fn display(&self) -> QrDisplay {
        self.display.borrow().clone()
    }

    /// Watch display changes.
    pub fn subscribe(&self) -> watch::Receiver<QrDisplay> {
        self.display.subscribe()
    }
}

async fn run_worker(
    renderer: Arc<dyn QrRenderer>,
    options: QrOptions,
    mut jobs: mpsc::UnboundedReceiver<RenderJob>,
    display: Arc<watch::Sender<QrDisplay>>,
) {
    while let Some(RenderJob { request, reply }) = jobs.recv().await {
        tracing::debug!(sequence = request.sequence, "rendering QR code");

        let outcome = match renderer.render(&request.payload, &options).await {
            Ok(image) => {
                let shown = QrDisplay::rendered(&request, image);
                display.send_replace(shown.clone());
                Ok(shown)
            }
            Err(e) => {
                tracing::error!(
                    sequence = request.sequence,
                    error = %e,
                    "unable to render QR code"
                );
                // An earlier request may have made its image visible after
                // this one was queued; don't leave it labelled as current.
                display.send_replace(QrDisplay::placeholder());
                Err(e)
            }
        };

        // The requester may have gone away; the render still counted.
        let _ = reply.send(outcome);
    }
}
