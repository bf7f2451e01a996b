/*!
# Language detection

Blocks whose header carries the `-a` suffix have their language guessed
from their content. The pieces:

- a [`DetectionBackend`] turns content into a [`Detection`] (label plus
  confidence). [`HeuristicBackend`] is the in-process keyword scorer.
- a [`DetectionService`] carries requests to a backend and hands responses
  back without blocking. [`InlineService`] answers on submission,
  [`WorkerService`] runs the backend on its own thread.
- the [`LanguageDetector`] decides when to ask and whether to believe the
  answer. It is ticked by the host loop and produces ordinary
  [`Transaction`](crate::editing::Transaction)s, so detection results go
  through the same pipeline as user edits.

Detector state is keyed by [`BlockId`](crate::index::BlockId), so a
response for a block that moved in the meantime still lands on that block.
*/

pub mod detector;
pub mod distance;
pub mod heuristic;
pub mod service;

pub use detector::LanguageDetector;
pub use distance::levenshtein;
pub use heuristic::HeuristicBackend;
pub use service::{InlineService, WorkerService};

/// A backend's guess. `language` is a free-form label such as `"py"`; the
/// detector maps it onto the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub language: String,
    /// In `0.0..=1.0`.
    pub confidence: f32,
}

impl Detection {
    /// Non-finite confidences count as no confidence at all.
    pub fn new(language: impl Into<String>, confidence: f32) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            language: language.into(),
            confidence,
        }
    }
}

/// Anything that can guess a language from text.
pub trait DetectionBackend {
    fn detect(&self, content: &str) -> Option<Detection>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRequest {
    pub id: RequestId,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResponse {
    pub id: RequestId,
    /// `None` when the backend had no opinion or failed.
    pub result: Option<Detection>,
}

/// Asynchronous transport between the detector and a backend.
///
/// Implementations must never block in `submit` or `try_recv`.
pub trait DetectionService {
    fn submit(&mut self, request: DetectionRequest);

    /// Next finished response, if any.
    fn try_recv(&mut self) -> Option<DetectionResponse>;

    /// The detector no longer wants an answer for `id`. Responses that
    /// arrive anyway are ignored, so this is only an optimisation.
    fn cancel(&mut self, _id: RequestId) {}

    /// Release any threads or handles. Called once on close.
    fn shutdown(&mut self) {}
}
