use std::collections::HashMap;
use std::time::Instant;

use blockpad_config::DetectionSettings;

use crate::detection::{
    DetectionRequest, DetectionResponse, DetectionService, HeuristicBackend, InlineService,
    RequestId, WorkerService, levenshtein,
};
use crate::editing::blocks::change_language_with_origin;
use crate::editing::{Document, Origin, Patch, Transaction};
use crate::index::BlockId;
use crate::language;

/// Per-block detector state. A block with no entry is idle and has never
/// been sampled.
#[derive(Debug, Default)]
struct BlockState {
    /// Content as it was last sent off.
    sample: Option<String>,
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    request: RequestId,
    content: String,
    expires: Instant,
}

/// Debounced, confidence-gated language detection for auto blocks.
///
/// The host calls [`observe`](Self::observe) with every patch and
/// [`poll`](Self::poll) on every tick, dispatching whatever transaction
/// `poll` returns. Time is always passed in.
pub struct LanguageDetector {
    settings: DetectionSettings,
    service: Box<dyn DetectionService>,
    deadline: Option<Instant>,
    blocks: HashMap<BlockId, BlockState>,
    next_request: u64,
    closed: bool,
}

impl LanguageDetector {
    pub fn new(settings: DetectionSettings, service: impl DetectionService + 'static) -> Self {
        Self {
            settings,
            service: Box::new(service),
            deadline: None,
            blocks: HashMap::new(),
            next_request: 0,
            closed: false,
        }
    }

    /// Heuristic scoring on the calling thread.
    pub fn inline(settings: DetectionSettings) -> Self {
        Self::new(settings, InlineService::new(HeuristicBackend))
    }

    /// Heuristic scoring on a worker thread.
    pub fn spawn(settings: DetectionSettings) -> std::io::Result<Self> {
        Ok(Self::new(settings, WorkerService::spawn(HeuristicBackend)?))
    }

    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    /// Note a dispatched patch. Text changes push the detection deadline
    /// out by the idle delay.
    pub fn observe(&mut self, patch: &Patch, now: Instant) {
        if self.closed || !self.settings.enabled || !patch.doc_changed {
            return;
        }
        // Our own header rewrites.
        if patch.origin == Origin::AutoLanguage {
            return;
        }
        if patch.origin.is_history() {
            self.cancel_all();
        }
        self.deadline = Some(now + self.settings.idle_delay());
    }

    /// Advance the detector: drop dead requests, take in responses and fire
    /// a pass once the idle delay has run out.
    ///
    /// Returns at most one transaction; call again on the next tick for
    /// more.
    pub fn poll(&mut self, doc: &Document, now: Instant) -> Option<Transaction> {
        if self.closed || !self.settings.enabled {
            return None;
        }
        self.prune(doc);
        self.expire(now);

        while let Some(response) = self.service.try_recv() {
            if let Some(transaction) = self.accept(doc, response) {
                return Some(transaction);
            }
        }

        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.fire(doc, now)
            }
            _ => None,
        }
    }

    /// Earliest instant at which [`poll`](Self::poll) has something to do,
    /// other than taking in responses.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.blocks
            .values()
            .filter_map(|state| state.pending.as_ref().map(|p| p.expires))
            .chain(self.deadline)
            .min()
    }

    pub fn is_pending(&self, id: BlockId) -> bool {
        self.blocks
            .get(&id)
            .is_some_and(|state| state.pending.is_some())
    }

    pub fn pending_count(&self) -> usize {
        self.blocks
            .values()
            .filter(|state| state.pending.is_some())
            .count()
    }

    /// Cancel everything and stop the service. The detector stays inert
    /// afterwards.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.cancel_all();
        self.blocks.clear();
        self.deadline = None;
        self.service.shutdown();
        self.closed = true;
    }

    fn cancel_all(&mut self) {
        let cancelled: Vec<RequestId> = self
            .blocks
            .values_mut()
            .filter_map(|state| state.pending.take().map(|p| p.request))
            .collect();
        for request in cancelled {
            self.service.cancel(request);
        }
    }

    /// Forget deleted blocks and stop waiting on blocks that left auto mode.
    fn prune(&mut self, doc: &Document) {
        let index = doc.index();
        let mut cancelled = Vec::new();
        self.blocks.retain(|id, state| {
            let auto = index.block_by_id(*id).map(|block| block.language.auto);
            if auto != Some(true)
                && let Some(pending) = state.pending.take()
            {
                log::debug!("cancelling detection for block {}", id.get());
                cancelled.push(pending.request);
            }
            auto.is_some()
        });
        for request in cancelled {
            self.service.cancel(request);
        }
    }

    fn expire(&mut self, now: Instant) {
        let mut expired = Vec::new();
        for (id, state) in &mut self.blocks {
            if state.pending.as_ref().is_some_and(|p| now >= p.expires)
                && let Some(pending) = state.pending.take()
            {
                log::debug!(
                    "detection request {:?} for block {} timed out",
                    pending.request,
                    id.get()
                );
                expired.push(pending.request);
            }
        }
        for request in expired {
            self.service.cancel(request);
        }
    }

    fn accept(&mut self, doc: &Document, response: DetectionResponse) -> Option<Transaction> {
        let found = self.blocks.iter_mut().find_map(|(id, state)| {
            if state.pending.as_ref().is_some_and(|p| p.request == response.id) {
                state.pending.take().map(|pending| (*id, pending))
            } else {
                None
            }
        });
        let Some((id, pending)) = found else {
            log::debug!("ignoring stale detection response {:?}", response.id);
            return None;
        };

        let Some(detection) = response.result else {
            log::debug!("no detection for block {}", id.get());
            return None;
        };
        if detection.confidence.is_nan()
            || detection.confidence < self.settings.confidence_threshold
        {
            log::debug!(
                "detected {:?} for block {} below threshold ({:.2})",
                detection.language,
                id.get(),
                detection.confidence
            );
            return None;
        }
        let Some(token) = language::canonicalize(&detection.language) else {
            log::debug!("detected label {:?} is not registered", detection.language);
            return None;
        };

        let block = doc.index().block_by_id(id)?;
        if !block.language.auto || block.language.name == token {
            return None;
        }
        let content = doc.block_content(block);
        if content != pending.content
            && changed_enough(&pending.content, &content, self.settings.change_fraction)
        {
            log::debug!(
                "block {} changed while detecting, dropping {token:?}",
                id.get()
            );
            return None;
        }

        log::info!(
            "block {} detected as {token} ({:.2})",
            id.get(),
            detection.confidence
        );
        change_language_with_origin(doc, block, token, true, Origin::AutoLanguage)
    }

    /// Run the gates for the block under the cursor and submit a request if
    /// they pass.
    fn fire(&mut self, doc: &Document, now: Instant) -> Option<Transaction> {
        let index = doc.index();
        let position = doc.current_block_index();
        let id = index.id_at(position)?;
        let block = index.get(position)?;
        if !block.language.auto {
            return None;
        }

        let content = doc.block_content(block);
        let len = content.chars().count();
        if len <= self.settings.min_content_len {
            if !content.is_empty() || block.language.name == doc.default_language() {
                return None;
            }
            if let Some(pending) = self.blocks.remove(&id).and_then(|state| state.pending) {
                self.service.cancel(pending.request);
            }
            log::debug!("block {} emptied, resetting language", id.get());
            return change_language_with_origin(
                doc,
                block,
                doc.default_language(),
                true,
                Origin::AutoLanguage,
            );
        }

        let request = RequestId(self.next_request);
        let expires = now + self.settings.timeout();
        let fraction = self.settings.change_fraction;

        let state = self.blocks.entry(id).or_default();
        if let Some(sample) = &state.sample
            && !changed_enough(sample, &content, fraction)
        {
            log::debug!("block {} barely changed, not detecting", id.get());
            return None;
        }

        let superseded = state.pending.replace(Pending {
            request,
            content: content.clone(),
            expires,
        });
        state.sample = Some(content.clone());
        self.next_request += 1;

        if let Some(previous) = superseded {
            log::debug!(
                "{request:?} supersedes {:?} for block {}",
                previous.request,
                id.get()
            );
            self.service.cancel(previous.request);
        }
        self.service.submit(DetectionRequest {
            id: request,
            content,
        });
        None
    }
}

impl Drop for LanguageDetector {
    fn drop(&mut self) {
        self.close();
    }
}

/// Whether `current` is at least `fraction` of its length away from
/// `previous` in edit distance.
fn changed_enough(previous: &str, current: &str, fraction: f64) -> bool {
    let len = current.chars().count();
    levenshtein(previous, current) as f64 >= fraction * len as f64
}
