use std::collections::VecDeque;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::detection::{
    DetectionBackend, DetectionRequest, DetectionResponse, DetectionService, RequestId,
};

/// Runs the backend synchronously in `submit`.
pub struct InlineService<B> {
    backend: B,
    ready: VecDeque<DetectionResponse>,
}

impl<B: DetectionBackend> InlineService<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            ready: VecDeque::new(),
        }
    }
}

impl<B: DetectionBackend> DetectionService for InlineService<B> {
    fn submit(&mut self, request: DetectionRequest) {
        let result = self.backend.detect(&request.content);
        self.ready.push_back(DetectionResponse {
            id: request.id,
            result,
        });
    }

    fn try_recv(&mut self) -> Option<DetectionResponse> {
        self.ready.pop_front()
    }

    fn cancel(&mut self, id: RequestId) {
        self.ready.retain(|response| response.id != id);
    }
}

/// Runs the backend on a dedicated thread.
///
/// The thread exits once the request channel is closed, which happens on
/// [`DetectionService::shutdown`] or drop.
pub struct WorkerService {
    requests: Option<Sender<DetectionRequest>>,
    responses: Receiver<DetectionResponse>,
    handle: Option<JoinHandle<()>>,
}

impl WorkerService {
    pub fn spawn<B>(backend: B) -> std::io::Result<Self>
    where
        B: DetectionBackend + Send + 'static,
    {
        let (request_tx, request_rx) = unbounded::<DetectionRequest>();
        let (response_tx, response_rx) = unbounded();

        let handle = thread::Builder::new()
            .name("blockpad-detect".to_string())
            .spawn(move || {
                for request in request_rx.iter() {
                    let result = backend.detect(&request.content);
                    let response = DetectionResponse {
                        id: request.id,
                        result,
                    };
                    if response_tx.send(response).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            handle: Some(handle),
        })
    }

    /// Block until a response arrives or `timeout` passes.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<DetectionResponse> {
        self.responses.recv_timeout(timeout).ok()
    }
}

impl DetectionService for WorkerService {
    fn submit(&mut self, request: DetectionRequest) {
        let Some(requests) = &self.requests else {
            log::debug!("detection worker is shut down, dropping {:?}", request.id);
            return;
        };
        if requests.send(request).is_err() {
            log::debug!("detection worker exited, request dropped");
        }
    }

    fn try_recv(&mut self) -> Option<DetectionResponse> {
        self.responses.try_recv().ok()
    }

    fn shutdown(&mut self) {
        self.requests = None;
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::warn!("detection worker panicked");
        }
    }
}

impl Drop for WorkerService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{Detection, HeuristicBackend};
    use pretty_assertions::assert_eq;

    fn request(id: u64, content: &str) -> DetectionRequest {
        DetectionRequest {
            id: RequestId(id),
            content: content.to_string(),
        }
    }

    #[test]
    fn inline_answers_in_order() {
        let mut service = InlineService::new(HeuristicBackend);
        service.submit(request(1, "{\"a\": 1}"));
        service.submit(request(2, "hello"));

        let first = service.try_recv().unwrap();
        assert_eq!(first.id, RequestId(1));
        assert_eq!(first.result.map(|d| d.language), Some("json".to_string()));
        assert_eq!(service.try_recv().unwrap().result, None);
        assert_eq!(service.try_recv(), None);
    }

    #[test]
    fn inline_cancel_drops_queued_response() {
        let mut service = InlineService::new(HeuristicBackend);
        service.submit(request(1, "{\"a\": 1}"));
        service.cancel(RequestId(1));
        assert_eq!(service.try_recv(), None);
    }

    #[test]
    fn worker_answers_off_thread() {
        let mut service = WorkerService::spawn(HeuristicBackend).unwrap();
        service.submit(request(7, "SELECT id FROM users;"));

        let response = service.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(response.id, RequestId(7));
        assert_eq!(response.result, Some(Detection::new("sql", 0.85)));
    }

    #[test]
    fn worker_shutdown_joins_and_drops_later_requests() {
        let mut service = WorkerService::spawn(HeuristicBackend).unwrap();
        service.shutdown();
        assert!(service.handle.is_none());

        service.submit(request(1, "{\"a\": 1}"));
        assert_eq!(service.try_recv(), None);
    }
}
