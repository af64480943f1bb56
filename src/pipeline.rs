use tokio::sync::mpsc;
use tokio::task;
use tracing::{debug, warn};

use crate::classifier::{ClassifierAdapter, SequenceModel};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::landmarks::Detection;
use crate::session::{GestureSession, GestureUpdate, InferenceRequest};

/// Running pipeline: detections go in, gesture updates come out.
///
/// Internally: one session loop (the sole owner of the window state) fed by
/// the detection channel, and one blocking worker task owning the model.
/// The worker's request channel has capacity 1; the session guarantees at
/// most one outstanding inference, so frame delivery never waits on the
/// model.
pub struct GesturePipeline {
    detections: mpsc::Sender<Detection>,
    updates: mpsc::Receiver<GestureUpdate>,
}

impl GesturePipeline {
    pub fn spawn<M>(model: M, mut session: GestureSession, config: &PipelineConfig) -> Self
    where
        M: SequenceModel + 'static,
    {
        let (detection_tx, mut detection_rx) =
            mpsc::channel::<Detection>(config.detection_capacity);
        let (update_tx, update_rx) = mpsc::channel::<GestureUpdate>(config.update_capacity);
        let (request_tx, mut request_rx) = mpsc::channel::<InferenceRequest>(1);
        let (result_tx, mut result_rx) = mpsc::channel::<Result<i64>>(1);

        let mut adapter = ClassifierAdapter::new(model);
        task::spawn_blocking(move || {
            while let Some(request) = request_rx.blocking_recv() {
                let outcome = adapter.classify(&request.frames);
                if result_tx.blocking_send(outcome).is_err() {
                    break;
                }
            }
            debug!("inference worker stopped");
        });

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    detection = detection_rx.recv() => {
                        let Some(detection) = detection else { break };
                        let outcome = session.on_detection(detection.as_ref());
                        if let Some(request) = outcome.request {
                            forward(&request_tx, request);
                        }
                        if update_tx.send(outcome.update).await.is_err() {
                            break;
                        }
                    }
                    result = result_rx.recv() => {
                        let Some(result) = result else { break };
                        let outcome = session.on_inference_result(result);
                        debug!(
                            index = outcome.result.index,
                            label = ?outcome.result.label,
                            "classification resolved"
                        );
                        if let Some(request) = outcome.request {
                            forward(&request_tx, request);
                        }
                        if update_tx.send(outcome.update).await.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("session loop stopped");
        });

        Self {
            detections: detection_tx,
            updates: update_rx,
        }
    }

    /// Sender for the external detector to push per-frame detections into.
    pub fn detections(&self) -> mpsc::Sender<Detection> {
        self.detections.clone()
    }

    pub async fn next_update(&mut self) -> Option<GestureUpdate> {
        self.updates.recv().await
    }

    pub fn into_parts(self) -> (mpsc::Sender<Detection>, mpsc::Receiver<GestureUpdate>) {
        (self.detections, self.updates)
    }
}

fn forward(request_tx: &mpsc::Sender<InferenceRequest>, request: InferenceRequest) {
    // Capacity 1 and at most one outstanding inference: a full channel here
    // means the worker died, not that it is busy.
    if request_tx.try_send(request).is_err() {
        warn!("inference worker unavailable, dropping window");
    }
}
