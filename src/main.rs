use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use gestura::classifier::{OnnxSequenceModel, SequenceModel};
use gestura::config::PipelineConfig;
use gestura::labels::LabelTable;
use gestura::pipeline::GesturePipeline;
use gestura::session::{GestureSession, GestureUpdate};
use gestura::sim::{demo_labels, SimulatedHandSource, SimulatedModel};

/// How many synthetic frames the demo feeds before shutting down (~10s at
/// camera rate).
const DEMO_FRAMES: u32 = 300;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            PipelineConfig::load(&path).with_context(|| format!("loading config {path}"))?
        }
        None => PipelineConfig::default(),
    };

    let labels = if config.label_path.exists() {
        LabelTable::from_path(&config.label_path)?
    } else {
        warn!(path = ?config.label_path, "label asset missing, using built-in demo labels");
        demo_labels()
    };
    info!(classes = labels.len(), "label table loaded");

    let model: Box<dyn SequenceModel + Send> = if config.model_path.exists() {
        info!(path = ?config.model_path, "loading ONNX gesture model");
        Box::new(OnnxSequenceModel::new(
            &config.model_path,
            config.feature_width,
        )?)
    } else {
        warn!(path = ?config.model_path, "model artifact missing, running the simulated classifier");
        Box::new(SimulatedModel::new(labels.len().max(1)))
    };

    let session = GestureSession::new(labels, config.facing);
    let pipeline = GesturePipeline::spawn(model, session, &config);
    let (detections, mut updates) = pipeline.into_parts();

    // Stand-in for the external detector: synthetic hands at camera rate,
    // with a periodic dropout to exercise the no-hand path.
    let feeder = tokio::spawn(async move {
        let mut source = SimulatedHandSource::with_dropout_every(45);
        let mut ticker = tokio::time::interval(Duration::from_millis(33));
        for _ in 0..DEMO_FRAMES {
            ticker.tick().await;
            if detections.send(source.next_detection()).await.is_err() {
                break;
            }
        }
    });

    let mut last: Option<GestureUpdate> = None;
    while let Some(update) = updates.recv().await {
        if last.as_ref() != Some(&update) {
            match (&update.label, update.hand_detected) {
                (Some(label), _) => info!(%label, "gesture recognized"),
                (None, true) => info!("predicting..."),
                (None, false) => info!("no hand detected"),
            }
            last = Some(update);
        }
    }

    feeder.await?;
    Ok(())
}
