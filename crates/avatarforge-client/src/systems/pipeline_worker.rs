//! Pipeline worker - runs the avatar pipeline off the render thread
//!
//! A dedicated thread owns a current-thread tokio runtime, so every pipeline
//! step is interleaved on one event loop. Bevy systems select the image
//! synchronously (overlapping uploads are refused right there) and then nudge
//! the worker to run.

use avatarforge_common::{
    AvatarConfig, AvatarError, AvatarPipeline, ImageSource, PipelineSnapshot, SceneHost,
};
use bevy::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Messages to the worker thread
enum WorkerJob {
    /// Run the pipeline for the image that was just selected
    Run,
    Shutdown,
}

/// Bevy-side handle to the pipeline and its worker
#[derive(Resource)]
pub struct AvatarPipelineHandle {
    pipeline: Arc<AvatarPipeline>,
    jobs: mpsc::UnboundedSender<WorkerJob>,
    /// UI view of the pipeline state
    pub state: watch::Receiver<PipelineSnapshot>,
}

impl AvatarPipelineHandle {
    /// Build the pipeline and start its worker thread
    pub fn spawn(config: AvatarConfig, scene: Arc<dyn SceneHost>) -> std::io::Result<Self> {
        let pipeline = Arc::new(AvatarPipeline::new(Arc::new(config), scene));
        let state = pipeline.subscribe();
        let (jobs, receiver) = mpsc::unbounded_channel();

        let worker_pipeline = pipeline.clone();
        std::thread::Builder::new()
            .name("avatar-pipeline".to_string())
            .spawn(move || run_worker(worker_pipeline, receiver))?;

        Ok(Self {
            pipeline,
            jobs,
            state,
        })
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        self.state.borrow().clone()
    }

    /// Start a pipeline run for the image at `path`
    pub fn upload(&self, path: PathBuf) -> Result<u64, AvatarError> {
        let run_id = self.pipeline.select_image(ImageSource::File(path))?;

        if self.jobs.send(WorkerJob::Run).is_err() {
            error!("❌ Avatar pipeline worker is gone, upload {} dropped", run_id);
        }
        Ok(run_id)
    }
}

impl Drop for AvatarPipelineHandle {
    fn drop(&mut self) {
        // Not joined: an in-flight request has no timeout and would block exit
        self.pipeline.dispose();
        let _ = self.jobs.send(WorkerJob::Shutdown);
    }
}

fn run_worker(pipeline: Arc<AvatarPipeline>, mut jobs: mpsc::UnboundedReceiver<WorkerJob>) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("❌ Could not start avatar pipeline runtime: {}", e);
            return;
        }
    };

    runtime.block_on(async move {
        info!("🧵 Avatar pipeline worker started");

        while let Some(job) = jobs.recv().await {
            match job {
                WorkerJob::Run => {
                    // Outcome is logged and published by the pipeline itself
                    if let Err(e) = pipeline.run().await {
                        debug!("Avatar run ended with error: {}", e);
                    }
                }
                WorkerJob::Shutdown => break,
            }
        }

        info!("🧵 Avatar pipeline worker stopped");
    });
}
