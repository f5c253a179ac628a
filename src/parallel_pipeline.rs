// THEORY:
// The batch analyzer spreads independent images over a fixed pool of worker
// tasks. Every stage of an analysis is pure, so workers share nothing but a
// cloned `AnalysisPipeline`; no locks are needed.
//
// Layout: a single dispatcher receives tasks and hands them to workers
// round-robin over per-worker channels. Each task carries a `oneshot` sender,
// so callers await exactly their own result, and `analyze_batch` returns
// results in input order regardless of which worker finished first.

use crate::config::AnalyzerConfig;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::core_modules::result_assembler::AnalysisResult;
use crate::error::AnalysisError;
use crate::pipeline::AnalysisPipeline;
use futures::future::join_all;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

type AnalysisReply = Result<AnalysisResult, AnalysisError>;

pub struct AnalysisTask {
    pub buffer: PixelBuffer,
    pub result_sender: oneshot::Sender<AnalysisReply>,
}

pub struct WorkerPool {
    task_sender: mpsc::UnboundedSender<AnalysisTask>,
    dispatcher: JoinHandle<()>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `worker_count` workers plus a dispatcher. Must be called inside a
    /// tokio runtime.
    pub fn new(pipeline: AnalysisPipeline, worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<AnalysisTask>();

        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..worker_count)
            .map(|_| mpsc::unbounded_channel::<AnalysisTask>())
            .unzip();

        // Spawn dispatcher
        let dispatcher = tokio::spawn(async move {
            let mut worker_idx = 0;
            while let Some(task) = task_receiver.recv().await {
                // A closed worker channel drops the task, which fails its oneshot.
                let _ = worker_senders[worker_idx].send(task);
                worker_idx = (worker_idx + 1) % worker_count;
            }
        });

        // Spawn workers
        let workers = worker_receivers
            .into_iter()
            .enumerate()
            .map(|(worker_id, mut worker_receiver)| {
                let worker_pipeline = pipeline.clone();
                tokio::spawn(async move {
                    while let Some(task) = worker_receiver.recv().await {
                        let result = worker_pipeline.analyze(&task.buffer);
                        debug!(worker_id, ok = result.is_ok(), "batch item analysed");
                        let _ = task.result_sender.send(result);
                    }
                })
            })
            .collect();

        Self {
            task_sender,
            dispatcher,
            workers,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub async fn submit(&self, buffer: PixelBuffer) -> AnalysisReply {
        let (result_sender, result_receiver) = oneshot::channel();

        self.task_sender
            .send(AnalysisTask {
                buffer,
                result_sender,
            })
            .map_err(|_| AnalysisError::WorkerPool("failed to send task to worker pool"))?;

        result_receiver
            .await
            .map_err(|_| AnalysisError::WorkerPool("failed to receive result from worker"))?
    }

    /// Stops accepting work and waits for in-flight tasks to finish.
    pub async fn shutdown(self) {
        drop(self.task_sender);
        let _ = self.dispatcher.await;
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

/// Analyses many images concurrently on a `WorkerPool`.
pub struct BatchAnalyzer {
    pool: WorkerPool,
}

impl BatchAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let worker_count = config.worker_count;
        Self {
            pool: WorkerPool::new(AnalysisPipeline::new(config), worker_count),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }

    pub async fn analyze(&self, buffer: PixelBuffer) -> AnalysisReply {
        self.pool.submit(buffer).await
    }

    /// One result per input, in input order.
    pub async fn analyze_batch(&self, buffers: Vec<PixelBuffer>) -> Vec<AnalysisReply> {
        join_all(buffers.into_iter().map(|buffer| self.pool.submit(buffer))).await
    }

    pub async fn shutdown(self) {
        self.pool.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::Pixel;

    fn config(workers: usize) -> AnalyzerConfig {
        AnalyzerConfig {
            worker_count: workers,
            ..AnalyzerConfig::default()
        }
    }

    fn palette() -> Vec<PixelBuffer> {
        [
            (255, 0, 0),
            (128, 128, 128),
            (30, 20, 10),
            (240, 220, 210),
            (180, 60, 70),
            (0, 0, 0),
            (90, 140, 200),
        ]
        .into_iter()
        .map(|(r, g, b)| PixelBuffer::uniform(12, 9, Pixel::rgb(r, g, b)).unwrap())
        .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn batch_results_keep_input_order() {
        let analyzer = BatchAnalyzer::new(config(3));
        let pipeline = AnalysisPipeline::default();
        let buffers = palette();

        let results = analyzer.analyze_batch(buffers.clone()).await;

        assert_eq!(results.len(), buffers.len());
        for (result, buffer) in results.into_iter().zip(&buffers) {
            let batched = result.unwrap();
            let direct = pipeline.analyze(buffer).unwrap();
            assert_eq!(batched.primary, direct.primary);
            assert_eq!(batched.all, direct.all);
        }
        analyzer.shutdown().await;
    }

    #[tokio::test]
    async fn empty_batches_are_empty() {
        let analyzer = BatchAnalyzer::new(config(2));
        assert!(analyzer.analyze_batch(Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn zero_workers_still_make_a_pool() {
        let analyzer = BatchAnalyzer::new(config(0));
        assert_eq!(analyzer.worker_count(), 1);
        let buffer = PixelBuffer::uniform(2, 2, Pixel::rgb(10, 10, 10)).unwrap();
        assert!(analyzer.analyze(buffer).await.is_ok());
    }
}
