//! Progress reporting for the build and partition phases.
//!
//! Observers only watch; nothing they do feeds back into the algorithm.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    BuildStarted { nodes: usize, candidate_pairs: u64 },
    EdgeAdded { a: u32, b: u32, angle_deg: f64 },
    BuildFinished { edges: usize, evaluated_pairs: u64 },
    PartitionFinished { clusters: usize },
}

pub trait ProgressObserver {
    fn on_event(&self, event: &ProgressEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Forwards events to `tracing`; per-edge events go out at trace level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_event(&self, event: &ProgressEvent) {
        match *event {
            ProgressEvent::BuildStarted { nodes, candidate_pairs } => {
                tracing::info!(nodes, candidate_pairs, "building street graph");
            }
            ProgressEvent::EdgeAdded { a, b, angle_deg } => {
                tracing::trace!(a, b, angle_deg, "edge");
            }
            ProgressEvent::BuildFinished { edges, evaluated_pairs } => {
                tracing::info!(edges, evaluated_pairs, "street graph built");
            }
            ProgressEvent::PartitionFinished { clusters } => {
                tracing::info!(clusters, "streets grouped");
            }
        }
    }
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent),
{
    fn on_event(&self, event: &ProgressEvent) {
        self(event)
    }
}
