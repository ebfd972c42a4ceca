use crate::core::classifier::categorize;
use crate::core::{
    LookupOutcome, LookupRequest, OrderLookup, OrderResult, ResultSink, StatusCategory, Tally,
};
use crate::utils::error::LookupError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// One counter per category, shared by every unit of a run.
#[derive(Debug, Default)]
struct SharedTally {
    counts: [AtomicU64; StatusCategory::ALL.len()],
}

impl SharedTally {
    fn record(&self, category: StatusCategory) {
        self.counts[category.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Only called once the join set is drained; task joins give the
    /// happens-before edge for every increment.
    fn snapshot(&self) -> Tally {
        let mut counts = [0u64; StatusCategory::ALL.len()];
        for (slot, counter) in counts.iter_mut().zip(self.counts.iter()) {
            *slot = counter.load(Ordering::Relaxed);
        }
        Tally::from_counts(counts)
    }
}

/// Runs one lookup per request concurrently and tallies the outcomes.
pub struct FanOutAggregator<L: OrderLookup, S: ResultSink> {
    lookup: Arc<L>,
    sink: Arc<S>,
    max_in_flight: Option<usize>,
}

impl<L: OrderLookup + 'static, S: ResultSink + 'static> FanOutAggregator<L, S> {
    /// Unbounded fan-out: every request is in flight at once.
    pub fn new(lookup: L, sink: S) -> Self {
        Self::from_shared(Arc::new(lookup), Arc::new(sink))
    }

    pub fn from_shared(lookup: Arc<L>, sink: Arc<S>) -> Self {
        Self {
            lookup,
            sink,
            max_in_flight: None,
        }
    }

    /// Caps the number of lookups in flight. `None` or `Some(0)` means no cap.
    pub fn with_max_in_flight(mut self, max_in_flight: Option<usize>) -> Self {
        self.max_in_flight = max_in_flight.filter(|n| *n > 0);
        self
    }

    pub fn max_in_flight(&self) -> Option<usize> {
        self.max_in_flight
    }

    /// Returns once every unit has finished. Failures never abort the batch,
    /// so the tally total always equals `requests.len()`.
    pub async fn run(&self, requests: Vec<LookupRequest>) -> Tally {
        let tally = Arc::new(SharedTally::default());
        let gate = self.max_in_flight.map(|n| Arc::new(Semaphore::new(n)));
        let mut units = JoinSet::new();
        let mut order_ids = HashMap::with_capacity(requests.len());

        tracing::info!(
            "🚀 Looking up {} orders (max in flight: {})",
            requests.len(),
            self.max_in_flight
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unbounded".to_string())
        );

        for request in requests {
            let lookup = Arc::clone(&self.lookup);
            let sink = Arc::clone(&self.sink);
            let tally = Arc::clone(&tally);
            let gate = gate.clone();
            let order_id = request.order_id.clone();

            let handle = units.spawn(async move {
                // acquire only errors once the semaphore is closed, which never happens here
                let _permit = match gate {
                    Some(gate) => gate.acquire_owned().await.ok(),
                    None => None,
                };

                let outcome = lookup.lookup(&request).await;
                let category = categorize(&outcome);

                let result = OrderResult {
                    order_id: request.order_id,
                    category,
                    outcome,
                };
                sink.emit(&result);
                tally.record(category);
            });
            order_ids.insert(handle.id(), order_id);
        }

        while let Some(joined) = units.join_next_with_id().await {
            match joined {
                Ok((id, ())) => {
                    order_ids.remove(&id);
                }
                Err(e) => {
                    // the unit never reached emit/record, so report it here
                    let order_id = order_ids.remove(&e.id()).unwrap_or_default();
                    tracing::error!(order_id = %order_id, "Lookup task did not complete: {}", e);

                    let result = OrderResult {
                        order_id,
                        category: StatusCategory::LookupFailed,
                        outcome: LookupOutcome::Failure {
                            cause: LookupError::Task(e.to_string()),
                        },
                    };
                    self.sink.emit(&result);
                    tally.record(StatusCategory::LookupFailed);
                }
            }
        }

        let result = tally.snapshot();
        tracing::info!(
            "✅ Finished {} lookups ({} failed)",
            result.total(),
            result.get(StatusCategory::LookupFailed)
        );
        result
    }
}
