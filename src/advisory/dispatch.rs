//! Background advisory requests
//!
//! Each request runs on its own thread and reports back over a channel,
//! tagged with the round it was made for. Results for any other round are
//! dropped on receipt, so a slow reply can never land on a newer game.

use super::{AdvisoryProvider, Analysis, StrategyReview};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// A completed advisory request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryUpdate {
    Analysis(Option<Analysis>),
    FunFact(Option<String>),
}

#[derive(Debug)]
struct Tagged {
    round_id: u64,
    update: AdvisoryUpdate,
}

/// Runs advisory calls off the UI thread
pub struct AdvisoryDispatcher {
    provider: Arc<dyn AdvisoryProvider>,
    tx: Sender<Tagged>,
    rx: Receiver<Tagged>,
}

impl AdvisoryDispatcher {
    #[must_use]
    pub fn new(provider: Arc<dyn AdvisoryProvider>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { provider, tx, rx }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    /// Request a strategy review for `round_id`
    ///
    /// Returns `false` without spawning anything when no service is available.
    pub fn request_analysis(&self, round_id: u64, review: StrategyReview) -> bool {
        self.spawn(round_id, "analysis", move |provider| {
            AdvisoryUpdate::Analysis(provider.analyze_strategy(&review))
        })
    }

    /// Request a fun fact about `number` for `round_id`
    pub fn request_fun_fact(&self, round_id: u64, number: i64) -> bool {
        self.spawn(round_id, "fun_fact", move |provider| {
            AdvisoryUpdate::FunFact(provider.fun_fact(number))
        })
    }

    /// Drain finished requests, keeping only those for `current_round`
    pub fn poll(&self, current_round: u64) -> Vec<AdvisoryUpdate> {
        self.rx
            .try_iter()
            .filter_map(|tagged| Self::accept(tagged, current_round))
            .collect()
    }

    /// Block until a result for `current_round` arrives or `timeout` passes
    pub fn wait(&self, current_round: u64, timeout: Duration) -> Option<AdvisoryUpdate> {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(left) {
                Ok(tagged) => {
                    if let Some(update) = Self::accept(tagged, current_round) {
                        return Some(update);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn accept(tagged: Tagged, current_round: u64) -> Option<AdvisoryUpdate> {
        if tagged.round_id == current_round {
            Some(tagged.update)
        } else {
            debug!(
                stale = tagged.round_id,
                current = current_round,
                "Discarding stale advisory result"
            );
            None
        }
    }

    fn spawn<F>(&self, round_id: u64, kind: &'static str, call: F) -> bool
    where
        F: FnOnce(&dyn AdvisoryProvider) -> AdvisoryUpdate + Send + 'static,
    {
        if !self.provider.is_available() {
            return false;
        }

        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("advisory-{kind}"))
            .spawn(move || {
                let update = call(provider.as_ref());
                // The receiver is gone once the app has exited
                let _ = tx.send(Tagged { round_id, update });
            });

        match spawned {
            Ok(_) => {
                debug!(round = round_id, kind, "Advisory request started");
                true
            }
            Err(e) => {
                warn!(error = %e, kind, "Could not start advisory request");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::NullAdvisor;
    use std::sync::Mutex;

    /// Provider answering from canned values, optionally held until released
    struct FakeAdvisor {
        gate: Mutex<()>,
    }

    impl AdvisoryProvider for FakeAdvisor {
        fn analyze_strategy(&self, review: &StrategyReview) -> Option<Analysis> {
            let _held = self.gate.lock().ok()?;
            Some(Analysis::new(
                format!("{} guesses", review.guesses.len()),
                f64::from(u8::try_from(review.guesses.len()).unwrap_or(5)),
            ))
        }

        fn fun_fact(&self, number: i64) -> Option<String> {
            let _held = self.gate.lock().ok()?;
            Some(format!("{number} is a number."))
        }
    }

    fn review(guesses: Vec<i64>) -> StrategyReview {
        StrategyReview {
            secret: 7,
            range_min: 1,
            range_max: 10,
            guesses,
        }
    }

    #[test]
    fn result_for_current_round_is_delivered() {
        let dispatcher = AdvisoryDispatcher::new(Arc::new(FakeAdvisor {
            gate: Mutex::new(()),
        }));
        assert!(dispatcher.request_analysis(3, review(vec![5, 8, 7])));

        let update = dispatcher.wait(3, Duration::from_secs(5)).unwrap();
        let AdvisoryUpdate::Analysis(Some(analysis)) = update else {
            panic!("expected an analysis, got {update:?}");
        };
        assert_eq!(analysis.feedback, "3 guesses");
        assert_eq!(analysis.rating, 3);
    }

    #[test]
    fn stale_result_is_dropped() {
        let provider = Arc::new(FakeAdvisor {
            gate: Mutex::new(()),
        });
        let dispatcher = AdvisoryDispatcher::new(provider.clone());

        // Hold the provider so the old round's answer arrives after the new round starts
        let held = provider.gate.lock().unwrap();
        assert!(dispatcher.request_fun_fact(1, 42));
        drop(held);

        assert!(dispatcher.wait(2, Duration::from_millis(500)).is_none());
        assert!(dispatcher.poll(2).is_empty());
        assert!(dispatcher.poll(1).is_empty());
    }

    #[test]
    fn unavailable_provider_spawns_nothing() {
        let dispatcher = AdvisoryDispatcher::new(Arc::new(NullAdvisor));
        assert!(!dispatcher.is_available());
        assert!(!dispatcher.request_analysis(1, review(vec![5])));
        assert!(!dispatcher.request_fun_fact(1, 5));
        assert!(dispatcher.wait(1, Duration::from_millis(50)).is_none());
    }
}
