use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{BackendError, RoundCount, RoundResult, Tally};
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use crate::fair_bit::BitSource;
use crate::opponent::Opponent;

/// Play `rounds` rounds of guess against `opponent`.
///
/// Any backend error aborts the batch; a partial tally is never returned.
pub async fn run_batch<G, O>(
    rounds: RoundCount,
    guess_source: &mut G,
    opponent: &O,
) -> Result<Tally, BackendError>
where
    G: BitSource + ?Sized,
    O: Opponent + ?Sized,
{
    let span = tracing::info_span!("batch", rounds = rounds.get(), opponent = %opponent.describe());

    async move {
        let mut tally = Tally::new();

        for round in 0..rounds.get() {
            let guess = guess_source.next_bit();
            let outcome = match opponent.resolve(guess).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    metrics::counter!("coinflip_backend_errors_total").increment(1);
                    tracing::error!(
                        round,
                        error = %e,
                        code = %e.code(),
                        "Batch aborted"
                    );
                    return Err(e);
                }
            };
            tally.record(&RoundResult::new(guess, outcome));
        }

        metrics::counter!("coinflip_rounds_total").increment(tally.rounds());
        tracing::info!(
            agree = tally.agree(),
            disagree = tally.disagree(),
            "Batch completed"
        );
        Ok(tally)
    }
    .instrument(span)
    .await
}

/// Machine-readable summary of one batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub backend: String,
    pub rounds: u32,
    pub elapsed_ms: u64,
    pub tally: Tally,
    pub percent_agree: f64,
    pub percent_disagree: f64,
}

impl BatchReport {
    pub fn new(
        backend: impl Into<String>,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        rounds: RoundCount,
        tally: Tally,
    ) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            started_at,
            backend: backend.into(),
            rounds: rounds.get(),
            elapsed_ms: elapsed.as_millis() as u64,
            tally,
            percent_agree: tally.percent_agree(),
            percent_disagree: tally.percent_disagree(),
        }
    }
}
