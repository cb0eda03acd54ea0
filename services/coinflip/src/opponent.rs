//! Whatever answers the player's guess

use async_trait::async_trait;
use rand::rngs::StdRng;
use shared::{BackendError, Bit};
use simulator::ForcedFlip;
use tokio::sync::Mutex;

use crate::fair_bit::{BitSource, FairBitSource};

#[async_trait]
pub trait Opponent: Send + Sync {
    fn describe(&self) -> String;

    /// Produce the outcome for one round
    async fn resolve(&self, guess: Bit) -> Result<Bit, BackendError>;
}

/// A fair coin that ignores the guess
pub struct FairCoin {
    source: Mutex<FairBitSource<StdRng>>,
}

impl FairCoin {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            source: Mutex::new(FairBitSource::new(seed)),
        }
    }
}

#[async_trait]
impl Opponent for FairCoin {
    fn describe(&self) -> String {
        "fair coin".to_string()
    }

    async fn resolve(&self, _guess: Bit) -> Result<Bit, BackendError> {
        Ok(self.source.lock().await.next_bit())
    }
}

#[async_trait]
impl Opponent for ForcedFlip {
    fn describe(&self) -> String {
        format!("forced flip on {}", self.backend().name())
    }

    async fn resolve(&self, guess: Bit) -> Result<Bit, BackendError> {
        self.flip(guess).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulator::LocalSimulator;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fair_coin_ignores_guess() {
        let coin = FairCoin::new(Some(11));
        let mut outcomes = Vec::new();
        for _ in 0..100 {
            outcomes.push(coin.resolve(Bit::Heads).await.unwrap());
        }
        assert!(outcomes.contains(&Bit::Heads));
        assert!(outcomes.contains(&Bit::Tails));
    }

    #[tokio::test]
    async fn test_forced_flip_opponent() {
        let flip = ForcedFlip::new(Arc::new(LocalSimulator::ideal(Some(3))));
        assert_eq!(flip.describe(), "forced flip on local_simulator");
        assert_eq!(flip.resolve(Bit::Heads).await.unwrap(), Bit::Tails);
        assert_eq!(flip.resolve(Bit::Tails).await.unwrap(), Bit::Heads);
    }
}
