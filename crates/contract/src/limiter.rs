// Path: crates/contract/src/limiter.rs

//! Per-round, per-address rate limiting for mutating operations.
//!
//! The runtime hands every operation a round key; the limiter keeps counters
//! for exactly one round at a time. Seeing a different round key resets all
//! counters, so only one round's counters are ever live and replicas that
//! process the same ordered requests agree on every verdict.

use std::collections::HashMap;
use xvault_types::error::VaultError;

/// Maximum mutating operations per actor per round.
pub const MAX_OPS_PER_ROUND: u32 = 5;

/// The process-wide rate limiter. Owned by the dispatcher, never ambient.
#[derive(Debug, Default)]
pub struct RateLimiter {
    current_round: String,
    per_address: HashMap<String, u32>,
}

impl RateLimiter {
    /// Creates a limiter with no live round.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one mutating operation for `actor` in `round_key`.
    ///
    /// Fails with `RateLimitExceeded` once the actor's budget for the round
    /// is spent; the failed attempt is not recorded.
    pub fn enforce(&mut self, actor: &str, round_key: &str) -> Result<(), VaultError> {
        if round_key != self.current_round {
            self.current_round = round_key.to_string();
            self.per_address.clear();
        }
        let count = self.per_address.entry(actor.to_string()).or_insert(0);
        if *count >= MAX_OPS_PER_ROUND {
            tracing::warn!(
                target: "xvault::limiter",
                actor = %actor,
                round = %round_key,
                "rate limit exceeded"
            );
            return Err(VaultError::RateLimitExceeded(format!(
                "{actor} exceeded {MAX_OPS_PER_ROUND} operations in round {round_key}"
            )));
        }
        *count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xvault_types::error::ErrorCode;

    #[test]
    fn fifth_operation_passes_and_sixth_fails() {
        let mut limiter = RateLimiter::new();
        for _ in 0..MAX_OPS_PER_ROUND {
            assert!(limiter.enforce("rActor", "55").is_ok());
        }
        assert_eq!(limiter.enforce("rActor", "55").unwrap_err().code(), "RateLimitExceeded");
    }

    #[test]
    fn a_new_round_resets_every_address() {
        let mut limiter = RateLimiter::new();
        for _ in 0..MAX_OPS_PER_ROUND {
            limiter.enforce("rA", "1").unwrap();
            limiter.enforce("rB", "1").unwrap();
        }
        assert!(limiter.enforce("rA", "1").is_err());
        assert!(limiter.enforce("rB", "1").is_err());
        // Round change clears both.
        assert!(limiter.enforce("rA", "2").is_ok());
        assert!(limiter.enforce("rB", "2").is_ok());
    }

    #[test]
    fn addresses_are_limited_independently() {
        let mut limiter = RateLimiter::new();
        for _ in 0..MAX_OPS_PER_ROUND {
            limiter.enforce("rA", "7").unwrap();
        }
        assert!(limiter.enforce("rA", "7").is_err());
        assert!(limiter.enforce("rB", "7").is_ok());
    }
}
