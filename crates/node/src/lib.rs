// Path: crates/node/src/lib.rs

//! # XVault Node
//!
//! The runtime adapter between the consensus host and the contract core:
//! per-user fd channels in, length-prefixed JSON frames out, plus process
//! bootstrap (configuration, telemetry, state loading, dispatcher wiring).
//!
//! The adapter adds no semantics of its own. Requests are handed to the
//! dispatcher in descriptor order, one at a time to completion, so replicas
//! fed the same ordered rounds emit the same responses and converge on the
//! same state digest.

pub mod framing;
pub mod runtime;
pub mod telemetry;
