// Path: crates/contract/src/lib.rs
#![forbid(unsafe_code)]

//! # XVault Contract
//!
//! The deterministic operation dispatcher: one handler per operation kind,
//! each following the same pipeline. Parse and validate the payload, build
//! the signing preimage, authenticate the signer, enforce the per-round rate
//! limit, authorize against vault state, apply the mutation, drive the token
//! adapter, persist, and emit an audit record. The outer boundary converts
//! every failure into the wire failure envelope exactly once.
//!
//! Replica determinism is the design constraint throughout: handlers never
//! consult wall clocks, randomness, or ambient state. Every input is the
//! request, the round key, and the store.

pub mod audit;
pub mod dispatch;
mod handlers;
pub mod limiter;
pub mod token;

pub use audit::{AuditRecord, AuditSink, TracingAuditSink};
pub use dispatch::{ContractConfig, Dispatcher, Request};
pub use limiter::RateLimiter;
pub use token::{TokenAdapter, TokenMode, TokenOutcome};
