//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; the startup line and the per-request
//!   "Received request" line are the fixture's whole observable surface
//! - No metrics endpoint; this is a test fixture, not a gateway

pub mod logging;
