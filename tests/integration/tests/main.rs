//! End-to-End Integration Tests
//!
//! These tests drive the complete identity provider router in process,
//! backed by the in-memory stores.

mod common;
mod consent_flows;
mod signout_flows;
