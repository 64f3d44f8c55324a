#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Command-level tests: CLI commands run against an in-process deployment.

mod sandbox;

mod batches;
mod roles;
