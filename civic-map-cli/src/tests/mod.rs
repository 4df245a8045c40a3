//! Shared test harness modules for the civic map CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod helpers;
mod refresh_unit;
mod search_steps;
