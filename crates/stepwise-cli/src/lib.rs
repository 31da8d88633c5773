//! Stepwise CLI library — command implementations shared by the `stepwise`
//! binary and the integration tests.

pub mod commands;
