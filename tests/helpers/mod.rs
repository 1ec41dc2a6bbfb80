//! Test helpers shared across integration test modules.
#![allow(dead_code)]

pub mod engine_helpers;
