//! Integration tests against a locally running server
//!
//! Run with: cargo test -- --ignored

mod api_tests;
mod borrowing_tests;
