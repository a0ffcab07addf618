//! Tests for the token services

mod issuer_tests;
mod key_pool_tests;
mod publisher_tests;
