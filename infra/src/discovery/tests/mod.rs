//! Tests for remote key set discovery
