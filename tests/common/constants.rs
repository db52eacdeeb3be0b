//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the fake external catalog data changes, update only this file.

// ============================================================================
// Fake Gutendex Records
// ============================================================================

/// Source id of "Frankenstein" in the fake external catalog
pub const FRANKENSTEIN_SOURCE_ID: u32 = 84;

/// Source id of "A Christmas Carol" in the fake external catalog
pub const CHRISTMAS_CAROL_SOURCE_ID: u32 = 46;

/// Source id for which the fake external catalog answers with a server error
pub const FAILING_SOURCE_ID: u32 = 500;

/// Source id unknown to the fake external catalog
pub const MISSING_SOURCE_ID: u32 = 999_999;

// ============================================================================
// Timeouts
// ============================================================================

/// Per-request timeout of the test client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Timeout of the server under test when talking to the fake Gutendex
pub const GUTENDEX_TIMEOUT_SECS: u64 = 5;

/// How long to wait for the server to become ready
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;
