//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When fixture images or limits change, update only this file.

// ============================================================================
// Server Lifecycle
// ============================================================================

/// Maximum time to wait for a spawned server to answer `GET /`
pub const SERVER_READY_TIMEOUT_MS: u64 = 5_000;

/// Delay between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

/// Maximum time to wait for a single MCP response
pub const RESPONSE_TIMEOUT_MS: u64 = 10_000;

/// Largest canvas the test server accepts
pub const TEST_MAX_RENDER_DIMENSION: u32 = 1_000;

// ============================================================================
// Fixture Images
// ============================================================================

/// Solid burnt orange, classified entirely as warm
pub const WARM_IMAGE: &str = "warm.png";
pub const WARM_RGB: [u8; 3] = [200, 100, 50];

/// Solid sky blue, classified entirely as cool
pub const COOL_IMAGE: &str = "cool.png";
pub const COOL_RGB: [u8; 3] = [40, 90, 220];

/// Bytes that are not any image format
pub const CORRUPT_IMAGE: &str = "corrupt.png";

/// Path inside the fixture directory that is never created
pub const MISSING_IMAGE: &str = "does-not-exist.png";

/// Side of the square fixture images
pub const FIXTURE_IMAGE_SIZE: u32 = 64;
