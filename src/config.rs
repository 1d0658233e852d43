//! Handshake timing constants and deadline arithmetic.

use chrono::Utc;
use std::time::Duration;

/// Maximum time the UI layer is given to apply the flash effect and report
/// completion. 3 seconds accommodates slow screen-brightness ramps on
/// low-end devices while keeping an unresponsive UI from stalling capture
/// indefinitely.
pub const APPLY_TIMEOUT: Duration = Duration::from_secs(3);

/// Compute the advisory expiration deadline for an apply cycle starting now.
///
/// Returned as a Unix timestamp in milliseconds, the unit completion
/// handles carry.
pub fn expiration_time_millis(timeout: Duration) -> i64 {
    Utc::now().timestamp_millis() + timeout.as_millis() as i64
}

/// Signed milliseconds remaining until `expiration_time_millis`.
///
/// Negative once the deadline has passed.
pub fn remaining_millis(expiration_time_millis: i64) -> i64 {
    expiration_time_millis - Utc::now().timestamp_millis()
}
