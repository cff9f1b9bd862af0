use crate::constants::{
    MAX_HEARTBEAT_INTERVAL_SECS, MAX_IDLE_DETECTION_SECS, MIN_IDLE_DETECTION_SECS,
};
use crate::error::AppError;

/// Validate the heartbeat period in seconds.
pub fn validate_heartbeat_secs(secs: u64) -> Result<u64, AppError> {
    if secs == 0 {
        return Err(AppError::InvalidInput {
            field: "heartbeat_interval_secs",
            reason: "must be positive".into(),
        });
    }
    if secs > MAX_HEARTBEAT_INTERVAL_SECS {
        return Err(AppError::InvalidInput {
            field: "heartbeat_interval_secs",
            reason: format!("cannot exceed {MAX_HEARTBEAT_INTERVAL_SECS} seconds"),
        });
    }
    Ok(secs)
}

/// Validate the idle detection threshold in seconds.
pub fn validate_idle_threshold_secs(secs: u64) -> Result<u64, AppError> {
    if !(MIN_IDLE_DETECTION_SECS..=MAX_IDLE_DETECTION_SECS).contains(&secs) {
        return Err(AppError::InvalidInput {
            field: "idle_threshold_secs",
            reason: format!("must be {MIN_IDLE_DETECTION_SECS}-{MAX_IDLE_DETECTION_SECS} seconds"),
        });
    }
    Ok(secs)
}

/// Parse a whole number of seconds from a configuration string.
pub fn parse_secs(field: &'static str, raw: &str) -> Result<u64, AppError> {
    raw.trim().parse().map_err(|_| AppError::InvalidInput {
        field,
        reason: format!("'{}' is not a whole number of seconds", raw.trim()),
    })
}
