// src/constants.rs

/// Seconds between two heartbeat checkpoints while tracking is on
pub const HEARTBEAT_INTERVAL_SECS: u64 = 5;

/// Seconds of input inactivity before the user counts as idle
pub const IDLE_DETECTION_SECS: u64 = 120;

/// Smallest idle detection interval a browser accepts
pub const MIN_IDLE_DETECTION_SECS: u64 = 15;

/// Largest idle detection interval accepted (4 hours)
pub const MAX_IDLE_DETECTION_SECS: u64 = 4 * 60 * 60;

/// Largest heartbeat period accepted
pub const MAX_HEARTBEAT_INTERVAL_SECS: u64 = 60;

/// Storage key holding the domain -> seconds mapping
pub const LEDGER_KEY: &str = "websiteActivity";

/// Domain label used when a URL cannot be attributed to a host
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// Chrome limits native messaging to 1MB (1024 * 1024 bytes)
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Chrome's `windows.WINDOW_ID_NONE`: no browser window has focus
pub const WINDOW_ID_NONE: i64 = -1;

/// Capacity of the tracker command channel
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;
