//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error, including invalid generator input
pub const USAGE: i32 = 64;

/// Data format error (degenerate fraction where a value is required)
pub const DATAERR: i32 = 65;

/// Internal software error (arithmetic invariant violated, overflow)
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
