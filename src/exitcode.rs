//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error, or sizes the planner cannot work with
pub const USAGE: i32 = 64;

/// Data format error (malformed inventory)
pub const DATAERR: i32 = 65;

/// Cannot open input (inventory file missing)
pub const NOINPUT: i32 = 66;

/// Service unavailable (no free range, az failed)
pub const UNAVAILABLE: i32 = 69;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
