//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (invalid draft, failed validation)
pub const DATAERR: i32 = 65;

/// Cannot open input (missing document, unknown node or course)
pub const NOINPUT: i32 = 66;

/// Service unavailable (course store failure)
pub const UNAVAILABLE: i32 = 69;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
