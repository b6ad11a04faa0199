//! Process exit codes (shell and BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Generic failure, used when a failure carries no code of its own
pub const FAILURE: i32 = 1;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;

/// Command resolved to something that cannot be executed
pub const NOT_EXECUTABLE: i32 = 126;

/// Command not found
pub const NOT_FOUND: i32 = 127;
