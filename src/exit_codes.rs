//! Exit codes.

/// Process exit codes of the `dfs-inotify` binary.
pub mod exit {
    pub const SUCCESS: i32 = 0;
    pub const OPERATIONAL_FAILURE: i32 = 1;
    pub const CORRUPT_LOG: i32 = 2;
    pub const CHECK_VIOLATIONS: i32 = 3;
}
