//! Constants shared by the library and the server.

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionId";

/// Absolute session lifetime in milliseconds (24 hours, not sliding).
pub const SESSION_TTL_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Largest accepted upload payload in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Separator between the owner id and the per-owner sequence in a composite file id.
pub const FILE_ID_SEPARATOR: char = '_';

/// Sequence scope used for user ids.
pub const USER_SEQUENCE: &str = "users";

/// Prefix of the per-owner file sequence scopes.
pub const FILE_SEQUENCE_PREFIX: &str = "files:";
