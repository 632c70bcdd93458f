//! Storage key constants.

/// Keys of the durable slots used by the session client.
pub struct StorageKeys;

impl StorageKeys {
    /// Bearer access token (JSON-encoded string)
    pub const ACCESS_TOKEN: &'static str = "accessToken";

    /// Refresh token (JSON-encoded string)
    pub const REFRESH_TOKEN: &'static str = "refreshToken";
}
