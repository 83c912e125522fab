//! Storage key constants.

/// Keys persisted by the shell. Names match what the embedded web app
/// receives so values can be forwarded without renaming.
pub struct StorageKeys;

impl StorageKeys {
    /// Stable provider user identifier
    pub const USER_ID: &'static str = "userID";

    /// Display name, only delivered on first authorization
    pub const FULL_NAME: &'static str = "fullName";

    /// Email, only delivered on first authorization
    pub const EMAIL: &'static str = "email";

    /// Backend access token
    pub const ACCESS_TOKEN: &'static str = "accessToken";

    /// Backend refresh token
    pub const REFRESH_TOKEN: &'static str = "refreshToken";

    /// Last provider authorization code (single-use)
    pub const AUTHORIZATION_CODE: &'static str = "authorizationCode";

    /// "true" once the user logged out or deleted their account
    pub const IS_LOGGED_OUT: &'static str = "isLoggedOut";

    /// Every identity and token key, i.e. everything a logout removes.
    pub const SESSION_KEYS: [&'static str; 6] = [
        Self::USER_ID,
        Self::FULL_NAME,
        Self::EMAIL,
        Self::ACCESS_TOKEN,
        Self::REFRESH_TOKEN,
        Self::AUTHORIZATION_CODE,
    ];
}
