//! Endpoint paths and client constants
//!
//! Paths are relative to the LMS base URL and are kept byte-for-byte as the
//! LMS routes them (including trailing slashes where the LMS requires them).

// LMS endpoints
pub const URL_COURSES_LIST: &str = "/api/courses/v1/courses";
pub const URL_BULK_ENROLL: &str = "/api/bulk_enroll/v1/bulk_enroll/";
pub const URL_REGISTRATION_VALIDATION: &str = "/api/user/v1/validation/registration";
pub const URL_ACCOUNT_REGISTRATION: &str = "/api/user/v1/account/registration/";

// OAuth2 token endpoint
pub const OAUTH2_PATH: &str = "/oauth2";
pub const OAUTH2_ACCESS_TOKEN_PATH: &str = "/oauth2/access_token";
pub const ACCESS_TOKEN_SUFFIX: &str = "/access_token";

/// Cached tokens are considered expired this many seconds early.
pub const ACCESS_TOKEN_EXPIRED_THRESHOLD_SECONDS: i64 = 5;

// Transport defaults
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3050;

// User agent
pub const CLIENT_PRODUCT_NAME: &str = "openedx-rest-client";
pub const UNKNOWN_CLIENT_NAME: &str = "unknown_client_name";
