// src/constants.rs
//
// Fixed table of FTP status lines. The codes are the load-bearing part;
// the texts are what clients display.

// Connection responses
pub const RESPONSE_WELCOME: &str = "220 Welcome to ferroftpd";
pub const RESPONSE_GOODBYE: &str = "221 Goodbye";

// Authentication responses
pub const RESPONSE_USERNAME_OK: &str = "331 User name okay, need password";
pub const RESPONSE_LOGIN_OK: &str = "230 User logged in";
pub const RESPONSE_LOGIN_FAILED: &str = "530 Login failed";
pub const RESPONSE_NOT_LOGGED_IN: &str = "530 Please login with USER and PASS";

// File system responses
pub const RESPONSE_OK: &str = "200 OK";
pub const RESPONSE_DIRECTORY_CHANGED: &str = "250 Directory changed";
pub const RESPONSE_DIRECTORY_NOT_FOUND: &str = "550 Directory not found";
pub const RESPONSE_FILE_NOT_FOUND: &str = "550 File not found";
pub const RESPONSE_FILE_EXISTS: &str = "550 File already exists";
pub const RESPONSE_PERMISSION_DENIED: &str = "550 Permission denied";

// Data transfer responses
pub const RESPONSE_DATA_CONNECTION: &str = "150 Opening BINARY mode data connection";
pub const RESPONSE_TRANSFER_COMPLETE: &str = "226 Transfer complete";
pub const RESPONSE_TRANSFER_FAILED: &str = "426 Transfer failed";

// Command responses
pub const RESPONSE_COMMAND_NOT_IMPLEMENTED: &str = "502 Command not implemented";
pub const RESPONSE_SYNTAX_ERROR: &str = "501 Syntax error";
pub const RESPONSE_PARAMETER_ERROR: &str = "504 Parameter not implemented";

// System responses
pub const RESPONSE_SYSTEM_READY: &str = "220 Service ready";
pub const RESPONSE_SYSTEM_SHUTDOWN: &str = "421 Service shutting down";
