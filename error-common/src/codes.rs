// Error codes implementation
// Stable codes surfaced in API error bodies; never renumber an existing code.

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
}

pub mod authentication {
    pub const INVALID_CREDENTIALS: &str = "AUTH_2001";
    pub const TOKEN_INVALID: &str = "AUTH_2002";
    pub const EMAIL_ALREADY_EXISTS: &str = "AUTH_2003";
}

pub mod authorization {
    pub const ACCESS_DENIED: &str = "AUTHZ_3001";
}

pub mod resource {
    pub const NOT_FOUND: &str = "RESOURCE_4001";
}

pub mod internal {
    pub const STORAGE_FAILURE: &str = "INTERNAL_5001";
    pub const UNEXPECTED: &str = "INTERNAL_5002";
}
