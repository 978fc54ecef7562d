//! Authentication service models

pub mod payload;
pub mod user;

// Re-export for convenience
pub use payload::{
    ChangePasswordRequest, DetailResponse, LoginRequest, ProfileResponse, RefreshTokenRequest,
    SignupRequest, SignupResponse, TokenResponse, UpdateProfileRequest,
};
pub use user::{NewUser, UpdateUser, User, normalize_email};
