//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    ActivateRequest, ChangePasswordRequest, CreateOptionRequest, CreatePollRequest,
    ForgetPasswordRequest, LoginRequest, MediaRef, PageRequest, RefreshTokenRequest,
    RegisterRequest, ResetPasswordRequest, UpdateOptionRequest, UpdateProfileRequest,
    VerifyTokenRequest,
};

pub use responses::{
    AccountResponse, AuthResponse, HealthChecks, HealthResponse, MediaResponse, OptionResponse,
    PageResponse, PollResponse, ReadinessResponse,
};

pub use mappers::polls_with_options;
