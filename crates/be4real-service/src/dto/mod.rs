//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with normalization and validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    prepare, CreatePostRequest, FeedRequest, LoginRequest, Normalize, ReactRequest,
    RegisterRequest, ResetPasswordRequest, SendVerificationRequest, VerifyUserRequest,
};

pub use responses::{
    CurrentUserResponse, FeedPage, HealthChecks, HealthResponse, PostResponse, ProfileResponse,
    ReactionOutcome, ReadinessResponse, ReconcileReport, TokenResponse,
};
