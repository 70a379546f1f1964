//! # be4real-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! The two stateful components are the feed pager ([`FeedService`]) and the
//! reaction ledger ([`ReactionService`]); the rest covers accounts, posts,
//! profiles and count reconciliation.

pub mod dto;
pub mod services;

#[cfg(test)]
mod test_support;

pub use services::{
    AuthService, ErrorKind, FeedService, PostService, ReactionService, ReconcileService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};

pub use dto::{
    CreatePostRequest, CurrentUserResponse, FeedPage, FeedRequest, HealthResponse, LoginRequest,
    PostResponse, ProfileResponse, ReactRequest, ReactionOutcome, ReadinessResponse,
    ReconcileReport, RegisterRequest, ResetPasswordRequest, SendVerificationRequest,
    TokenResponse, VerifyUserRequest,
};
