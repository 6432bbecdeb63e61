//! # choose-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AccountService, AuthService, MailNotifier, MediaService, OptionService, PollService,
    RetryConfig, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
