//! Authentication utilities

mod account_token;
mod jwt;
mod password;

pub use account_token::{AccountTokenGenerator, TokenPurpose};
pub use jwt::{Claims, JwtService, TokenPair, TokenType};
pub use password::{
    ensure_passwords_match, hash_password, validate_password_strength, verify_password,
    MAX_PASSWORD_LEN,
};
