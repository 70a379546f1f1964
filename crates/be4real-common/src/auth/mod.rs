//! Authentication utilities

mod jwt;
mod password;
mod verification;

pub use jwt::{AccessToken, Claims, JwtService};
pub use password::{hash_password, validate_password_length, verify_password};
pub use verification::{generate_verification_code, is_verification_code, VERIFICATION_CODE_LEN};
