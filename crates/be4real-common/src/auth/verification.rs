//! One-time account verification codes

use rand::Rng;

/// Codes are zero-padded six digit strings
pub const VERIFICATION_CODE_LEN: usize = 6;

/// Generate a random zero-padded six digit code
pub fn generate_verification_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

/// Check the shape of a submitted code
pub fn is_verification_code(code: &str) -> bool {
    code.len() == VERIFICATION_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}
