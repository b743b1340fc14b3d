//! One-time confirmation code generation.

use rand::Rng;

/// Number of decimal digits in a confirmation code.
pub const CODE_DIGITS: usize = 6;

/// Generates a random zero-padded numeric confirmation code, e.g. `"042917"`.
pub fn generate_confirmation_code() -> String {
    let upper = 10u32.pow(CODE_DIGITS as u32);
    let value = rand::rng().random_range(0..upper);
    format!("{value:0width$}", width = CODE_DIGITS)
}

/// Whether a user-supplied value has the shape of a confirmation code.
pub fn looks_like_code(value: &str) -> bool {
    value.len() == CODE_DIGITS && value.chars().all(|c| c.is_ascii_digit())
}
