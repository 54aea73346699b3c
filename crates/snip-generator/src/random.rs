use crate::Generator;
use snip_core::ShortCode;
use typed_builder::TypedBuilder;

/// URL-safe alphabet, 64 symbols.
pub const URL_SAFE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

pub const DEFAULT_LENGTH: usize = 6;

/// Generates random short codes from a fixed alphabet.
///
/// With the defaults this yields 6 symbols out of 64, roughly 6.9e10
/// possible codes. Collisions are possible; the shortener retries on
/// conflict.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGenerator {
    #[builder(default = DEFAULT_LENGTH)]
    length: usize,
    #[builder(default = URL_SAFE_ALPHABET)]
    alphabet: &'static [u8],
}

impl RandomGenerator {
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a generator producing codes of `length` symbols.
    ///
    /// The length is clamped into the range a [`ShortCode`] accepts.
    pub fn with_length(length: usize) -> Self {
        Self::builder().length(length.clamp(3, 32)).build()
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let code: String = std::iter::repeat_with(|| {
            self.alphabet[rand::random_range(0..self.alphabet.len())] as char
        })
        .take(self.length)
        .collect();
        ShortCode::new_unchecked(code)
    }
}
