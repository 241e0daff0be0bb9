//! Currency normalization - native caps to validated USD caps.

mod normalizer;

pub use normalizer::CurrencyNormalizer;
