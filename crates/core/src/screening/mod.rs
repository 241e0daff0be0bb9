//! Record screening - lexicons, drop reasons, and the per-record validator.

mod bounds;
mod lexicons;
mod screening_model;
mod validator;

pub use bounds::MarketCapBounds;
pub use lexicons::{contains_word, Lexicons, ListingTierTable};
pub use screening_model::{DropCategory, DropReason, Verdict};
pub use validator::RecordValidator;
