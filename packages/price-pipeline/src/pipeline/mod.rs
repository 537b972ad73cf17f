//! The extraction, normalization and conversion pipeline.

pub mod convert;
pub mod extract;
pub mod normalize;
pub mod run;
pub mod stage;

pub use convert::{convert_amount, round_money, MONEY_SCALE};
pub use extract::{extract_listings, parse_document, ListingSelectors};
pub use normalize::{
    normalize_batch, normalize_listing, NormalizationSkip, NormalizedBatch, PriceNormalizer,
};
pub use run::Pipeline;
pub use stage::PipelineStage;
