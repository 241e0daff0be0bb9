//! Assets module - the normalized output unit of the pipeline.

mod assets_model;


pub use assets_model::{canonical_name, AssetType, NormalizedAsset, RankedAsset};
