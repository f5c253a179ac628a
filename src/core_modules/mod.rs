pub mod condition_catalog;
pub mod condition_scorer;
pub mod feature_extractor;
pub mod pixel;
pub mod pixel_buffer;
pub mod region;
pub mod result_assembler;
pub mod utils;
