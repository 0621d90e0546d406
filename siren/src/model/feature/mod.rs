mod feature_assembler;
mod feature_schema;
mod feature_vector;

pub use feature_assembler::FeatureAssembler;
pub use feature_schema::{FeatureSchema, SCHEMA_VERSION};
pub use feature_vector::FeatureVector;
