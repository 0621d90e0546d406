mod dataset;
mod gbrt;
mod metrics;
mod trained_model;
mod trainer;

pub use dataset::{build_dataset, Dataset, TrainingRow};
pub use gbrt::{Gbrt, GbrtParams, TreeNode};
pub use metrics::ValidationMetrics;
pub use trained_model::{TrainedModel, TrainingMetadata};
pub use trainer::{train, TrainerConfig};
