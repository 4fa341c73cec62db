pub mod csv;
pub mod dataset;
pub mod split;
pub mod synthetic;

pub use dataset::Dataset;
pub use split::{train_val_split, Partitions, Preprocessor};
