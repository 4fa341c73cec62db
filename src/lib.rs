pub mod math;
pub mod activation;
pub mod error;
pub mod model;
pub mod loss;
pub mod data;
pub mod train;
pub mod report;
pub mod run;
pub mod utils;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::{sigmoid, sigmoid_derivative};
pub use error::{Error, Result};
pub use model::mlp::{ForwardPass, Gradients, Mlp};
pub use loss::bce::{accuracy, BceLoss};
pub use data::dataset::Dataset;
pub use data::split::{Partitions, Preprocessor};
pub use train::{EpochStats, History, TestReport, Tester, TrainConfig, Trainer};
pub use report::chart::plot_history;
pub use run::{run, RunOutcome, RunParams};
