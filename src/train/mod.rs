pub mod epoch_stats;
pub mod loop_fn;
pub mod tester;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::{EpochStats, History};
pub use loop_fn::{batch_ranges, evaluate, train_loop};
pub use tester::{TestReport, Tester};
pub use train_config::{ConfigOverrides, TrainConfig};
pub use trainer::Trainer;
