pub mod bce;

pub use bce::{accuracy, BceLoss};
