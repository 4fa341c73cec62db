pub mod chart;

pub use chart::{plot_history, render_history};
