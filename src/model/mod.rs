pub mod mlp;

pub use mlp::{ForwardPass, Gradients, Mlp};
