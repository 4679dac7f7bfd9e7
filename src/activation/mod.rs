pub mod activation;

pub use activation::{dsigmoid, sigmoid};
