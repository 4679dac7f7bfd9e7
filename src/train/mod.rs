pub mod trainer;

pub use trainer::{train, Pattern};
