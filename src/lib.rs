pub mod math;
pub mod activation;
pub mod error;
pub mod network;
pub mod train;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use error::NetworkError;
pub use network::network::Network;
pub use train::trainer::{train, Pattern};
