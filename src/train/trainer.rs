use log::{debug, trace};

use crate::error::NetworkError;
use crate::network::network::Network;

/// A single labeled training example: an input vector of the network's
/// declared input count paired with a target vector of its output count.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl Pattern {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> Pattern {
        Pattern { input, target }
    }
}

/// Runs `epochs` full passes over `patterns`, applying one forward and one
/// backward pass per pattern in sequence order.
///
/// No shuffling, no convergence check, no early stopping: exactly
/// `epochs * patterns.len()` weight updates are performed. Momentum carries
/// across epochs. The first ill-shaped pattern aborts the run with the
/// network left in the state the preceding updates produced.
pub fn train(
    network: &mut Network,
    patterns: &[Pattern],
    epochs: usize,
    learning_rate: f64,
    momentum_factor: f64,
) -> Result<(), NetworkError> {
    debug!(
        "training on {} patterns for {} epochs (learning_rate = {}, momentum_factor = {})",
        patterns.len(),
        epochs,
        learning_rate,
        momentum_factor
    );

    for epoch in 0..epochs {
        for pattern in patterns {
            network.train_pattern(&pattern.input, &pattern.target, learning_rate, momentum_factor)?;
        }
        trace!("epoch {}/{} complete", epoch + 1, epochs);
    }

    Ok(())
}
