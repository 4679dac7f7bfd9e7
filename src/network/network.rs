use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::activation::{dsigmoid, sigmoid};
use crate::error::NetworkError;
use crate::math::matrix::Matrix;

/// A feed-forward network with one sigmoid hidden layer.
///
/// The input and hidden layers each carry one extra bias unit whose
/// activation is pinned to 1.0; it takes part in the weighted sums like any
/// other unit, so the learned weights can encode a non-zero threshold.
///
/// Activation vectors are owned by the network and overwritten in place on
/// every [`process`](Network::process) call. A `Network` must only be driven
/// from one thread at a time; independent networks share no state.
pub struct Network {
    input_size: usize,  // declared inputs + 1 bias unit
    hidden_size: usize, // declared hidden units + 1 bias unit
    output_size: usize,

    input_values: Vec<f64>,
    hidden_values: Vec<f64>,
    output_values: Vec<f64>,

    /// input_size × hidden_size; `data[i][j]` connects input unit i to
    /// hidden unit j.
    pub input_weights: Matrix,
    /// hidden_size × output_size; `data[j][k]` connects hidden unit j to
    /// output unit k.
    pub output_weights: Matrix,
    /// Previous weight change per input-layer connection, same shape as
    /// `input_weights`.
    pub input_momentum: Matrix,
    /// Previous weight change per output-layer connection, same shape as
    /// `output_weights`.
    pub output_momentum: Matrix,
}

impl Network {
    /// Builds a network with `n_inputs` inputs, `n_hidden` hidden units and
    /// `n_outputs` outputs, drawing every initial weight uniformly from
    /// [-1, 1] with the supplied RNG. Zero dimensions are permitted, though
    /// degenerate.
    pub fn with_rng<R: Rng>(
        n_inputs: usize,
        n_hidden: usize,
        n_outputs: usize,
        rng: &mut R,
    ) -> Network {
        let input_size = n_inputs + 1; // +1 for bias
        let hidden_size = n_hidden + 1; // +1 for bias

        Network {
            input_size,
            hidden_size,
            output_size: n_outputs,
            input_values: vec![1.0; input_size],
            hidden_values: vec![1.0; hidden_size],
            output_values: vec![1.0; n_outputs],
            input_weights: Matrix::uniform(input_size, hidden_size, rng),
            output_weights: Matrix::uniform(hidden_size, n_outputs, rng),
            input_momentum: Matrix::zeros(input_size, hidden_size),
            output_momentum: Matrix::zeros(hidden_size, n_outputs),
        }
    }

    /// Builds a network with weights drawn from the thread-local RNG.
    pub fn new(n_inputs: usize, n_hidden: usize, n_outputs: usize) -> Network {
        Network::with_rng(n_inputs, n_hidden, n_outputs, &mut rand::thread_rng())
    }

    /// Builds a reproducible network: the same seed and dimensions always
    /// yield the same initial weights.
    pub fn seeded(n_inputs: usize, n_hidden: usize, n_outputs: usize, seed: u64) -> Network {
        Network::with_rng(n_inputs, n_hidden, n_outputs, &mut StdRng::seed_from_u64(seed))
    }

    /// Number of input units, bias included.
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Number of hidden units, bias included.
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Number of output units.
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Forward pass: activates the network on `inputs` and returns the
    /// output activations.
    ///
    /// The returned slice borrows network-owned storage that the next
    /// `process` call overwrites; copy it if it must outlive that.
    pub fn process(&mut self, inputs: &[f64]) -> Result<&[f64], NetworkError> {
        let declared = self.input_size - 1;
        if inputs.len() != declared {
            return Err(NetworkError::InvalidInput {
                expected: declared,
                got: inputs.len(),
            });
        }

        // The bias slot at the end keeps its fixed 1.0 activation.
        self.input_values[..declared].copy_from_slice(inputs);

        for j in 0..self.hidden_size - 1 {
            let mut sum = 0.0;
            for i in 0..self.input_size {
                sum += self.input_values[i] * self.input_weights.data[i][j];
            }
            self.hidden_values[j] = sigmoid(sum);
        }

        for k in 0..self.output_size {
            let mut sum = 0.0;
            for j in 0..self.hidden_size {
                sum += self.hidden_values[j] * self.output_weights.data[j][k];
            }
            self.output_values[k] = sigmoid(sum);
        }

        Ok(&self.output_values)
    }

    /// Backward pass: propagates the error against `targets` through the
    /// network and updates both weight matrices in place.
    ///
    /// Must be called right after a [`process`](Network::process) call on
    /// this network; it reads that call's activations. Prefer
    /// [`train_pattern`](Network::train_pattern) where possible, which keeps
    /// the two passes paired.
    ///
    /// Each connection moves by `learning_rate * change +
    /// momentum_factor * previous_change`, and the momentum store is then
    /// overwritten with `change` unconditionally, even when
    /// `momentum_factor` is zero.
    pub fn back_propagate(
        &mut self,
        targets: &[f64],
        learning_rate: f64,
        momentum_factor: f64,
    ) -> Result<(), NetworkError> {
        if targets.len() != self.output_size {
            return Err(NetworkError::TargetSize {
                expected: self.output_size,
                got: targets.len(),
            });
        }

        let mut output_deltas = vec![0.0; self.output_size];
        for k in 0..self.output_size {
            output_deltas[k] =
                dsigmoid(self.output_values[k]) * (targets[k] - self.output_values[k]);
        }

        // Hidden deltas must be taken from the pre-update output weights,
        // so this runs before any weight is touched. The bias unit is
        // skipped: its activation is pinned at 1.0, so dsigmoid is zero and
        // the weights feeding it never move.
        let mut hidden_deltas = vec![0.0; self.hidden_size - 1];
        for j in 0..self.hidden_size - 1 {
            let mut err = 0.0;
            for k in 0..self.output_size {
                err += output_deltas[k] * self.output_weights.data[j][k];
            }
            hidden_deltas[j] = dsigmoid(self.hidden_values[j]) * err;
        }

        for j in 0..self.hidden_size {
            for k in 0..self.output_size {
                let change = output_deltas[k] * self.hidden_values[j];
                self.output_weights.data[j][k] +=
                    learning_rate * change + momentum_factor * self.output_momentum.data[j][k];
                self.output_momentum.data[j][k] = change;
            }
        }

        for i in 0..self.input_size {
            for j in 0..self.hidden_size - 1 {
                let change = hidden_deltas[j] * self.input_values[i];
                self.input_weights.data[i][j] +=
                    learning_rate * change + momentum_factor * self.input_momentum.data[i][j];
                self.input_momentum.data[i][j] = change;
            }
        }

        Ok(())
    }

    /// One full training step on a single example: forward pass on `input`,
    /// backward pass against `target`.
    pub fn train_pattern(
        &mut self,
        input: &[f64],
        target: &[f64],
        learning_rate: f64,
        momentum_factor: f64,
    ) -> Result<(), NetworkError> {
        self.process(input)?;
        self.back_propagate(target, learning_rate, momentum_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_adds_a_bias_unit_to_input_and_hidden_layers() {
        let net = Network::seeded(2, 3, 1, 0);
        assert_eq!(net.input_size(), 3);
        assert_eq!(net.hidden_size(), 4);
        assert_eq!(net.output_size(), 1);
        assert_eq!(net.input_weights.rows, 3);
        assert_eq!(net.input_weights.cols, 4);
        assert_eq!(net.output_weights.rows, 4);
        assert_eq!(net.output_weights.cols, 1);
    }

    #[test]
    fn construction_starts_with_unit_activations_and_zero_momentum() {
        let net = Network::seeded(3, 2, 2, 1);
        assert!(net.input_values.iter().all(|&v| v == 1.0));
        assert!(net.hidden_values.iter().all(|&v| v == 1.0));
        assert!(net.output_values.iter().all(|&v| v == 1.0));
        assert!(net.input_momentum.data.iter().flatten().all(|&v| v == 0.0));
        assert!(net.output_momentum.data.iter().flatten().all(|&v| v == 0.0));
    }

    #[test]
    fn construction_with_same_seed_is_reproducible() {
        let a = Network::seeded(4, 5, 2, 123);
        let b = Network::seeded(4, 5, 2, 123);
        assert_eq!(a.input_weights, b.input_weights);
        assert_eq!(a.output_weights, b.output_weights);
    }

    #[test]
    fn construction_permits_zero_dimensions() {
        let mut net = Network::seeded(0, 0, 0, 0);
        assert_eq!(net.input_size(), 1);
        assert_eq!(net.hidden_size(), 1);
        assert_eq!(net.output_size(), 0);
        let out = net.process(&[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn process_rejects_wrong_input_length() {
        let mut net = Network::seeded(2, 2, 1, 0);
        let err = net.process(&[1.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(err, NetworkError::InvalidInput { expected: 2, got: 3 });
    }

    #[test]
    fn back_propagate_rejects_wrong_target_length() {
        let mut net = Network::seeded(2, 2, 1, 0);
        net.process(&[1.0, 0.0]).unwrap();
        let err = net.back_propagate(&[1.0, 0.0], 0.5, 0.1).unwrap_err();
        assert_eq!(err, NetworkError::TargetSize { expected: 1, got: 2 });
    }

    #[test]
    fn process_is_deterministic_with_fixed_weights() {
        let mut net = Network::seeded(3, 4, 2, 9);
        let first = net.process(&[0.2, -1.5, 3.0]).unwrap().to_vec();
        let second = net.process(&[0.2, -1.5, 3.0]).unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn process_output_lies_in_the_open_unit_interval() {
        let mut net = Network::seeded(2, 3, 2, 4);
        for input in [[0.0, 0.0], [100.0, -100.0], [-1e6, 1e6]] {
            let out = net.process(&input).unwrap();
            assert!(out.iter().all(|&v| v > 0.0 && v < 1.0), "{out:?}");
        }
    }

    #[test]
    fn process_never_overwrites_the_bias_activations() {
        let mut net = Network::seeded(2, 2, 1, 3);
        net.process(&[0.7, -0.3]).unwrap();
        assert_eq!(net.input_values[2], 1.0);
        assert_eq!(net.hidden_values[2], 1.0);
        assert_eq!(&net.input_values[..2], &[0.7, -0.3]);
    }

    #[test]
    fn back_propagate_stores_each_change_in_the_momentum_matrices() {
        let mut net = Network::seeded(2, 2, 1, 99);
        let input_before = net.input_weights.clone();
        let output_before = net.output_weights.clone();

        net.process(&[0.0, 1.0]).unwrap();
        // With learning_rate 1.0 and no momentum the weight increment is
        // exactly the change that must land in the momentum store.
        net.back_propagate(&[1.0], 1.0, 0.0).unwrap();

        for j in 0..net.hidden_size() {
            for k in 0..net.output_size() {
                let change = net.output_weights.data[j][k] - output_before.data[j][k];
                assert!((net.output_momentum.data[j][k] - change).abs() < 1e-12);
            }
        }
        for i in 0..net.input_size() {
            for j in 0..net.hidden_size() - 1 {
                let change = net.input_weights.data[i][j] - input_before.data[i][j];
                assert!((net.input_momentum.data[i][j] - change).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn momentum_factor_adds_the_previous_change_to_the_update() {
        let mut plain = Network::seeded(2, 3, 1, 5);
        let mut with_momentum = Network::seeded(2, 3, 1, 5);
        let input = [1.0, 0.0];
        let target = [1.0];

        // Identical first step leaves both networks with the same weights
        // and the same stored changes.
        plain.train_pattern(&input, &target, 0.5, 0.0).unwrap();
        with_momentum.train_pattern(&input, &target, 0.5, 0.0).unwrap();
        let output_momentum = plain.output_momentum.clone();
        let input_momentum = plain.input_momentum.clone();

        // Second step differs only in the momentum factor, so the weight
        // gap must be exactly factor * previous change.
        plain.train_pattern(&input, &target, 0.5, 0.0).unwrap();
        with_momentum.train_pattern(&input, &target, 0.5, 0.4).unwrap();

        for j in 0..plain.hidden_size() {
            for k in 0..plain.output_size() {
                let gap =
                    with_momentum.output_weights.data[j][k] - plain.output_weights.data[j][k];
                assert!((gap - 0.4 * output_momentum.data[j][k]).abs() < 1e-12);
            }
        }
        for i in 0..plain.input_size() {
            for j in 0..plain.hidden_size() - 1 {
                let gap = with_momentum.input_weights.data[i][j] - plain.input_weights.data[i][j];
                assert!((gap - 0.4 * input_momentum.data[i][j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn weights_into_the_hidden_bias_unit_never_move() {
        let mut net = Network::seeded(2, 2, 1, 11);
        let bias_col = net.hidden_size() - 1;
        let before: Vec<f64> = net
            .input_weights
            .data
            .iter()
            .map(|row| row[bias_col])
            .collect();

        for _ in 0..10 {
            net.train_pattern(&[1.0, 1.0], &[0.0], 0.6, 0.4).unwrap();
        }

        let after: Vec<f64> = net
            .input_weights
            .data
            .iter()
            .map(|row| row[bias_col])
            .collect();
        assert_eq!(before, after);
    }
}
