/// Logistic function, mapping any real to the open interval (0, 1).
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid expressed in activation space: given
/// `y = sigmoid(x)`, returns `sigmoid'(x) = y * (1 - y)`.
///
/// The backward pass only ever has the activations at hand, never the
/// pre-activation sums, so this is the form it consumes.
pub fn dsigmoid(y: f64) -> f64 {
    y * (1.0 - y)
}
