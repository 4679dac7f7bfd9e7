use cortex_nn::{train, Network, Pattern};

fn main() {
    env_logger::init();

    let patterns = vec![
        Pattern::new(vec![0.0, 0.0], vec![0.0]),
        Pattern::new(vec![0.0, 1.0], vec![1.0]),
        Pattern::new(vec![1.0, 0.0], vec![1.0]),
        Pattern::new(vec![1.0, 1.0], vec![0.0]),
    ];

    let mut network = Network::seeded(2, 3, 1, 0);
    train(&mut network, &patterns, 10_000, 0.6, 0.4).expect("patterns are well-formed");

    for pattern in &patterns {
        let output = network
            .process(&pattern.input)
            .expect("input length matches the network")[0];
        println!(
            "Input: {:?} -> Output: {:.4} (target {})",
            pattern.input, output, pattern.target[0]
        );
    }
}
