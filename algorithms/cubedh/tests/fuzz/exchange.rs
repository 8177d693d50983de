use bolero::check;
use cubedh::{derive_key, replay_exchange, Seeds};

use super::commutativity::pick_params;

#[test]
fn fuzz_replay_agrees_and_is_deterministic() {
    check!()
        .with_type::<(u8, Vec<u8>, Vec<u8>, Vec<u8>)>()
        .for_each(|input| {
            let (selector, tensor, secret_a, secret_b) = input;
            let params = pick_params(*selector);
            let seeds = Seeds {
                tensor: tensor.clone(),
                secret_a: secret_a.clone(),
                secret_b: secret_b.clone(),
            };

            let first = replay_exchange(params, seeds.clone()).unwrap_or_else(|e| panic!("{e}"));
            let second = replay_exchange(params, seeds).unwrap_or_else(|e| panic!("{e}"));

            assert_eq!(first.key, second.key, "Replay must be deterministic");
            assert_eq!(
                first.key,
                derive_key(&first.transcript.shared),
                "Key must be the hash of the shared tensor"
            );
        });
}
