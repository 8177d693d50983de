#![no_main]

use cubedh::{generate_tensor, Params, Party, Side};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let params = if data[0] & 1 == 0 {
        Params::REFERENCE
    } else {
        Params::WIDE
    };

    let mid = data.len() / 2;
    let base = generate_tensor(&data[..1], &params);
    let alice = Party::from_seed(&params, Side::First, &data[..mid]);
    let bob = Party::from_seed(&params, Side::Second, &data[mid..]);

    let to_bob = alice.public_value(&base).unwrap();
    let to_alice = bob.public_value(&base).unwrap();

    assert_eq!(
        alice.shared_key(&to_alice).unwrap(),
        bob.shared_key(&to_bob).unwrap(),
        "Parties derived different keys!"
    );
});
