#![no_main]

use cubedh::{act, generate_matrix_tuple, generate_tensor, Params, Side};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    // Shape from the first three bytes, kept small so iterations stay fast
    let d = 2 * (usize::from(data[0] % 3) + 1);
    let n = usize::from(data[1] % 3) + 1;
    let kappa = 8 * (u32::from(data[2] % 8) + 1);
    let params = Params::new(d, n, kappa).unwrap();

    // Split the remainder into three seeds
    let rest = &data[3..];
    let third = rest.len() / 3;
    let (seed_t, tail) = rest.split_at(third);
    let (seed_a, seed_b) = tail.split_at(third);

    let t = generate_tensor(seed_t, &params);
    let a = generate_matrix_tuple(seed_a, &params);
    let b = generate_matrix_tuple(seed_b, &params);

    let ab = act(&act(&t, &b, Side::Second).unwrap(), &a, Side::First).unwrap();
    let ba = act(&act(&t, &a, Side::First).unwrap(), &b, Side::Second).unwrap();

    // They must be identical
    assert_eq!(ab, ba, "First-half and second-half actions differ by order!");
});
