use bolero::check;
use cubedh::{act, generate_matrix_tuple, generate_tensor, Side};

use super::commutativity::pick_params;

#[test]
fn fuzz_action_is_additive() {
    check!()
        .with_type::<(u8, bool, Vec<u8>, Vec<u8>, Vec<u8>)>()
        .for_each(|input| {
            let (selector, first, seed_1, seed_2, seed_m) = input;
            let params = pick_params(*selector);
            let side = if *first { Side::First } else { Side::Second };

            let t1 = generate_tensor(seed_1, &params);
            let t2 = generate_tensor(seed_2, &params);
            let m = generate_matrix_tuple(seed_m, &params);

            let sum = t1.add_mod(&t2).unwrap_or_else(|e| panic!("{e}"));
            let lhs = act(&sum, &m, side).unwrap_or_else(|e| panic!("{e}"));

            let rhs = act(&t1, &m, side)
                .and_then(|x| act(&t2, &m, side).and_then(|y| x.add_mod(&y)))
                .unwrap_or_else(|e| panic!("{e}"));

            assert_eq!(lhs, rhs, "Action must be additive over Z/2^kappa");
        });
}
