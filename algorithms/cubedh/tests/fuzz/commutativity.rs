use bolero::check;
use cubedh::{act, generate_matrix_tuple, generate_tensor, Params, Side};

/// Small parameter sets indexed by an arbitrary selector byte.
pub fn pick_params(selector: u8) -> Params {
    let sets = [
        Params::REFERENCE,
        Params::WIDE,
        Params::new(2, 3, 8).unwrap_or_default(),
        Params::new(6, 2, 64).unwrap_or_default(),
    ];
    sets[usize::from(selector) % sets.len()]
}

#[test]
fn fuzz_actions_commute() {
    check!()
        .with_type::<(u8, Vec<u8>, Vec<u8>, Vec<u8>)>()
        .for_each(|input| {
            let (selector, seed_t, seed_a, seed_b) = input;
            let params = pick_params(*selector);

            let t = generate_tensor(seed_t, &params);
            let a = generate_matrix_tuple(seed_a, &params);
            let b = generate_matrix_tuple(seed_b, &params);

            // =================================================================
            // PATH AB: B first, then A
            // =================================================================

            let t_b = act(&t, &b, Side::Second).unwrap_or_else(|e| panic!("{e}"));
            let t_ab = act(&t_b, &a, Side::First).unwrap_or_else(|e| panic!("{e}"));

            // =================================================================
            // PATH BA: A first, then B
            // =================================================================

            let t_a = act(&t, &a, Side::First).unwrap_or_else(|e| panic!("{e}"));
            let t_ba = act(&t_a, &b, Side::Second).unwrap_or_else(|e| panic!("{e}"));

            assert_eq!(t_ab, t_ba, "Actions on disjoint halves must commute");
        });
}
