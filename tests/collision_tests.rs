use trunc_md5::{find_collision, find_collision_with_config, hash, Error, SearchConfig, Strategy};

#[test]
fn test_collision_small_widths() {
    for num_bits in 1..15 {
        let collision = find_collision(num_bits).unwrap();
        assert_eq!(
            hash(&collision.first, num_bits).unwrap(),
            hash(&collision.second, num_bits).unwrap(),
            "num_bits = {num_bits}"
        );
        assert_ne!(collision.first, collision.second);
    }
}

#[test]
fn test_one_bit_pigeonhole() {
    // three candidates, two possible hash values
    let collision = find_collision(1).unwrap();
    assert!(collision.iterations <= 3);
}

#[test]
fn test_known_first_collisions() {
    let cases = [
        (1, "", "\u{0}", 2),
        (2, "\u{0}", "\u{2}", 4),
        (8, "\u{17}", "(", 42),
        (12, "\u{84}", "\u{b0}", 178),
        (16, "\u{1f}", "\u{d1}", 211),
    ];
    for (num_bits, first, second, iterations) in cases {
        let collision = find_collision(num_bits).unwrap();
        assert_eq!(collision.first, first, "num_bits = {num_bits}");
        assert_eq!(collision.second, second, "num_bits = {num_bits}");
        assert_eq!(collision.iterations, iterations, "num_bits = {num_bits}");
    }
}

#[test]
fn test_sequential_matches_parallel() {
    let sequential = SearchConfig::default().strategy(Strategy::Sequential);
    let parallel = SearchConfig::default().strategy(Strategy::Parallel);
    for num_bits in [4, 12, 20] {
        assert_eq!(
            find_collision_with_config(num_bits, &sequential).unwrap(),
            find_collision_with_config(num_bits, &parallel).unwrap(),
        );
    }
}

#[test]
fn test_collision_spans_batches() {
    // 32-bit collisions need tens of thousands of candidates, more than one batch
    let collision = find_collision(32).unwrap();
    assert!(collision.iterations > 1 << 14);
    assert_eq!(
        hash(&collision.first, 32).unwrap(),
        hash(&collision.second, 32).unwrap()
    );
}

#[test]
fn test_budget_exhaustion() {
    let config = SearchConfig::default().max_iterations(16);
    let err = find_collision_with_config(64, &config).unwrap_err();
    assert_eq!(err, Error::SearchExhausted { iterations: 16 });
}

#[test]
fn test_invalid_widths() {
    assert!(find_collision(0).unwrap_err().is_input());
    assert!(find_collision(129).unwrap_err().is_input());
}
