//! Rule-aligned genetic operators.
//!
//! Hypotheses are variable-length concatenations of `N`-bit rule genomes,
//! so plain bit-position crossover would shear rule boundaries. Two-point
//! crossover here picks its cut points in the second parent at the same
//! offsets *within a rule* as the cuts in the first parent, which keeps
//! every offspring a whole number of rules long.
//!
//! # Operators
//!
//! - [`two_point_crossover`]: offset-matched two-point crossover
//! - [`mutate`]: flip one bit in a fraction of the population and
//!   re-decode each mutated genome from scratch
//!
//! Offspring genomes are decoded chunk by chunk; chunks that are not
//! valid rules are dropped, so an offspring may end up with fewer rules
//! than its genome length suggests, or none at all.
//!
//! # References
//!
//! - De Jong, Spears & Gordon (1993), "Using Genetic Algorithms for
//!   Concept Learning" (GABIL)
//! - Mitchell (1997), *Machine Learning*, §9.3

use super::bits::BitString;
use super::codec::GenomeLayout;
use super::hypothesis::Hypothesis;
use crate::schema::Schema;
use rand::seq::index;
use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// Cut-point pairs `(i*N + d1, j*N + d2)` in a genome of length `len`,
/// keeping only pairs whose first point precedes the second.
pub fn crossover_points(len: usize, rule_width: usize, d1: usize, d2: usize) -> Vec<(usize, usize)> {
    if rule_width == 0 {
        return Vec::new();
    }
    let mut points = Vec::new();
    for i in (0..len).step_by(rule_width) {
        let first = i + d1;
        for j in (0..len).step_by(rule_width) {
            let second = j + d2;
            if first < second && second <= len {
                points.push((first, second));
            }
        }
    }
    points
}

/// Standard two-point splice.
///
/// Returns `a[..p1] + b[q1..q2] + a[p2..]` and `b[..q1] + a[p1..p2] + b[q2..]`.
///
/// # Panics
/// Panics if a cut lies outside its genome or a pair is out of order.
pub fn splice(
    a: &BitString,
    b: &BitString,
    (p1, p2): (usize, usize),
    (q1, q2): (usize, usize),
) -> (BitString, BitString) {
    let mut first = a.slice(0..p1);
    first.extend_from(&b.slice(q1..q2));
    first.extend_from(&a.slice(p2..a.len()));

    let mut second = b.slice(0..q1);
    second.extend_from(&a.slice(p1..p2));
    second.extend_from(&b.slice(q2..b.len()));

    (first, second)
}

/// Offset-matched two-point crossover of two hypotheses.
///
/// Picks distinct cuts `p1 < p2` in the first parent's genome, takes their
/// offsets `d1 = p1 mod N` and `d2 = p2 mod N`, and chooses uniformly among
/// the second parent's cut pairs with the same offsets. Returns `None`
/// (no offspring) when the first genome is shorter than two bits, the
/// second is empty, or no matching cut pair exists.
pub fn two_point_crossover<R: Rng + ?Sized>(
    parent1: &Hypothesis,
    parent2: &Hypothesis,
    layout: &GenomeLayout,
    schema: &Schema,
    rng: &mut R,
) -> Option<(Hypothesis, Hypothesis)> {
    let a = parent1.bit_string();
    let b = parent2.bit_string();
    if a.len() < 2 || b.is_empty() {
        log::trace!("crossover skipped: genome lengths {} and {}", a.len(), b.len());
        return None;
    }

    let cuts = index::sample(rng, a.len(), 2);
    let (p1, p2) = {
        let (x, y) = (cuts.index(0), cuts.index(1));
        (x.min(y), x.max(y))
    };

    let n = layout.rule_width();
    let points = crossover_points(b.len(), n, p1 % n, p2 % n);
    if points.is_empty() {
        log::trace!("crossover skipped: no cut pair with offsets ({}, {})", p1 % n, p2 % n);
        return None;
    }
    let (q1, q2) = points[rng.random_range(0..points.len())];

    let (first, second) = splice(&a, &b, (p1, p2), (q1, q2));
    let first = layout.decode_hypothesis(&first, schema);
    let second = layout.decode_hypothesis(&second, schema);
    Some((Hypothesis::new(first.rules), Hypothesis::new(second.rules)))
}

/// Crosses every pair, collecting both offspring of each successful
/// crossover.
pub fn crossover_pairs<R: Rng + ?Sized>(
    pairs: &[(Hypothesis, Hypothesis)],
    layout: &GenomeLayout,
    schema: &Schema,
    rng: &mut R,
) -> Vec<Hypothesis> {
    let mut offspring = Vec::with_capacity(pairs.len() * 2);
    for (h1, h2) in pairs {
        if let Some((c1, c2)) = two_point_crossover(h1, h2, layout, schema, rng) {
            offspring.push(c1);
            offspring.push(c2);
        }
    }
    offspring
}

// ============================================================================
// Mutation
// ============================================================================

/// Inverts one uniformly chosen bit. Returns its position, or `None` for
/// an empty string.
pub fn flip_bit<R: Rng + ?Sized>(bits: &mut BitString, rng: &mut R) -> Option<usize> {
    if bits.is_empty() {
        return None;
    }
    let pos = rng.random_range(0..bits.len());
    bits.flip(pos);
    Some(pos)
}

/// Flips one bit of `hypothesis`'s genome and replaces its rules with the
/// re-decoded result. Returns the number of rules dropped by decoding.
pub fn mutate_hypothesis<R: Rng + ?Sized>(
    hypothesis: &mut Hypothesis,
    layout: &GenomeLayout,
    schema: &Schema,
    rng: &mut R,
) -> usize {
    let mut bits = hypothesis.bit_string();
    flip_bit(&mut bits, rng);
    let report = layout.decode_hypothesis(&bits, schema);
    hypothesis.set_rules(report.rules);
    report.dropped
}

/// Mutates `round(rate * len)` distinct hypotheses chosen uniformly.
///
/// Returns how many hypotheses were mutated.
pub fn mutate<R: Rng + ?Sized>(
    rate: f64,
    hypotheses: &mut [Hypothesis],
    layout: &GenomeLayout,
    schema: &Schema,
    rng: &mut R,
) -> usize {
    let n = hypotheses.len();
    let count = ((rate * n as f64).round() as usize).min(n);
    if count == 0 {
        return 0;
    }
    for i in index::sample(rng, n, count) {
        mutate_hypothesis(&mut hypotheses[i], layout, schema, rng);
    }
    count
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn tiny() -> Schema {
        Schema::builder()
            .symbolic("a", ["v0", "v1"])
            .symbolic("t", ["t0", "t1"])
            .target("t")
            .build()
            .unwrap()
    }

    fn three_way() -> Schema {
        Schema::builder()
            .symbolic("a", ["x", "y"])
            .symbolic("t", ["p", "q", "r"])
            .target("t")
            .build()
            .unwrap()
    }

    fn hypothesis(layout: &GenomeLayout, schema: &Schema, genome: &str) -> Hypothesis {
        let report = layout.decode_hypothesis(&genome.parse().unwrap(), schema);
        assert_eq!(report.dropped, 0, "test genome {genome} must be all valid rules");
        Hypothesis::new(report.rules)
    }

    // ---- Crossover points ----

    #[test]
    fn test_crossover_points_keep_offsets() {
        assert_eq!(crossover_points(6, 3, 1, 2), vec![(1, 2), (1, 5), (4, 5)]);
        assert_eq!(crossover_points(6, 3, 2, 0), vec![(2, 3)]);
        assert_eq!(crossover_points(3, 3, 2, 1), vec![]);
        assert_eq!(crossover_points(0, 3, 0, 1), vec![]);
    }

    #[test]
    fn test_splice() {
        let a: BitString = "000000".parse().unwrap();
        let b: BitString = "111111111".parse().unwrap();
        let (c, d) = splice(&a, &b, (1, 5), (4, 8));
        assert_eq!(c.to_string(), "011110");
        assert_eq!(d.to_string(), "111100001");
    }

    #[test]
    fn test_crossover_one_and_two_rule_parents() {
        let schema = tiny();
        let layout = GenomeLayout::new(&schema).unwrap();
        let short = hypothesis(&layout, &schema, "011");
        let long = hypothesis(&layout, &schema, "110101");
        let mut rng = create_rng(42);

        let mut produced = 0;
        for _ in 0..500 {
            if let Some((c1, c2)) = two_point_crossover(&short, &long, &layout, &schema, &mut rng) {
                produced += 1;
                assert_eq!(c1.bit_string().len() % 3, 0);
                assert_eq!(c2.bit_string().len() % 3, 0);
                assert!(c1.rule_count() + c2.rule_count() <= 3);
            }
        }
        assert!(produced > 0);
    }

    #[test]
    fn test_crossover_skips_degenerate_parents() {
        let schema = tiny();
        let layout = GenomeLayout::new(&schema).unwrap();
        let h = hypothesis(&layout, &schema, "011");
        let empty = Hypothesis::default();
        let mut rng = create_rng(1);
        assert!(two_point_crossover(&empty, &h, &layout, &schema, &mut rng).is_none());
        assert!(two_point_crossover(&h, &empty, &layout, &schema, &mut rng).is_none());
    }

    #[test]
    fn test_crossover_pairs_collects_both_offspring() {
        let schema = tiny();
        let layout = GenomeLayout::new(&schema).unwrap();
        let h1 = hypothesis(&layout, &schema, "011110");
        let h2 = hypothesis(&layout, &schema, "101111010");
        let pairs = vec![(h1.clone(), h2.clone()); 20];
        let mut rng = create_rng(3);
        let offspring = crossover_pairs(&pairs, &layout, &schema, &mut rng);
        assert_eq!(offspring.len() % 2, 0);
        assert!(offspring.len() <= 40);
        assert!(!offspring.is_empty());
    }

    proptest! {
        #[test]
        fn prop_spliced_lengths_are_rule_multiples(
            rules_a in 1usize..4,
            rules_b in 1usize..4,
            seed in any::<u64>(),
        ) {
            let n = 3;
            let mut rng = create_rng(seed);
            let a: BitString = (0..rules_a * n).map(|_| rng.random_bool(0.5)).collect();
            let b: BitString = (0..rules_b * n).map(|_| rng.random_bool(0.5)).collect();

            let cuts = index::sample(&mut rng, a.len(), 2);
            let (p1, p2) = (cuts.index(0).min(cuts.index(1)), cuts.index(0).max(cuts.index(1)));
            for (q1, q2) in crossover_points(b.len(), n, p1 % n, p2 % n) {
                let (c, d) = splice(&a, &b, (p1, p2), (q1, q2));
                prop_assert_eq!(c.len() % n, 0);
                prop_assert_eq!(d.len() % n, 0);
                prop_assert_eq!(c.len() + d.len(), a.len() + b.len());
            }
        }
    }

    // ---- Mutation ----

    #[test]
    fn test_flip_bit() {
        let mut rng = create_rng(42);
        let mut bits: BitString = "0000".parse().unwrap();
        let pos = flip_bit(&mut bits, &mut rng).unwrap();
        assert_eq!(bits.count_ones(), 1);
        assert_eq!(bits.get(pos), Some(true));

        let mut empty = BitString::default();
        assert_eq!(flip_bit(&mut empty, &mut rng), None);
    }

    #[test]
    fn test_invalid_target_flip_drops_rule() {
        let schema = three_way();
        let layout = GenomeLayout::new(&schema).unwrap();
        let h = hypothesis(&layout, &schema, "1010");
        assert_eq!(h.rules()[0].postcondition, "r");

        let mut bits = h.bit_string();
        bits.flip(3);
        let report = layout.decode_hypothesis(&bits, &schema);
        assert!(report.rules.is_empty());
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_mutation_redecodes_whole_genome() {
        let schema = three_way();
        let layout = GenomeLayout::new(&schema).unwrap();
        let original = hypothesis(&layout, &schema, "1010");
        let mut rng = create_rng(42);

        let mut population = vec![original.clone(); 200];
        let mutated = mutate(1.0, &mut population, &layout, &schema, &mut rng);
        assert_eq!(mutated, 200);

        let dropped = population.iter().filter(|h| h.rule_count() == 0).count();
        assert!(dropped > 0, "flips at bits 0 and 3 must drop the rule");
        for h in &population {
            assert!(h.rule_count() <= 1);
            assert_ne!(h.bit_string(), original.bit_string());
            assert_eq!(h.bit_string().len() % layout.rule_width(), 0);
        }
    }

    #[test]
    fn test_mutation_count() {
        let schema = tiny();
        let layout = GenomeLayout::new(&schema).unwrap();
        let original = hypothesis(&layout, &schema, "011110");
        let mut rng = create_rng(9);

        let mut population = vec![original.clone(); 20];
        assert_eq!(mutate(0.1, &mut population, &layout, &schema, &mut rng), 2);
        let changed = population
            .iter()
            .filter(|h| h.bit_string() != original.bit_string())
            .count();
        assert_eq!(changed, 2);

        assert_eq!(mutate(0.0, &mut population, &layout, &schema, &mut rng), 0);
        assert_eq!(mutate(0.5, &mut [], &layout, &schema, &mut rng), 0);
    }
}
