use crate::{
    KeyPair, Term,
    Variable::{self, K, KeyA, KeyB},
    config::GeneratorConfig,
    error::Error,
    term_set::{TermSet, layer_size_bounds},
};

fn t(vars: &[Variable]) -> Term {
    Term::from_vars(vars.iter().copied()).unwrap()
}

#[test]
fn layer_sizes() {
    // (n, L, |T[1..L]|, n * sum |T[l]|)
    let table: [(usize, usize, &[usize], usize); 8] = [
        (1, 1, &[2], 2),
        (1, 2, &[2, 5], 7),
        (1, 3, &[2, 5, 17], 24),
        (1, 4, &[2, 5, 17, 107], 131),
        (2, 2, &[4, 18], 44),
        (2, 3, &[4, 18, 167], 378),
        (3, 2, &[6, 39], 135),
        (3, 3, &[6, 39, 722], 2301),
    ];
    table.iter().for_each(|&(n, l, sizes, total)| {
        println!("test layer_sizes n: {} L: {}", n, l);
        let ts: TermSet = TermSet::generate(n, l).unwrap();
        assert_eq!(ts.layer_sizes(), sizes);
        assert_eq!(ts.total_auxiliary_states(), total);
        assert_eq!(ts.depth(), l);
        ts.check_conformance().unwrap();
    });
}

#[test]
fn first_layer_is_key_atoms_and_layers_grow() {
    (1..4).for_each(|n| {
        let ts: TermSet = TermSet::generate(n, 3).unwrap();
        let first: &[Term] = ts.layer(1).unwrap();
        assert_eq!(first.len(), 2 * n);
        (0..n).for_each(|q| {
            assert!(first.contains(&Term::atom(KeyA(q))));
            assert!(first.contains(&Term::atom(KeyB(q))));
        });
        ts.layer_sizes().windows(2).for_each(|w| assert!(w[0] < w[1]));
        (2..=3).for_each(|l| {
            ts.layer(l - 1)
                .unwrap()
                .iter()
                .for_each(|term| assert!(ts.contains(l, term)));
        });
    });
}

#[test]
fn three_qubit_keys_at_depth_two() {
    let keys: KeyPair = KeyPair::from_u8(&[1, 0, 1], &[0, 1, 0]).unwrap();
    let ts: TermSet = TermSet::for_keys(&keys, 2).unwrap();
    assert_eq!(ts.layer_size(1), Some(6));
    assert_eq!(ts.layer_size(2), Some(39));
    assert_eq!(ts.total_auxiliary_states(), 135);
    assert_eq!(ts.auxiliary_states(2), Some(117));

    // 15 pairwise products, 18 k-variables.
    let fresh: &[Term] = ts.new_terms(2).unwrap();
    assert_eq!(fresh.iter().filter(|t| t.degree() == 2).count(), 15);
    assert_eq!(fresh.iter().filter(|t| t.as_atom().is_some_and(|v| v.is_k())).count(), 18);
    assert!(ts.contains(2, &t(&[KeyA(0), KeyB(2)])));
    assert!(ts.contains(2, &Term::atom(K { layer: 2, qubit: 1, source: 5 })));
    assert!(!ts.contains(1, &t(&[KeyA(0), KeyB(2)])));
}

#[test]
fn generation_ignores_key_values() {
    let zero: KeyPair = KeyPair::zero(2);
    let ones: KeyPair = KeyPair::from_u8(&[1, 1], &[1, 1]).unwrap();
    let x: TermSet = TermSet::for_keys(&zero, 3).unwrap();
    let y: TermSet = TermSet::for_keys(&ones, 3).unwrap();
    assert_eq!(x.layer(3), y.layer(3));
}

#[test]
fn products_are_deduplicated() {
    let ts: TermSet = TermSet::generate(1, 3).unwrap();
    // a0 * (a0*b0) and b0 * (a0*b0) both collapse to a0*b0.
    let ab: Term = t(&[KeyA(0), KeyB(0)]);
    assert_eq!(ts.layer_of(&ab), Some(2));
    assert_eq!(ts.layer(3).unwrap().iter().filter(|x| **x == ab).count(), 1);
    assert_eq!(ts.layer(3).unwrap().iter().map(Term::degree).max(), Some(3));
    assert_eq!(TermSet::generate(2, 3).unwrap().layer(3).unwrap().iter().map(Term::degree).max(), Some(4));
}

#[test]
fn rebuilding_is_idempotent() {
    let ts: TermSet = TermSet::generate(2, 2).unwrap();
    let layers: Vec<Vec<Term>> = (1..=2).map(|l| ts.layer(l).unwrap().to_vec()).collect();

    // Feeding every layer twice over changes nothing.
    let doubled: Vec<Vec<Term>> = layers.iter().map(|l| l.iter().chain(l.iter()).cloned().collect()).collect();
    let rebuilt: TermSet = TermSet::from_layers(2, doubled).unwrap();
    assert_eq!(rebuilt.layer_sizes(), ts.layer_sizes());
    assert_eq!(rebuilt.layer(2), ts.layer(2));
    rebuilt.check_conformance().unwrap();
}

#[test]
fn injected_triple_product_is_rejected() {
    let ts: TermSet = TermSet::generate(2, 2).unwrap();
    let mut layer2: Vec<Term> = ts.layer(2).unwrap().to_vec();
    layer2.push(t(&[KeyA(0), KeyB(0), KeyA(1)]));
    let tampered: TermSet = TermSet::from_layers(2, vec![ts.layer(1).unwrap().to_vec(), layer2]).unwrap();
    assert!(matches!(
        tampered.check_conformance(),
        Err(Error::MalformedTermSet { layer: 2, .. })
    ));
}

#[test]
fn dropped_terms_are_rejected() {
    let ts: TermSet = TermSet::generate(2, 2).unwrap();
    let first: Vec<Term> = ts.layer(1).unwrap().to_vec();
    let without = |missing: &Term| -> TermSet {
        let layer2: Vec<Term> = ts.layer(2).unwrap().iter().filter(|x| *x != missing).cloned().collect();
        TermSet::from_layers(2, vec![first.clone(), layer2]).unwrap()
    };

    let product: Term = t(&[KeyA(0), KeyB(1)]);
    assert!(ts.contains(2, &product));
    match without(&product).check_conformance() {
        Err(Error::MalformedTermSet { layer: 2, reason }) => assert!(reason.starts_with("missing product"), "{}", reason),
        other => panic!("unexpected {:?}", other),
    }

    let k: Term = Term::atom(K {
        layer: 2,
        qubit: 1,
        source: 3,
    });
    assert!(ts.contains(2, &k));
    match without(&k).check_conformance() {
        Err(Error::MalformedTermSet { layer: 2, reason }) => assert!(reason.starts_with("missing k-variable"), "{}", reason),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn malformed_layers_are_rejected() {
    let keys: Vec<Term> = vec![Term::atom(KeyA(0)), Term::atom(KeyB(0))];

    // Layer 1 must be exactly the key atoms.
    let wrong_first: TermSet = TermSet::from_layers(1, vec![vec![Term::atom(KeyA(0))]]).unwrap();
    assert!(matches!(wrong_first.check_conformance(), Err(Error::MalformedTermSet { layer: 1, .. })));

    // k-variables carry their layer.
    let mut layer2: Vec<Term> = keys.clone();
    layer2.push(Term::atom(K { layer: 3, qubit: 0, source: 0 }));
    let wrong_k: TermSet = TermSet::from_layers(1, vec![keys.clone(), layer2]).unwrap();
    assert!(matches!(wrong_k.check_conformance(), Err(Error::MalformedTermSet { layer: 2, .. })));

    // Layers must grow.
    let flat: TermSet = TermSet::from_layers(1, vec![keys.clone(), keys.clone()]).unwrap();
    assert!(matches!(flat.check_conformance(), Err(Error::MalformedTermSet { layer: 2, .. })));

    // And contain their predecessor.
    assert!(matches!(
        TermSet::from_layers(1, vec![keys, vec![Term::atom(KeyA(0))]]),
        Err(Error::MalformedTermSet { layer: 2, .. })
    ));
}

#[test]
fn invalid_configuration() {
    assert!(matches!(TermSet::generate(0, 2), Err(Error::InvalidConfiguration(_))));
    assert!(matches!(TermSet::generate(2, 0), Err(Error::InvalidConfiguration(_))));
    assert!(matches!(TermSet::from_layers(1, vec![]), Err(Error::InvalidConfiguration(_))));
}

#[test]
fn budget_is_enforced_before_generation() {
    let config: GeneratorConfig = GeneratorConfig::new(1000);
    assert_eq!(TermSet::generate_with(&config, 3, 2).unwrap().total_auxiliary_states(), 135);
    match TermSet::generate_with(&config, 3, 3) {
        Err(Error::BudgetExceeded {
            qubits: 3,
            depth: 3,
            required,
            budget: 1000,
        }) => assert!(required > 1000),
        other => panic!("expected BudgetExceeded, got {:?}", other),
    }

    // Rejected from the bound on layer 2, before any product is formed.
    assert!(matches!(TermSet::generate(2000, 2), Err(Error::BudgetExceeded { .. })));
}

#[test]
fn bounds() {
    assert_eq!(layer_size_bounds(3, 2), vec![6, 39]);
    assert_eq!(layer_size_bounds(1, 3), vec![2, 5, 20]);
    // Saturates instead of overflowing.
    assert_eq!(*layer_size_bounds(64, 40).last().unwrap(), u128::MAX);
}
