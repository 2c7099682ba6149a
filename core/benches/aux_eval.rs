use std::{hint::black_box, sync::Arc};

use auxqhe_backend::{Bit, BitEncryptor, IntegerCiphertext, IntegerParams, IntegerPublicKey, IntegerSecretKey};
use auxqhe_core::{Circuit, EncryptedInputs, KeyPair, PendingEvaluation, QubitLayout, Session, TermSet};
use auxqhe_sampling::Source;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn bench_aux_eval_integer(c: &mut Criterion) {
    let mut group = c.benchmark_group("aux_eval_integer");

    struct Params {
        qubits: usize,
        layers: usize,
    }

    fn runner(p: Params) -> impl FnMut() {
        let mut source: Source = Source::new([0u8; 32]);
        let sk: IntegerSecretKey = IntegerSecretKey::generate(IntegerParams::toy(), &mut source).unwrap_or_else(|e| panic!("{}", e));
        let keys: KeyPair = KeyPair::random(p.qubits, &mut source);

        // Ladder of T and CNOT so every qubit sits in every layer.
        let mut circuit: Circuit = Circuit::new(p.qubits);
        for _ in 0..p.layers {
            for q in 0..p.qubits {
                circuit.t(q).unwrap_or_else(|e| panic!("{}", e));
                circuit.s(q).unwrap_or_else(|e| panic!("{}", e));
            }
            for q in 1..p.qubits {
                circuit.cnot(q - 1, q).unwrap_or_else(|e| panic!("{}", e));
            }
        }

        let terms: Arc<TermSet> = Arc::new(TermSet::for_keys(&keys, circuit.t_depth()).unwrap_or_else(|e| panic!("{}", e)));
        let session: Session = Session::new(keys.clone(), terms).unwrap_or_else(|e| panic!("{}", e));
        let (_, pending) = session
            .compile(&circuit, QubitLayout::identity(p.qubits))
            .unwrap_or_else(|e| panic!("{}", e))
            .into_parts();

        let pk: IntegerPublicKey = sk.public_key().clone();
        let mut inputs: EncryptedInputs<IntegerCiphertext> = EncryptedInputs::with_keys(&pk, &keys, &mut source);
        (0..pending.gadgets().len()).for_each(|g| {
            let bit: Bit = Bit::from(source.next_bool());
            inputs.insert_correction(g, pk.encrypt(bit, &mut source));
        });

        move || {
            let pending: PendingEvaluation = pending.clone();
            black_box(pending.resolve(&pk, &sk, black_box(&inputs)).is_ok());
        }
    }

    let params_set: Vec<Params> = vec![
        Params { qubits: 2, layers: 2 },
        Params { qubits: 3, layers: 3 },
        Params { qubits: 4, layers: 3 },
    ];

    for params in params_set {
        let id = BenchmarkId::new("AUX_EVAL", format!("n={} layers={}", params.qubits, params.layers));
        let mut runner = runner(params);
        group.bench_with_input(id, &(), |b, _| b.iter(&mut runner));
    }

    group.finish();
}

criterion_group!(benches, bench_aux_eval_integer);
criterion_main!(benches);
