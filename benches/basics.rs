use criterion::{
    criterion_group, criterion_main, measurement::WallTime, BatchSize, Bencher, BenchmarkGroup,
    BenchmarkId, Criterion, Throughput,
};
use merlin::Transcript;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use quorum_elgamal::{
    ceremony::KeyCeremonyTrustee,
    decryption::lagrange_coefficients,
    group::{Group, Ristretto},
    CiphertextWithValue, Keypair, ProofOfPossession, RangeProof,
};

fn bench_encrypt<G: Group>(b: &mut Bencher<'_>) {
    let mut rng = ChaChaRng::from_seed([5; 32]);
    let keypair: Keypair<G> = Keypair::generate(&mut rng);
    b.iter(|| keypair.public().encrypt(rng.gen_range(0_u64..100), &mut rng));
}

fn bench_decrypt<G: Group>(b: &mut Bencher<'_>) {
    let mut rng = ChaChaRng::from_seed([5; 32]);
    let keypair: Keypair<G> = Keypair::generate(&mut rng);
    b.iter_batched(
        || keypair.public().encrypt(rng.gen_range(0_u64..100), &mut rng),
        |encrypted| keypair.secret().decrypt_to_element(encrypted),
        BatchSize::SmallInput,
    );
}

fn bench_pop_prove<G: Group>(b: &mut Bencher<'_>) {
    let mut rng = ChaChaRng::from_seed([5; 32]);
    let keypairs: Vec<Keypair<G>> = (0..3).map(|_| Keypair::generate(&mut rng)).collect();
    b.iter(|| {
        let mut transcript = Transcript::new(b"bench_pop");
        ProofOfPossession::new(&keypairs, &mut transcript, &mut rng)
    });
}

fn bench_pop_verify<G: Group>(b: &mut Bencher<'_>) {
    let mut rng = ChaChaRng::from_seed([5; 32]);
    let keypairs: Vec<Keypair<G>> = (0..3).map(|_| Keypair::generate(&mut rng)).collect();
    let proof = {
        let mut transcript = Transcript::new(b"bench_pop");
        ProofOfPossession::new(&keypairs, &mut transcript, &mut rng)
    };
    b.iter(|| {
        proof
            .verify(
                keypairs.iter().map(Keypair::public),
                &mut Transcript::new(b"bench_pop"),
            )
            .unwrap();
    });
}

fn bench_range_prove<G: Group>(b: &mut Bencher<'_>, upper_bound: u64) {
    let mut rng = ChaChaRng::from_seed([120; 32]);
    let (receiver, _) = Keypair::<G>::generate(&mut rng).into_tuple();
    let ciphertext = CiphertextWithValue::new(
        rng.gen_range(0..=upper_bound),
        &receiver,
        &mut rng,
    );
    b.iter(|| {
        let mut transcript = Transcript::new(b"bench_range");
        RangeProof::new(&ciphertext, upper_bound, &receiver, &mut transcript)
    });
}

fn bench_range_verify<G: Group>(b: &mut Bencher<'_>, upper_bound: u64) {
    let mut rng = ChaChaRng::from_seed([120; 32]);
    let (receiver, _) = Keypair::<G>::generate(&mut rng).into_tuple();
    let ciphertext = CiphertextWithValue::new(
        rng.gen_range(0..=upper_bound),
        &receiver,
        &mut rng,
    );
    let proof = {
        let mut transcript = Transcript::new(b"bench_range");
        RangeProof::new(&ciphertext, upper_bound, &receiver, &mut transcript)
    };
    let ciphertext = ciphertext.into_inner();
    b.iter(|| {
        proof
            .verify(
                &ciphertext,
                upper_bound,
                &receiver,
                &mut Transcript::new(b"bench_range"),
            )
            .unwrap();
    });
}

fn bench_key_generation<G: Group>(b: &mut Bencher<'_>, quorum: usize) {
    let mut rng = ChaChaRng::from_seed([121; 32]);
    b.iter(|| KeyCeremonyTrustee::<G>::new("guardian", 1, quorum, &mut rng));
}

fn bench_lagrange(b: &mut Bencher<'_>, len: u64) {
    let coordinates: Vec<_> = (1..=len).collect();
    b.iter(|| lagrange_coefficients::<Ristretto>(&coordinates));
}

fn bench_group<G: Group>(group: &mut BenchmarkGroup<'_, WallTime>) {
    group
        // Basic operations: encryption / decryption.
        .bench_function("encrypt", bench_encrypt::<G>)
        .bench_function("decrypt", bench_decrypt::<G>)
        // Proof of possession over a guardian's polynomial commitments.
        .bench_function("pop_prove", bench_pop_prove::<G>)
        .bench_function("pop_verify", bench_pop_verify::<G>)
        .throughput(Throughput::Elements(1));

    // Range proofs for ballot selections.
    const UPPER_BOUNDS: &[u64] = &[1, 4, 15, 100];

    for &upper_bound in UPPER_BOUNDS {
        group.bench_with_input(
            BenchmarkId::new("range_prove", upper_bound),
            &upper_bound,
            |b, &bound| bench_range_prove::<G>(b, bound),
        );
    }
    for &upper_bound in UPPER_BOUNDS {
        group.bench_with_input(
            BenchmarkId::new("range_verify", upper_bound),
            &upper_bound,
            |b, &bound| bench_range_verify::<G>(b, bound),
        );
    }

    // Key ceremony setup.
    const QUORUM_SIZES: &[usize] = &[2, 3, 5, 10];

    for &quorum in QUORUM_SIZES {
        group.bench_with_input(
            BenchmarkId::new("key_generation", quorum),
            &quorum,
            |b, &quorum| bench_key_generation::<G>(b, quorum),
        );
    }
}

fn bench_ristretto(criterion: &mut Criterion) {
    bench_group::<Ristretto>(&mut criterion.benchmark_group("ristretto"));
}

fn bench_helpers(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("helpers");
    const GUARDIAN_COUNTS: &[u64] = &[3, 5, 10, 20];

    for &count in GUARDIAN_COUNTS {
        group.bench_with_input(
            BenchmarkId::new("lagrange_coefficients", count),
            &count,
            |b, &count| bench_lagrange(b, count),
        );
    }
}

criterion_group!(benches, bench_ristretto, bench_helpers);
criterion_main!(benches);
