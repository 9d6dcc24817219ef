use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use dkg_core::combine::combine_shares;
use dkg_core::decryption::decrypt_share;
use dkg_core::encryption::encrypt;
use dkg_core::keygen::{assemble_private_key, assemble_public_key};
use dkg_core::{GroupParams, QualifiedPublicVal, QualifiedShare};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Toy group parameters, large enough for a 10-party committee (`q=11 > n`).
fn params() -> GroupParams {
    GroupParams::new(
        BigUint::from(23u32),
        BigUint::from(11u32),
        BigUint::from(4u32),
        BigUint::from(6u32),
        BigUint::from(9u32),
        10,
        9,
    )
    .expect("toy parameters are valid")
}

fn vss_bench(c: &mut Criterion) {
    c.bench_function("VssShares::generate (t=9)", |b| {
        let params = params();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        b.iter(|| dkg_core::vss::VssShares::generate(&mut rng, &params));
    });
}

fn encrypt_bench(c: &mut Criterion) {
    c.bench_function("encrypt", |b| {
        let params = params();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let y = dkg_core::bigint::mod_pow(&params.g, &BigUint::from(5u32), &params.p);
        let m = BigUint::from(7u32);
        b.iter(|| encrypt(&mut rng, &params, &y, &m));
    });
}

fn decrypt_share_bench(c: &mut Criterion) {
    c.bench_function("decrypt_share", |b| {
        let params = params();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let x = BigUint::from(5u32);
        let y = dkg_core::bigint::mod_pow(&params.g, &x, &params.p);
        let ct = encrypt(&mut rng, &params, &y, &BigUint::from(7u32));
        b.iter(|| decrypt_share(&mut rng, &params, 1, &x, &ct));
    });
}

fn combine_bench(c: &mut Criterion) {
    let params = params();
    let mut rng = ChaCha20Rng::seed_from_u64(4);

    let mut private_shares = Vec::new();
    let mut public_shares = Vec::new();
    for id in 1..=params.n {
        let vss = dkg_core::vss::VssShares::generate(&mut rng, &params);
        private_shares.push(QualifiedShare {
            id,
            share: vss.share1_for(&params, id),
        });
        public_shares.push(QualifiedPublicVal {
            id,
            public_val: vss.public_vals1()[0].clone(),
        });
    }
    let private_key = assemble_private_key(&params, &private_shares).expect("enough shares");
    let public_key = assemble_public_key(&params, &public_shares).expect("enough shares");
    let ct = encrypt(&mut rng, &params, &public_key, &BigUint::from(42u32));

    for set_size in [2usize, 4, 6, 8, 10] {
        c.bench_function(&format!("combine_shares (|Q|={set_size})"), |b| {
            b.iter_batched(
                || {
                    (1..=set_size)
                        .map(|id| decrypt_share(&mut rng, &params, id, &private_key, &ct))
                        .collect::<Vec<_>>()
                },
                |shares| combine_shares(&params, &shares, &ct),
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group!(benches, vss_bench, encrypt_bench, decrypt_share_bench, combine_bench);
criterion_main!(benches);
