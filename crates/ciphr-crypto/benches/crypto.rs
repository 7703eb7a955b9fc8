use std::io::Cursor;

use ciphr_crypto::{
    decrypt_stream, decrypt_text, derive_key_with_params, encrypt_stream, encrypt_text,
    Credentials, DerivedKey, KdfParams, DEFAULT_CHUNK_SIZE,
};

fn make_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}

fn bench_key() -> DerivedKey {
    DerivedKey::from_bytes([0xABu8; 32])
}

#[divan::bench(sample_count = 10)]
fn bench_derive_key_default_cost() -> DerivedKey {
    let creds = Credentials::new("bench-password", "bench-salt");
    derive_key_with_params(divan::black_box(&creds), &KdfParams::default()).unwrap()
}

#[divan::bench(args = [16, 1024, 65536])]
fn bench_encrypt_text(bencher: divan::Bencher, size: usize) {
    let key = bench_key();
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| encrypt_text(divan::black_box(&data), divan::black_box(&key)).unwrap());
}

#[divan::bench(args = [16, 1024, 65536])]
fn bench_decrypt_text(bencher: divan::Bencher, size: usize) {
    let key = bench_key();
    let envelope = encrypt_text(&make_data(size), &key).unwrap();
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| decrypt_text(divan::black_box(&envelope), divan::black_box(&key)).unwrap());
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_encrypt_stream(bencher: divan::Bencher, size: usize) {
    let key = bench_key();
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            let mut out: Vec<u8> = Vec::with_capacity(size + 16);
            encrypt_stream(&key, Cursor::new(&data), &mut out, DEFAULT_CHUNK_SIZE).unwrap();
            out
        });
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_decrypt_stream(bencher: divan::Bencher, size: usize) {
    let key = bench_key();
    let mut encrypted: Vec<u8> = Vec::new();
    encrypt_stream(&key, Cursor::new(make_data(size)), &mut encrypted, DEFAULT_CHUNK_SIZE).unwrap();
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            let mut out: Vec<u8> = Vec::with_capacity(size);
            decrypt_stream(&key, Cursor::new(&encrypted), &mut out, DEFAULT_CHUNK_SIZE).unwrap();
            out
        });
}

fn main() {
    divan::main();
}
