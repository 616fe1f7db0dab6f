//! Manual check that signature verification time does not depend on where a
//! forged digest first differs. Run with:
//!
//! ```text
//! cargo test --release --test timing -- --ignored --nocapture
//! ```

use std::time::Instant;

use pushdeploy::signature::{sign, verify_signature};

const ROUNDS: u32 = 20_000;

fn median_verify_nanos(body: &[u8], secret: &str, signature: &str) -> u128 {
    let mut samples: Vec<u128> = (0..ROUNDS)
        .map(|_| {
            let start = Instant::now();
            let accepted = verify_signature(body, secret, signature);
            assert!(!accepted);
            start.elapsed().as_nanos()
        })
        .collect();
    samples.sort_unstable();
    samples[samples.len() / 2]
}

#[test]
#[ignore = "timing measurement, run manually in release mode"]
fn rejection_time_is_independent_of_the_mismatch_position() {
    let body = br#"{"repository":{"name":"demo","owner":{"login":"alice"}}}"#;
    let secret = "not-a-real-secret";
    let genuine = sign(body, secret);

    // Corrupt the first and the last hex digit of the digest.
    let digest_start = "sha256=".len();
    let mut early = genuine.clone().into_bytes();
    early[digest_start] = if early[digest_start] == b'0' { b'1' } else { b'0' };
    let early = String::from_utf8(early).unwrap();

    let mut late = genuine.clone().into_bytes();
    let last = late.len() - 1;
    late[last] = if late[last] == b'0' { b'1' } else { b'0' };
    let late = String::from_utf8(late).unwrap();

    // Warm up caches before measuring.
    median_verify_nanos(body, secret, &early);

    let early_nanos = median_verify_nanos(body, secret, &early);
    let late_nanos = median_verify_nanos(body, secret, &late);
    println!("median: early mismatch {early_nanos}ns, late mismatch {late_nanos}ns");

    let ratio = early_nanos.max(late_nanos) as f64 / early_nanos.min(late_nanos) as f64;
    assert!(
        ratio < 1.5,
        "verification time varies with mismatch position (ratio {ratio:.2})"
    );
}
