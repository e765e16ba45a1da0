use rand_core::{RngCore, SeedableRng};

use chacharng::block::{chacha20_block, input_state, key_words, CONSTANTS};
use chacharng::{ChaCha20Rng, Error};

use crate::cli::CheckArgs;
use crate::stats::{self, SAMPLE_LEN};

/// Outcome of one self-test step.
#[derive(Debug)]
pub struct Outcome {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl Outcome {
    fn new(name: impl Into<String>, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

const RFC8439_2_3_2: &str = "10f1e7e4d13b5915500fdd1fa32071c4c7d1f4c733c068030422aa9ac3d46c4e\
                             d2826446079faa0914c2d705d98b02a2b5129cd1de164eb9cbd083e8a2503c4e";

const RFC8439_A1_1: &str = "76b8e0ada0f13d90405d6ae55386bd28bdd219b8a08ded1aa836efcc8b770dc7\
                            da41597c5157488d7724e03fb8d84a376a43b8f41518a11cc387b669b2ee6586";

fn compare_block(name: &str, block: &[u8; 64], expected_hex: &str) -> Outcome {
    let got = hex::encode(block);
    if got == expected_hex {
        Outcome::new(name, true, "block matches")
    } else {
        Outcome::new(name, false, format!("got {}", got))
    }
}

/// Published block vectors plus the pinned seed-expansion golden values.
pub fn known_answers() -> Vec<Outcome> {
    let mut outcomes = Vec::new();

    let mut key = [0u8; 32];
    for (i, b) in key.iter_mut().enumerate() {
        *b = i as u8;
    }
    let mut state = [0u32; 16];
    state[..4].copy_from_slice(&CONSTANTS);
    state[4..12].copy_from_slice(&key_words(&key));
    state[12] = 1;
    state[13] = 0x0900_0000;
    state[14] = 0x4a00_0000;
    outcomes.push(compare_block("RFC 8439 2.3.2", &chacha20_block(&state), RFC8439_2_3_2));

    let zero = chacha20_block(&input_state(&[0u32; 8], 0, 0));
    outcomes.push(compare_block("RFC 8439 A.1 #1", &zero, RFC8439_A1_1));

    let golden: [(i64, u32); 4] = [
        (0, 0x81f5f7b2),
        (1, 0x5044379a),
        (-1, 0x67a9438e),
        (42, 0xd7b54878),
    ];
    for (seed, expected) in golden {
        let got = ChaCha20Rng::from_i64(seed).next_u32();
        outcomes.push(Outcome::new(
            format!("seed {} first word", seed),
            got == expected,
            format!("{:#010x} (expected {:#010x})", got, expected),
        ));
    }

    outcomes
}

/// Compares `draws` mixed-width draws against `rand_chacha`.
pub fn reference_cross_check(seed: i64, draws: usize) -> Outcome {
    let mut ours = ChaCha20Rng::from_i64(seed);
    let mut reference = rand_chacha::ChaCha20Rng::seed_from_u64(seed as u64);

    for i in 0..draws {
        let (a, b) = if i % 3 == 2 {
            (ours.next_u64(), reference.next_u64())
        } else {
            (ours.next_u32() as u64, reference.next_u32() as u64)
        };
        if a != b {
            return Outcome::new(
                "rand_chacha cross-check",
                false,
                format!("draw {} differs: {:#x} vs {:#x}", i, a, b),
            );
        }
    }

    if ours.get_word_pos() != reference.get_word_pos() {
        return Outcome::new(
            "rand_chacha cross-check",
            false,
            format!(
                "word position {} vs {}",
                ours.get_word_pos(),
                reference.get_word_pos()
            ),
        );
    }

    Outcome::new(
        "rand_chacha cross-check",
        true,
        format!("{} draws identical", draws),
    )
}

/// Runs the FIPS 140-2 suite over `samples` consecutive 2500-byte samples.
/// A small number of failing samples is expected from any good generator.
pub fn statistical(seed: i64, samples: usize) -> Outcome {
    let mut rng = ChaCha20Rng::from_i64(seed);
    let mut sample = [0u8; SAMPLE_LEN];
    let mut failed = 0usize;

    for i in 0..samples {
        rng.fill_bytes(&mut sample);
        let result = stats::fips_suite(&sample);
        if !result.all_passed() {
            failed += 1;
            for test in result.tests().iter().filter(|t| !t.passed) {
                log::info!("sample {}: {} failed ({})", i, test.name, test.detail);
            }
        }
    }

    let allowed = (samples / 50).max(1);
    Outcome::new(
        "FIPS 140-2",
        failed <= allowed,
        format!(
            "{}/{} samples passed all tests (tolerance {})",
            samples - failed,
            samples,
            allowed
        ),
    )
}

pub fn run(args: &CheckArgs) -> Result<(), Error> {
    if args.samples == 0 {
        return Err(Error::InvalidArgs("samples must be greater than 0".into()));
    }

    let mut outcomes = known_answers();
    outcomes.push(reference_cross_check(args.seed, args.draws));
    outcomes.push(statistical(args.seed, args.samples));

    for outcome in &outcomes {
        let tag = if outcome.passed { "PASS" } else { "FAIL" };
        println!("[{}] {}: {}", tag, outcome.name, outcome.detail);
    }

    let failed = outcomes.iter().filter(|o| !o.passed).count();
    if failed > 0 {
        return Err(Error::SelfTest(format!(
            "{} of {} checks failed",
            failed,
            outcomes.len()
        )));
    }

    log::info!("all {} checks passed for seed {}", outcomes.len(), args.seed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogArgs;

    fn args(samples: usize) -> CheckArgs {
        CheckArgs {
            seed: 0,
            samples,
            draws: 1000,
            log: LogArgs {
                log_level: None,
                log_file: None,
                syslog: false,
            },
        }
    }

    #[test]
    fn test_known_answers_pass() {
        for outcome in known_answers() {
            assert!(outcome.passed, "{}: {}", outcome.name, outcome.detail);
        }
    }

    #[test]
    fn test_cross_check_passes() {
        for seed in [0, -1, i64::MIN] {
            let outcome = reference_cross_check(seed, 2000);
            assert!(outcome.passed, "{}", outcome.detail);
        }
    }

    #[test]
    fn test_statistical_passes_for_seed_zero() {
        let outcome = statistical(0, 8);
        assert!(outcome.passed, "{}", outcome.detail);
        assert!(outcome.detail.starts_with("8/8"));
    }

    #[test]
    fn test_compare_block_reports_mismatch() {
        let outcome = compare_block("zero", &[0u8; 64], RFC8439_A1_1);
        assert!(!outcome.passed);
        assert!(outcome.detail.starts_with("got 0000"));
    }

    #[test]
    fn test_run_succeeds() {
        assert!(run(&args(4)).is_ok());
    }

    #[test]
    fn test_run_rejects_zero_samples() {
        assert!(matches!(run(&args(0)), Err(Error::InvalidArgs(_))));
    }
}
