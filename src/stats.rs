//! FIPS 140-2 statistical tests (section 4.9.1) over 20,000-bit samples.

/// Bytes per FIPS sample.
pub const SAMPLE_LEN: usize = 2500;

/// Result of a single statistical test.
#[derive(Debug)]
pub struct TestResult {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

/// Result of the FIPS 140-2 test suite.
#[derive(Debug)]
pub struct FipsResult {
    pub monobit: TestResult,
    pub poker: TestResult,
    pub runs: TestResult,
    pub long_runs: TestResult,
}

impl FipsResult {
    pub fn all_passed(&self) -> bool {
        self.tests().iter().all(|t| t.passed)
    }

    pub fn tests(&self) -> [&TestResult; 4] {
        [&self.monobit, &self.poker, &self.runs, &self.long_runs]
    }
}

/// Calls `f(bit, length)` for every maximal run of identical bits, MSB first.
fn for_each_run(data: &[u8], mut f: impl FnMut(u8, u32)) {
    let Some(first) = data.first() else {
        return;
    };
    let mut current = first >> 7;
    let mut len = 0u32;
    for &byte in data {
        for shift in (0..8).rev() {
            let bit = (byte >> shift) & 1;
            if bit == current {
                len += 1;
            } else {
                f(current, len);
                current = bit;
                len = 1;
            }
        }
    }
    f(current, len);
}

/// Number of ones must lie strictly between 9725 and 10275.
pub fn fips_monobit(data: &[u8; SAMPLE_LEN]) -> TestResult {
    let ones: u32 = data.iter().map(|b| b.count_ones()).sum();
    TestResult {
        name: "Monobit",
        passed: ones > 9725 && ones < 10275,
        detail: format!("ones count: {}", ones),
    }
}

/// Chi-square over the 5000 4-bit nibbles must lie in (2.16, 46.17).
pub fn fips_poker(data: &[u8; SAMPLE_LEN]) -> TestResult {
    let mut counts = [0u64; 16];
    for &byte in data.iter() {
        counts[(byte >> 4) as usize] += 1;
        counts[(byte & 0x0f) as usize] += 1;
    }
    let sum_sq: u64 = counts.iter().map(|&c| c * c).sum();
    let x = (16.0 / 5000.0) * sum_sq as f64 - 5000.0;
    TestResult {
        name: "Poker",
        passed: x > 2.16 && x < 46.17,
        detail: format!("chi-square: {:.2}", x),
    }
}

const RUN_BOUNDS: [(u32, u32); 6] = [
    (2315, 2685),
    (1114, 1386),
    (527, 723),
    (240, 384),
    (103, 209),
    (103, 209),
];

/// Runs of each length 1..=5 and 6+, for zeros and ones separately, must
/// fall inside the FIPS intervals.
pub fn fips_runs(data: &[u8; SAMPLE_LEN]) -> TestResult {
    let mut counts = [[0u32; 6]; 2];
    for_each_run(data, |bit, len| {
        let bucket = (len as usize - 1).min(5);
        counts[bit as usize][bucket] += 1;
    });

    let mut failures = Vec::new();
    for (bit, per_bit) in counts.iter().enumerate() {
        for (i, (&count, &(lo, hi))) in per_bit.iter().zip(&RUN_BOUNDS).enumerate() {
            if count < lo || count > hi {
                let len = if i < 5 { (i + 1).to_string() } else { "6+".into() };
                failures.push(format!("{}-runs len {}: {} not in [{}, {}]", bit, len, count, lo, hi));
            }
        }
    }

    TestResult {
        name: "Runs",
        passed: failures.is_empty(),
        detail: if failures.is_empty() {
            "all 12 run categories within bounds".into()
        } else {
            failures.join("; ")
        },
    }
}

/// No run may be 26 bits or longer.
pub fn fips_long_runs(data: &[u8; SAMPLE_LEN]) -> TestResult {
    let mut longest = 0u32;
    for_each_run(data, |_, len| longest = longest.max(len));
    TestResult {
        name: "Long Runs",
        passed: longest <= 25,
        detail: format!("longest run: {} bits", longest),
    }
}

/// Run all four FIPS 140-2 tests on one sample.
pub fn fips_suite(data: &[u8; SAMPLE_LEN]) -> FipsResult {
    FipsResult {
        monobit: fips_monobit(data),
        poker: fips_poker(data),
        runs: fips_runs(data),
        long_runs: fips_long_runs(data),
    }
}
