use std::fmt::Write;

use chacharng::{ChaCha20Rng, Error};

use crate::cli::VectorsArgs;

/// Upper bound on blocks printed by `vectors`.
const MAX_BLOCKS: u64 = 1024;

/// Renders the key and the first `blocks` keystream blocks of `seed` as
/// little-endian words, eight per line.
pub fn render(seed: i64, blocks: u64) -> String {
    let mut rng = ChaCha20Rng::from_i64(seed);
    let mut text = String::new();

    let _ = writeln!(text, "seed:  {}", seed);
    let _ = writeln!(text, "key:   {}", hex::encode(rng.get_seed()));
    for block in 0..blocks {
        let _ = write!(text, "block {}:", block);
        for i in 0..16 {
            let sep = if i == 8 { "\n         " } else { " " };
            let _ = write!(text, "{}{:08x}", sep, rng.next_u32());
        }
        text.push('\n');
    }
    text
}

pub fn run(args: &VectorsArgs) -> Result<(), Error> {
    if args.blocks == 0 || args.blocks > MAX_BLOCKS {
        return Err(Error::InvalidArgs(format!(
            "blocks must be between 1 and {}",
            MAX_BLOCKS
        )));
    }
    log::debug!("rendering {} block(s) for seed {}", args.blocks, args.seed);
    print!("{}", render(args.seed, args.blocks));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_seed_zero() {
        let text = render(0, 1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "seed:  0");
        assert_eq!(
            lines[1],
            "key:   ecf273f981b5cd4587f0467306ad6cadd0d0a3e33317e767f29bea72d78a7dfe"
        );
        assert_eq!(
            lines[2],
            "block 0: 81f5f7b2 063cded6 6efd22a8 fb65827e 01840fc0 dc5b6a69 d2a6f534 2f923fff"
        );
        assert_eq!(
            lines[3],
            "         188ca258 e5716b57 86321ce6 3ca05578 1ec9a8d0 1c9a1f73 87c0a600 402e9d0d"
        );
    }

    #[test]
    fn test_render_second_block_starts_at_word_16() {
        let text = render(0, 2);
        assert!(text.contains("block 1: 0e58dce4 7f1a622f"));
    }
}
