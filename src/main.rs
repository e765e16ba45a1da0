mod check;
mod cli;
mod config;
mod logging;
mod output;
mod stats;
mod vectors;

use std::path::Path;
use std::process;

use clap::Parser;

use chacharng::{seed, ChaCha20Rng, Error};
use cli::{Cli, Command, SeedArgs};
use config::GeneratorConfig;
use output::Draws;

/// Build a GeneratorConfig by layering: defaults → TOML file → CLI overrides.
fn build_generator_config(config_file: Option<&Path>, cli: &Cli) -> GeneratorConfig {
    let mut cfg = match config::load_config(config_file) {
        Ok(c) => c.generator,
        Err(e) => {
            log::warn!("{}", e);
            GeneratorConfig::default()
        }
    };

    // Apply CLI overrides (only if explicitly set)
    if let Some(v) = cli.seed.seed {
        cfg.seed = v;
    }
    if let Some(v) = cli.count {
        cfg.count = v;
    }
    if let Some(v) = cli.width {
        cfg.width = v;
    }
    if let Some(v) = cli.format {
        cfg.format = v;
    }

    cfg.validate();
    cfg
}

/// Key sources in priority order: hex key, passphrase, 64-bit seed.
fn build_generator(seed_args: &SeedArgs, cfg: &GeneratorConfig) -> Result<ChaCha20Rng, Error> {
    if let Some(text) = &seed_args.seed_hex {
        log::info!("seeding from 32-byte key");
        return Ok(ChaCha20Rng::new(seed::parse_hex(text)?));
    }
    if let Some(phrase) = &seed_args.seed_phrase {
        log::info!("seeding from passphrase");
        return Ok(ChaCha20Rng::from_phrase(phrase));
    }
    log::info!("seeding from 64-bit seed {}", cfg.seed);
    Ok(ChaCha20Rng::from_i64(cfg.seed))
}

fn run_generate(cli: &Cli, cfg: &GeneratorConfig) -> Result<(), Error> {
    if cli.count == Some(0) {
        return Err(Error::InvalidArgs("count must be greater than 0".into()));
    }

    let mut rng = build_generator(&cli.seed, cfg)?;
    if let Some(pos) = cli.word_pos {
        rng.set_word_pos(pos);
    }

    let draws = Draws::collect(&mut rng, cfg.width, cfg.count);
    log::debug!(
        "drew {} {:?} value(s), stream now at word {}",
        cfg.count,
        cfg.width,
        rng.get_word_pos()
    );
    rng.release();

    output::write_output(&draws, cfg.format, cli.output_file.as_deref())?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Command::Check(args)) => {
            logging::init(&args.log);
            check::run(args)
        }
        Some(Command::Vectors(args)) => {
            logging::init(&args.log);
            vectors::run(args)
        }
        None => {
            logging::init(&cli.log);
            let cfg = build_generator_config(cli.config_file.as_deref(), &cli);
            run_generate(&cli, &cfg)
        }
    };

    if let Err(e) = result {
        log::error!("{}", e);
        process::exit(1);
    }
}
