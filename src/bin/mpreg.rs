use std::process;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use mpreg::common::io::{Endpoint, MAX_CHUNK_SIZE, preferred_chunk_size};
use mpreg::mpreg::{Config, Mode, VANILLA_SYMBOL, run};

const TOOL_NAME: &str = "mpreg";

#[derive(Parser)]
#[command(
    name = "mpreg",
    version,
    about = "Replace em dashes with pregnant emoji",
    override_usage = "mpreg [OPTION]... [INPUT]"
)]
struct Cli {
    /// Input file; with no INPUT, or when INPUT is -, read standard input
    #[arg(default_value = "-")]
    input: String,

    /// Write to FILE instead of standard output
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = "-")]
    output: String,

    /// Cycle through every skin tone and pregnant emoji (default)
    #[arg(short = 'd', long = "diversity", conflicts_with = "vanilla")]
    diversity: bool,

    /// Use a single fixed emoji for every dash
    #[arg(long = "vanilla")]
    vanilla: bool,

    /// Replacement token for vanilla mode; implies --vanilla
    #[arg(
        short = 's',
        long = "symbol",
        value_name = "TOKEN",
        conflicts_with = "diversity"
    )]
    symbol: Option<String>,

    /// Seed the shuffle for reproducible diversity output
    #[arg(long = "seed", value_name = "N")]
    seed: Option<u64>,

    /// Read and write in chunks of BYTES (default: the page size)
    #[arg(
        short = 'b',
        long = "chunk-size",
        value_name = "BYTES",
        value_parser = clap::value_parser!(u64).range(1..=MAX_CHUNK_SIZE as u64)
    )]
    chunk_size: Option<u64>,

    /// Print a summary of the run to standard error
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let mode = match (self.vanilla, self.symbol) {
            (_, Some(token)) => Mode::Vanilla(token),
            (true, None) => Mode::Vanilla(VANILLA_SYMBOL.to_string()),
            (false, None) => Mode::Diversity,
        };
        Config {
            input: Endpoint::parse(&self.input),
            output: Endpoint::parse(&self.output),
            mode,
            chunk_size: self
                .chunk_size
                .map_or_else(preferred_chunk_size, |n| n as usize),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let config = cli.into_config();

    match run(&config, rng) {
        Ok(stats) => {
            if verbose {
                eprintln!(
                    "{}: read {} chars, replaced {} dashes, wrote {} bytes in {} chunks of {}",
                    TOOL_NAME,
                    stats.chars_read,
                    stats.replaced,
                    stats.bytes_written,
                    stats.chunks_written,
                    config.chunk_size
                );
            }
        }
        Err(e) => {
            eprintln!("{}: {}", TOOL_NAME, e);
            process::exit(e.exit_code());
        }
    }
}
