use clap::Parser;
use key_extract::{extract_keys, ExtractConfig};
use libs::iotools::EVALUATIONS_FILE;
use libs::utils::init_tracing;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract Pedersen commitment keys from a phase-2 transcript", long_about = None)]
struct Config {
    /// Phase-2 transcript (only the header is read)
    #[arg(long, value_name = "PHASE2")]
    phase2: PathBuf,

    /// Serialized G1 evaluation basis
    #[arg(long, value_name = "EVALS", default_value = EVALUATIONS_FILE)]
    evals: PathBuf,

    /// Output folder path (must exist and be writeable)
    #[arg(long, value_name = "OUTFOLDER", default_value = ".")]
    outfolder: PathBuf,

    /// Accept a basis whose length differs from the transcript domain size
    #[arg(long)]
    no_domain_check: bool,

    /// Skip the pairing check of the derived keys
    #[arg(long)]
    no_verify: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// cargo run --release --bin extract_keys -- --phase2 ./phase2 --evals ./evals --outfolder ./keys
fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing(config.verbose);

    println!("Extracting keys from {}", config.phase2.display());
    let extract_config = ExtractConfig {
        transcript: config.phase2,
        evaluations: config.evals,
        output_dir: config.outfolder,
        check_domain: !config.no_domain_check,
        verify_keys: !config.no_verify,
    };

    match extract_keys(&extract_config) {
        Ok(summary) => {
            println!("✅ Keys extracted successfully");
            println!("   - Domain size: {}", summary.header.domain);
            println!("   - Basis points: {}", summary.basis_len);
            println!("   - Proving keys: {}", summary.proving_key_count());
            for path in &summary.written {
                println!("   - {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Key extraction failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
