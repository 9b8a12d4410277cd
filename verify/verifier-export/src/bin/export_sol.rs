use clap::Parser;
use libs::utils::init_tracing;
use std::process::ExitCode;
use verifier_export::export_verifier;

#[derive(Parser, Debug)]
#[command(author, version, about = "Export a Groth16 verifying key as a Solidity verifier", long_about = None)]
struct Config {
    /// Session name: reads <SESSION>.vk.save, writes <SESSION>.sol
    #[arg(long, value_name = "SESSION")]
    session: String,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// cargo run --release --bin export_sol -- --session semaphore
fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing(config.verbose);

    match export_verifier(&config.session) {
        Ok(path) => {
            println!("✅ Verifier contract written to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Export failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
