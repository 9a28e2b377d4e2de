//! Generate a field-encryption key for `ENCRYPTION_KEY`.
//!
//! Run with: `cargo run --bin phivault-keygen -- --env-line`
//!
//! The key goes to stdout and operator guidance to stderr, so the output
//! can be piped straight into a secrets store.

use clap::{Parser, ValueEnum};
use phivault::config::ENCRYPTION_KEY_ENV;
use phivault::{generate_key, generate_key_base64};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KeyFormat {
    /// 64 hexadecimal characters
    Hex,
    /// 44 base64 characters
    Base64,
}

#[derive(Debug, Parser)]
#[command(name = "phivault-keygen", version, about = "Generate a 256-bit field-encryption key")]
struct Cli {
    /// Output encoding
    #[arg(long, value_enum, default_value_t = KeyFormat::Hex)]
    format: KeyFormat,

    /// Print as `ENCRYPTION_KEY=<key>`
    #[arg(long)]
    env_line: bool,

    /// Suppress guidance on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let key = match cli.format {
        KeyFormat::Hex => generate_key()?,
        KeyFormat::Base64 => generate_key_base64()?,
    };
    tracing::debug!(format = ?cli.format, "generated encryption key");

    if cli.env_line {
        println!("{ENCRYPTION_KEY_ENV}={key}");
    } else {
        println!("{key}");
    }

    if !cli.quiet {
        eprintln!();
        eprintln!("Set this as {ENCRYPTION_KEY_ENV} in the service environment.");
        eprintln!("  - Never commit it to version control.");
        eprintln!("  - Use a different key per environment.");
        eprintln!("  - Back it up securely: losing it makes encrypted columns unreadable.");
    }

    Ok(())
}
