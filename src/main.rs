use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use tracing::Level;

#[derive(Parser)]
#[command(name = "trinomial")]
#[command(version, about = "Replace names and email addresses with short host-keyed hashes")]
struct Cli {
    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Anonymize each TEXT, or each line of stdin when none are given
    Anon {
        #[arg(short, long, default_value_t = trinomial::DEFAULT_LENGTH)]
        length: usize,
        /// Use this key instead of the host key (testing only)
        #[arg(short, long)]
        key: Option<String>,
        text: Vec<String>,
    },
    /// Show where the host key comes from
    HostKey {
        /// Also print the key bytes as hex
        #[arg(long)]
        show: bool,
    },
    /// Print package information
    Version,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Commands::Anon { length, key, text } => run_anon(length, key.as_deref(), &text),
        Commands::HostKey { show } => run_host_key(show),
        Commands::Version => run_version(),
    };
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run_anon(length: usize, key: Option<&str>, text: &[String]) -> anyhow::Result<()> {
    use anyhow::Context;
    use trinomial::Anonymizer;

    let anonymizer = match key {
        Some(key) => Anonymizer::with_key(key).context("invalid --key")?,
        None => Anonymizer::from_host(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if text.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read stdin")?;
            writeln!(out, "{}", anonymizer.anonymize(Some(&line), length)?)?;
        }
    } else {
        for t in text {
            writeln!(out, "{}", anonymizer.anonymize(Some(t), length)?)?;
        }
    }
    Ok(())
}

fn run_host_key(show: bool) -> anyhow::Result<()> {
    let key = trinomial::HostKeyResolver::for_current_platform().resolve();
    println!("Platform: {:?}", trinomial::Platform::detect());
    println!("Origin: {}", key.origin());
    if show {
        println!("Key: {}", hex::encode(key.as_bytes()));
    }
    Ok(())
}

fn run_version() -> anyhow::Result<()> {
    print!("{}", version_text());
    Ok(())
}

fn version_text() -> String {
    format!(
        "{} version {}\nAuthors: {}\nURL: {}\nLicense: {}\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS"),
        env!("CARGO_PKG_REPOSITORY"),
        env!("CARGO_PKG_LICENSE"),
    )
}
