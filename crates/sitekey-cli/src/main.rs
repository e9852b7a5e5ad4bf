//! `sitekey`: derive site passwords from the command line.
//!
//! The generated value is the only thing written to stdout; logs and errors
//! go to stderr so the output can be piped straight into a clipboard tool.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sitekey_core::{
    canonicalize_domain, canonicalize_identity, canonicalize_security_question,
    disable_core_dumps, generate, GenerationRequest, OutputType, DEFAULT_VERSION,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

#[derive(Parser, Debug)]
#[command(name = "sitekey")]
#[command(about = "Deterministic per-site passwords from one pass phrase", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive a password, PIN, login or security answer for a site
    Generate(GenerateArgs),

    /// Print the canonical form of a domain, identity or question
    Canonicalize(CanonicalizeArgs),

    /// List the output types
    Types,
}

#[derive(Args)]
struct GenerateArgs {
    /// Full name or username identifying you
    #[arg(short, long, env = "SITEKEY_IDENTITY")]
    identity: String,

    /// Site domain or URL
    #[arg(short, long)]
    domain: String,

    /// Output type (see `sitekey types`)
    #[arg(short = 't', long = "type", default_value = "maximum-password")]
    output_type: String,

    /// Pass phrase; prompted for when neither this nor the env var is set
    #[arg(long, env = "SITEKEY_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Password version, bumped to rotate a site password
    #[arg(short = 'n', long, default_value_t = DEFAULT_VERSION)]
    version: u32,

    /// Security question (required for `answer`)
    #[arg(short, long)]
    question: Option<String>,

    /// Username on the site, when it differs per account
    #[arg(short, long)]
    username: Option<String>,
}

impl std::fmt::Debug for GenerateArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateArgs")
            .field("identity", &self.identity)
            .field("domain", &self.domain)
            .field("output_type", &self.output_type)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "***"))
            .field("version", &self.version)
            .field("question", &self.question)
            .field("username", &self.username)
            .finish()
    }
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct CanonicalizeArgs {
    /// Domain or URL
    #[arg(long)]
    domain: Option<String>,

    /// Identity or site username
    #[arg(long)]
    identity: Option<String>,

    /// Security question
    #[arg(long)]
    question: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitekey=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = disable_core_dumps() {
        tracing::warn!("could not disable core dumps: {e}");
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => handle_generate(args),
        Commands::Canonicalize(args) => {
            handle_canonicalize(&args);
            Ok(())
        }
        Commands::Types => {
            handle_types();
            Ok(())
        }
    }
}

fn handle_generate(mut args: GenerateArgs) -> Result<()> {
    let passphrase = match args.passphrase.take() {
        Some(p) => Zeroizing::new(p),
        None => Zeroizing::new(
            rpassword::prompt_password("Pass phrase: ").context("failed to read pass phrase")?,
        ),
    };

    let mut request = GenerationRequest::new(
        &args.identity,
        passphrase.as_bytes(),
        &args.domain,
        &args.output_type,
    )
    .with_version(args.version);
    if let Some(question) = args.question.as_deref() {
        request = request.with_security_question(question);
    }
    if let Some(username) = args.username.as_deref() {
        request = request.with_site_username(username);
    }

    let output = generate(&request)
        .with_context(|| format!("cannot generate {} for {}", args.output_type, args.domain))?;
    println!("{}", output.as_str());
    Ok(())
}

fn handle_canonicalize(args: &CanonicalizeArgs) {
    if let Some(domain) = &args.domain {
        println!("{}", canonicalize_domain(domain));
    } else if let Some(identity) = &args.identity {
        println!("{}", canonicalize_identity(identity));
    } else if let Some(question) = &args.question {
        println!("{}", canonicalize_security_question(question));
    }
}

fn handle_types() {
    for output_type in OutputType::ALL {
        let scheme = output_type.scheme();
        println!(
            "{:<18} {:>2}  {}",
            output_type.as_str(),
            scheme.max_length(),
            scheme.name()
        );
    }
}
