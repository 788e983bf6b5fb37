//! wabin - binary node encoder tool
//!
//! Encodes JSON node trees into wire frames and inspects the token
//! dictionary.

mod config;

use clap::{Parser, Subcommand};
use config::{Config, OutputFormat};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wabin_protocol::dictionary::{LEGACY_USER_SERVER, USER_SERVER};
use wabin_protocol::{Encoder, NodeWriter, Token, TokenDictionary};

#[derive(Parser)]
#[command(name = "wabin")]
#[command(about = "Encode chat protocol nodes into binary frames")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, env = "WABIN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON node ([tag, attrs, children])
    Encode {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Write raw bytes instead of hex
        #[arg(long)]
        raw: bool,
    },

    /// List the token dictionary
    Tokens,

    /// Show how a string is written on the wire
    Token {
        /// String to resolve
        value: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (stdout carries the encoded output)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return Err(e.into());
        }
    };
    tracing::debug!("Using configuration: {:?}", config);

    match cli.command {
        Commands::Encode { file, raw } => {
            let input = match &file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let encoder = Encoder::with_config(config.encoder.clone());
            let frame = match encoder.encode_json(&input) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!("Encode failed ({}): {}", e.kind(), e);
                    return Err(e.into());
                }
            };
            tracing::info!("Encoded frame: {} bytes", frame.len());

            let output = if raw { OutputFormat::Raw } else { config.output };
            let mut stdout = std::io::stdout().lock();
            match output {
                OutputFormat::Hex => writeln!(stdout, "{}", hex::encode(&frame))?,
                OutputFormat::Raw => stdout.write_all(&frame)?,
            }
            stdout.flush()?;
        }

        Commands::Tokens => {
            let dict = TokenDictionary::standard();
            for (index, token) in dict.iter() {
                println!("{:>4}  {}", index, token);
            }
        }

        Commands::Token { value } => {
            let dict = TokenDictionary::standard();
            let lookup = if value == LEGACY_USER_SERVER {
                USER_SERVER
            } else {
                value.as_str()
            };
            match dict.resolve(lookup)? {
                Some(Token::Single(index)) => println!("single-byte token {}", index),
                Some(Token::Double { page, index }) => {
                    println!("double-byte token page {} index {}", page, index)
                }
                None if value.contains('@') => println!("JID pair"),
                None => println!("raw string ({} bytes)", value.len()),
            }

            let mut writer = NodeWriter::new(dict, &config.encoder);
            writer.write_string(&value, false)?;
            println!("{}", hex::encode(writer.into_bytes()));
        }
    }

    Ok(())
}
