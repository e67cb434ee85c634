//! cachewire CLI Client
//!
//! Command-line interface for talking to a cachewire node.

use cachewire::network::Client;
use cachewire::{Config, Extra, Message, OpCode, StatusCode};
use clap::{Parser, Subcommand};

/// cachewire CLI
#[derive(Parser, Debug)]
#[command(name = "cachewire-cli")]
#[command(about = "CLI for a cachewire key-value cache node")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:3320")]
    server: String,

    /// DMap to operate on
    #[arg(short, long, default_value = "default")]
    dmap: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        /// Expire after this many milliseconds
        #[arg(long)]
        ttl: Option<i64>,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Drop the whole DMap
    Destroy,
}

fn build_request(dmap: String, command: Commands) -> Message {
    match command {
        Commands::Get { key } => Message::request(OpCode::Get, dmap, key),
        Commands::Put { key, value, ttl: None } => {
            Message::request(OpCode::Put, dmap, key).with_value(value)
        }
        Commands::Put {
            key,
            value,
            ttl: Some(ttl),
        } => Message::request(OpCode::PutWithTtl, dmap, key)
            .with_extra(Extra::PutWithTtl { ttl })
            .with_value(value),
        Commands::Del { key } => Message::request(OpCode::Delete, dmap, key),
        Commands::Destroy => Message::request(OpCode::Destroy, dmap, ""),
    }
}

fn main() {
    let args = Args::parse();
    let request = build_request(args.dmap, args.command);

    let mut client = match Client::connect(&args.server, &Config::default()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    match client.call(&request) {
        Ok(response) if response.status == StatusCode::Ok => {
            if response.value.is_empty() {
                println!("OK");
            } else {
                println!("{}", String::from_utf8_lossy(&response.value));
            }
        }
        Ok(response) => {
            eprintln!(
                "{}: {}",
                response.status,
                String::from_utf8_lossy(&response.value)
            );
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("Request failed: {}", e);
            std::process::exit(1);
        }
    }
}
