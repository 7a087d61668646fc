//! FlatKV CLI Client
//!
//! Sends one request to a FlatKV server and prints the reply.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flatkv::protocol::{read_response, write_request, Request, Response, Status};

/// FlatKV CLI
#[derive(Parser, Debug)]
#[command(name = "flatkv-cli")]
#[command(about = "CLI for the FlatKV key-value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    server: String,

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

    /// Create or update a key
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let request = match args.command {
        Commands::Get { key } => Request::get(key),
        Commands::Put { key, value } => Request::put(key, value),
        Commands::Del { key } => Request::delete(key),
    };

    match send(&args.server, &request) {
        Ok(response) if response.status == Status::Ok => {
            println!("{}", response.text());
            ExitCode::SUCCESS
        }
        Ok(response) => {
            eprintln!("{:?}: {}", response.status, response.text());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn send(addr: &str, request: &Request) -> flatkv::Result<Response> {
    let stream = TcpStream::connect(addr)?;
    let mut writer = BufWriter::new(stream.try_clone()?);
    let mut reader = BufReader::new(stream);

    write_request(&mut writer, request)?;
    read_response(&mut reader)
}
