//! Prints the OpenAPI document for the aquarium API.
//!
//!   cargo run --bin generate_openapi > openapi.json
//!   cargo run --bin generate_openapi -- --output openapi.json

use std::{env, fs, io::Write, path::PathBuf, process::ExitCode};

use aquarium_service::api::handlers::ApiDoc;
use utoipa::OpenApi;

fn main() -> ExitCode {
    let json = match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialise OpenAPI document: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut args = env::args().skip(1);
    let mut output: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        if arg == "--output" {
            output = args.next().map(PathBuf::from);
        }
    }

    let written = match &output {
        Some(path) => fs::write(path, &json).map(|()| eprintln!("Wrote {}", path.display())),
        None => std::io::stdout().write_all(json.as_bytes()),
    };

    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to write OpenAPI document: {e}");
            ExitCode::FAILURE
        }
    }
}
