//! Model doclet - command-line tool documenting the data models of an API.
//!
//! Reads type declarations from a type catalog (YAML/JSON) or from Rust sources, walks
//! the type graph reachable from the chosen root types, and writes the discovered models
//! as a Swagger 1.2 `models` document.
//!
//! # Usage
//!
//! ```bash
//! model-doclet [OPTIONS] <INPUT>
//! ```
//!
//! # Examples
//!
//! Document everything reachable from one type in a catalog:
//! ```bash
//! model-doclet shop.types.yaml --root com.acme.Order -o models.yaml
//! ```
//!
//! Document the structs of a Rust crate as JSON:
//! ```bash
//! model-doclet ./my-crate/src -f json -o models.json
//! ```

mod catalog;
mod cli;
mod config;
mod definitions_builder;
mod detector;
mod error;
mod model;
mod model_parser;
mod opacity;
mod oracle;
mod parser;
mod scanner;
mod serializer;
mod translator;
mod type_resolver;

use anyhow::Result;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse once up front so the verbose flag can configure the logger
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Model doclet starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Model documentation completed successfully");

    Ok(())
}
