#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod capture;
mod cli;
mod config;
mod cycle;
mod flight;
mod fmt;
mod narrator;
mod physics;
mod prelude;
mod quantity;
mod recovery;
mod report;
mod rng;
mod stress;
mod tables;
mod weather;

use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Narrate(args) => args.run()?,
        Command::Fly(args) => args.run()?,
        Command::Stress(args) => args.run()?,
        Command::Check(args) => args.run()?,
        Command::Recover(args) => args.run()?,
        Command::Capture(args) => args.run()?,
    }

    info!("done!");
    Ok(())
}
