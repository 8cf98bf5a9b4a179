mod capture;
mod check;
mod common;
mod fly;
mod narrate;
mod recover;
mod stress;

use clap::{Parser, Subcommand};

use crate::cli::{
    capture::CaptureArgs,
    check::CheckArgs,
    fly::FlyArgs,
    narrate::NarrateArgs,
    recover::RecoverArgs,
    stress::StressArgs,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fold the harvested and consumed power into running totals and judge the balance.
    #[clap(name = "narrate")]
    Narrate(Box<NarrateArgs>),

    /// Fly the glider hour by hour over a year and keep the mass ledger.
    #[clap(name = "fly")]
    Fly(Box<FlyArgs>),

    /// Hours without wind or sun, then recovery.
    #[clap(name = "stress")]
    Stress(Box<StressArgs>),

    /// Closed-form checks: mass, wing loading, Carnot bound, CO2 cycles.
    #[clap(name = "check")]
    Check(Box<CheckArgs>),

    /// Reversible turbine protocol over a scripted day, and the dive recharge of the CO2.
    #[clap(name = "recover")]
    Recover(Box<RecoverArgs>),

    /// Re-run a command and capture its output into a text file.
    #[clap(name = "capture")]
    Capture(Box<CaptureArgs>),
}
