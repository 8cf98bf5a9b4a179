use clap::Parser;

use crate::{
    cli::common::ConfigArgs,
    cycle::{Checks, ClosedCycle},
    prelude::*,
    report::ChecksReport,
};

#[derive(Parser)]
pub struct CheckArgs {
    #[clap(flatten)]
    config: ConfigArgs,
}

impl CheckArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let config = self.config.load()?;
        let checks = Checks::compute(&config.glider);
        let closed_cycle = ClosedCycle::default().compute();
        println!("{}", ChecksReport { checks: &checks, closed_cycle: &closed_cycle });
        Ok(())
    }
}
