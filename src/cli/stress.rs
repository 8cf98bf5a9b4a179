use clap::Parser;

use crate::{
    cli::common::{ConfigArgs, LedgerArgs},
    prelude::*,
    quantity::mass::Kilograms,
    report::StressReport,
    stress::Stress,
};

#[derive(Parser)]
pub struct StressArgs {
    #[clap(flatten)]
    config: ConfigArgs,

    #[clap(flatten)]
    ledger: LedgerArgs,

    /// Hours without wind or sun.
    #[clap(long, default_value = "48", env = "PLANEUR_CRISIS_HOURS")]
    hours: u32,

    /// Initial coal in kilograms, instead of the configured one.
    #[clap(long, env = "PLANEUR_COAL")]
    coal: Option<Kilograms>,

    /// Print every n-th hour.
    #[clap(long, default_value = "6", env = "PLANEUR_EVERY_N_HOURS")]
    every_n_hours: usize,
}

impl StressArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        if let Some(coal) = self.coal {
            ensure!(coal.is_finite() && coal >= Kilograms::ZERO, "coal must be a non-negative mass, got {coal}");
        }
        let config = self.config.load()?;
        let outcome = Stress::builder()
            .glider(&config.glider)
            .crisis_hours(self.hours)
            .maybe_coal(self.coal)
            .run();
        println!("{}", StressReport { outcome: &outcome, every_n_hours: self.every_n_hours });
        self.ledger.write(&outcome)
    }
}
