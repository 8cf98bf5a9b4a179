use clap::Parser;

use crate::{
    cli::common::{ConfigArgs, LedgerArgs, SeedArgs},
    narrator::{FloorCheck, Narrator},
    prelude::*,
    report::NarrationReport,
    rng,
};

#[derive(Parser)]
pub struct NarrateArgs {
    #[clap(flatten)]
    config: ConfigArgs,

    #[clap(flatten)]
    seed: SeedArgs,

    #[clap(flatten)]
    ledger: LedgerArgs,

    /// Which running totals must stay non-negative.
    #[clap(long, value_enum, default_value_t, env = "PLANEUR_FLOOR_CHECK")]
    floor_check: FloorCheck,

    /// Override the horizon length in days.
    #[clap(long, env = "PLANEUR_DAYS", value_parser = clap::value_parser!(u32).range(1..))]
    days: Option<u32>,

    /// Print every n-th day in the daily table.
    #[clap(long, default_value = "30", env = "PLANEUR_EVERY_N_DAYS")]
    every_n_days: u32,
}

impl NarrateArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let config = self.config.load_with(|config| {
            if let Some(days) = self.days {
                config.budget.horizon.days = days;
            }
        })?;
        let (seed, mut rng) = rng::seeded(self.seed.seed);
        let narration = Narrator::builder()
            .budget(&config.budget)
            .rng(&mut rng)
            .floor_check(self.floor_check)
            .run()?;
        println!("{}", NarrationReport { narration: &narration, seed, every_n_days: self.every_n_days });
        self.ledger.write(&narration)
    }
}
