use clap::Parser;

use crate::{
    cli::common::{ConfigArgs, LedgerArgs, SeedArgs},
    flight::Simulator,
    prelude::*,
    report::FlightReport,
    rng,
};

#[derive(Parser)]
pub struct FlyArgs {
    #[clap(flatten)]
    config: ConfigArgs,

    #[clap(flatten)]
    seed: SeedArgs,

    #[clap(flatten)]
    ledger: LedgerArgs,

    /// Flight duration.
    #[clap(long, default_value = "360", env = "PLANEUR_DAYS", value_parser = clap::value_parser!(u32).range(1..))]
    days: u32,
}

impl FlyArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let config = self.config.load()?;
        let (seed, mut rng) = rng::seeded(self.seed.seed);
        let flight = Simulator::builder().glider(&config.glider).rng(&mut rng).days(self.days).run();
        println!("{}", FlightReport { flight: &flight, seed });
        self.ledger.write(&flight)
    }
}
