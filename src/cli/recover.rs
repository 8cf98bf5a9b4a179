use clap::Parser;
use serde::Serialize;

use crate::{
    cli::common::{ConfigArgs, LedgerArgs},
    prelude::*,
    quantity::{density::KilogramsPerCubicMetre, time::Seconds},
    recovery::{DiveRecharge, DiveRechargeBalance, Recovery, RecoveryDay},
    report::RecoveryReport,
};

#[derive(Parser)]
pub struct RecoverArgs {
    #[clap(flatten)]
    config: ConfigArgs,

    #[clap(flatten)]
    ledger: LedgerArgs,

    /// Air density across the turbine during the scripted day, kg/m³.
    #[clap(long, default_value = "1.0", env = "PLANEUR_AIR_DENSITY")]
    air_density: KilogramsPerCubicMetre,

    /// Length of the recharge dive in seconds.
    #[clap(long, default_value = "300", env = "PLANEUR_DIVE_SECONDS")]
    dive_seconds: Seconds,
}

#[derive(Serialize)]
struct Ledger<'a> {
    day: &'a RecoveryDay,
    dive: &'a DiveRechargeBalance,
}

impl RecoverArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        ensure!(
            self.air_density.0.is_finite() && self.air_density.0 > 0.0,
            "air density must be positive, got {}",
            self.air_density,
        );
        ensure!(
            self.dive_seconds.is_finite() && self.dive_seconds >= Seconds::ZERO,
            "dive duration must not be negative, got {}",
            self.dive_seconds,
        );
        let config = self.config.load()?;
        let day = Recovery::builder().glider(&config.glider).air_density(self.air_density).run();
        let recharge = DiveRecharge { duration: self.dive_seconds, ..DiveRecharge::for_glider(&config.glider) };
        let dive = recharge.compute();
        println!("{}", RecoveryReport { day: &day, recharge: &recharge, dive: &dive });
        self.ledger.write(&Ledger { day: &day, dive: &dive })
    }
}
