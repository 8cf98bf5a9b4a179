use std::fmt::{Display, Formatter};

use enumset::EnumSet;
use serde::Serialize;

use crate::narrator::{
    step::StepIndex,
    totals::{Accumulator, RunningTotals},
};

/// Which running totals the zero floor applies to.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FloorCheck {
    /// Every intermediate total must stay non-negative.
    #[default]
    EveryStep,

    /// Only the totals at the end of the horizon count.
    FinalOnly,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Breach {
    pub step: StepIndex,
    pub accumulators: EnumSet<Accumulator>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Viable,
    Fails(Breach),
}

impl Verdict {
    pub const fn is_viable(&self) -> bool {
        matches!(self, Self::Viable)
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Viable => write!(f, "le système est viable"),
            Self::Fails(_) => write!(f, "le système échoue"),
        }
    }
}

impl FloorCheck {
    /// Judge the sequence of running totals, taken after each step.
    pub fn judge<'a>(self, totals: impl IntoIterator<Item = (StepIndex, &'a RunningTotals)>) -> Verdict {
        let breach = match self {
            Self::EveryStep => totals.into_iter().find_map(|(step, totals)| Self::breach(step, totals)),
            Self::FinalOnly => totals.into_iter().last().and_then(|(step, totals)| Self::breach(step, totals)),
        };
        breach.map_or(Verdict::Viable, Verdict::Fails)
    }

    fn breach(step: StepIndex, totals: &RunningTotals) -> Option<Breach> {
        let accumulators = totals.below_floor();
        if accumulators.is_empty() { None } else { Some(Breach { step, accumulators }) }
    }
}
