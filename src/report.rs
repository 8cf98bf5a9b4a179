//! Prose around the computed results. Nothing here does physics.

use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::{
    cycle::{Checks, ClosedCycleBalance, MAX_WING_LOADING},
    flight::{Flight, LANDING_ALTITUDE},
    fmt::FormattedPercentage,
    narrator::{Narration, Verdict},
    recovery::{COMPRESSOR_DEMAND, DiveRecharge, DiveRechargeBalance, IGNITION_POWER, RecoveryDay},
    stress::StressOutcome,
    tables::{
        build_checkpoints_table,
        build_checks_table,
        build_closed_cycle_table,
        build_daily_table,
        build_dive_recharge_table,
        build_mass_balance_table,
        build_mode_hours_table,
        build_recovery_table,
        build_stress_resources_table,
        build_stress_table,
        build_tally_table,
        build_totals_table,
    },
};

const RULE: &str = "======================================================================";

/// Alerts listed in full before the rest are only counted.
const LISTED_ALERTS: usize = 10;

fn title(f: &mut Formatter<'_>, text: &str) -> std::fmt::Result {
    writeln!(f, "{RULE}")?;
    writeln!(f, "{text}")?;
    writeln!(f, "{RULE}")
}

pub struct NarrationReport<'a> {
    pub narration: &'a Narration,
    pub seed: u64,
    pub every_n_days: u32,
}

impl Display for NarrationReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let narration = self.narration;
        title(f, "BILAN ÉNERGÉTIQUE DU PLANEUR BLEU")?;
        writeln!(f, "Graine : {}, contrôle du plancher : {:?}", self.seed, narration.floor_check)?;
        writeln!(f, "{} pas simulés.", narration.records.len())?;
        writeln!(f, "Rotor de l'éolienne : {:.0} tr/min au vent nominal.", narration.rotor_rpm)?;
        writeln!(f)?;
        writeln!(f, "{}", build_daily_table(&narration.records, self.every_n_days))?;
        writeln!(f)?;
        writeln!(f, "Énergie récoltée et consommée sur l'horizon :")?;
        writeln!(f, "{}", build_tally_table(&narration.tally))?;
        writeln!(f)?;
        writeln!(f, "{}", build_totals_table(&narration.initial, &narration.final_totals()))?;
        writeln!(f)?;
        match narration.verdict {
            Verdict::Viable => writeln!(f, "Verdict : {}.", narration.verdict),
            Verdict::Fails(breach) => writeln!(
                f,
                "Verdict : {}. Premier passage sous zéro au jour {}, pas {} ({}).",
                narration.verdict,
                breach.step.day,
                breach.step.step_of_day,
                breach.accumulators.iter().join(", "),
            ),
        }
    }
}

pub struct FlightReport<'a> {
    pub flight: &'a Flight,
    pub seed: u64,
}

impl Display for FlightReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let summary = &self.flight.summary;
        title(f, &format!("SIMULATION DE {} HEURES DE VOL", summary.n_hours))?;
        writeln!(f, "Graine : {}", self.seed)?;
        writeln!(f)?;
        if !self.flight.checkpoints.is_empty() {
            writeln!(f, "{}", build_checkpoints_table(&self.flight.checkpoints))?;
            writeln!(f)?;
        }
        writeln!(f, "Bilan de masse :")?;
        writeln!(f, "{}", build_mass_balance_table(summary))?;
        writeln!(f)?;
        writeln!(f, "Répartition des modes de vol :")?;
        writeln!(f, "{}", build_mode_hours_table(summary))?;
        writeln!(f)?;
        writeln!(f, "Distance parcourue : {}", summary.distance)?;
        writeln!(f, "Altitude minimale : {}", summary.min_altitude)?;
        writeln!(f, "Énergie solaire captée : {:.1} kWh", summary.solar_energy.to_kilowatt_hours())?;
        writeln!(f, "Énergie moteur produite : {:.1} kWh", summary.engine_energy.to_kilowatt_hours())?;
        writeln!(
            f,
            "Incendies détectés : {}, éteints : {}",
            summary.fires_detected, summary.fires_extinguished
        )?;
        writeln!(
            f,
            "Atterrissages : {} (passages sous {:.0}, une descente prolongée compte une seule fois)",
            summary.landings, LANDING_ALTITUDE,
        )?;

        if !summary.alerts.is_empty() {
            writeln!(f)?;
            writeln!(f, "Alertes ({}) :", summary.alerts.len())?;
            for alert in summary.alerts.iter().take(LISTED_ALERTS) {
                writeln!(f, "  jour {:>3}, {:>2} h : {}", alert.day, alert.hour, alert.alert)?;
            }
            if summary.alerts.len() > LISTED_ALERTS {
                writeln!(f, "  … et {} autres", summary.alerts.len() - LISTED_ALERTS)?;
            }
        }

        writeln!(f)?;
        if summary.is_viable() {
            writeln!(f, "Verdict : le système est viable sur {} jours.", summary.n_hours / 24)
        } else {
            writeln!(f, "Verdict : le système échoue ({}).", summary.shortfalls.iter().join(", "))
        }
    }
}

pub struct StressReport<'a> {
    pub outcome: &'a StressOutcome,
    pub every_n_hours: usize,
}

impl Display for StressReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let outcome = self.outcome;
        title(f, &format!("TEST DE STRESS : {} HEURES SANS VENT NI SOLEIL", outcome.crisis_hours))?;
        writeln!(f, "{}", build_stress_table(outcome, self.every_n_hours))?;
        writeln!(f)?;
        writeln!(f, "{}", build_stress_resources_table(outcome))?;
        writeln!(f)?;
        writeln!(
            f,
            "Charbon utilisé : {} ({})",
            outcome.coal_used,
            FormattedPercentage(outcome.coal_used_fraction()),
        )?;
        writeln!(f, "Hydrogène brûlé : {}", outcome.h2_used)?;
        writeln!(f, "Cycles moteur : {}", outcome.engine_cycles)?;
        writeln!(
            f,
            "Altitude minimale : {} ({}), finale : {}",
            outcome.min_altitude,
            if outcome.safety_margin() { "marge de sécurité" } else { "limite" },
            outcome.final_altitude,
        )?;
        writeln!(
            f,
            "Régénération de l'hydrogène : {}",
            if outcome.h2_regenerated() { "oui" } else { "partielle" }
        )?;
        writeln!(f)?;
        if outcome.survived {
            writeln!(f, "Verdict : le planeur survit à {} heures de crise totale.", outcome.crisis_hours)
        } else {
            writeln!(f, "Verdict : le système n'a pas survécu à la crise.")
        }
    }
}

pub struct RecoveryReport<'a> {
    pub day: &'a RecoveryDay,
    pub recharge: &'a DiveRecharge,
    pub dive: &'a DiveRechargeBalance,
}

impl Display for RecoveryReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let day = self.day;
        title(f, "PROTOCOLE DE RÉCUPÉRATION : TURBINE RÉVERSIBLE")?;
        writeln!(f, "{}", build_recovery_table(day))?;
        for hour in day.hours.iter().filter(|hour| hour.teng_power < IGNITION_POWER) {
            writeln!(
                f,
                "À {} h, le TENG ne fournit que {:.1} à {} : allumage H2 incertain (seuil {}).",
                hour.scenario.hour, hour.teng_power, hour.scenario.speed, IGNITION_POWER,
            )?;
        }
        writeln!(
            f,
            "Hydrogène : {} ({}), CO2 liquide : {} → {}.",
            day.h2_balance(),
            if day.h2_regenerated() { "excédent" } else { "déficit" },
            day.initial.co2,
            day.final_.co2,
        )?;
        writeln!(f)?;
        title(f, "RECHARGE PAR PIQUÉ GRAVITATIONNEL")?;
        writeln!(f, "{}", build_dive_recharge_table(self.recharge, self.dive))?;
        writeln!(
            f,
            "Le piqué fournit {:.1}× les {} d'un compresseur électrique.",
            self.dive.compression_power / COMPRESSOR_DEMAND,
            COMPRESSOR_DEMAND,
        )?;
        if self.dive.hits_ground(self.recharge.initial_altitude) {
            writeln!(
                f,
                "Attention : ce piqué demande {} de hauteur, le sol est atteint après {:.0}.",
                self.dive.altitude_lost,
                self.recharge.max_duration(),
            )
        } else {
            writeln!(f, "Altitude finale : {}.", self.dive.final_altitude)
        }
    }
}

pub struct ChecksReport<'a> {
    pub checks: &'a Checks,
    pub closed_cycle: &'a ClosedCycleBalance,
}

impl Display for ChecksReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        title(f, "VÉRIFICATIONS PRÉLIMINAIRES")?;
        writeln!(f, "{}", build_checks_table(self.checks))?;
        if !self.checks.wing_loading_is_acceptable() {
            writeln!(f, "La charge alaire dépasse {MAX_WING_LOADING} kg/m².")?;
        }
        if self.checks.cycle_exceeds_carnot() {
            writeln!(
                f,
                "Le rendement thermique du cycle ({}) dépasse la borne de Carnot ({}) : la chaleur fournie ne compte que le chauffage isochore.",
                FormattedPercentage(self.checks.cycle.thermal_efficiency),
                FormattedPercentage(self.checks.carnot),
            )?;
        }
        writeln!(f)?;
        title(f, "CYCLE FERMÉ CO2/N2")?;
        writeln!(f, "{}", build_closed_cycle_table(self.closed_cycle))?;
        if self.closed_cycle.is_plausible() {
            writeln!(f, "Rendement aller-retour dans la plage habituelle (15 à 35 %).")
        } else {
            writeln!(f, "Rendement aller-retour hors de la plage habituelle (15 à 35 %).")
        }
    }
}
