use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    cycle::{Checks, ClosedCycleBalance},
    flight::{Checkpoint, Summary},
    fmt::FormattedPercentage,
    narrator::{Record, RunningTotals, Tally},
    quantity::{energy::WattHours, mass::Kilograms},
    recovery::{DiveRecharge, DiveRechargeBalance, RecoveryDay},
    stress::StressOutcome,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn right(content: impl ToString) -> Cell {
    Cell::new(content).set_alignment(CellAlignment::Right)
}

fn signed<T: PartialOrd + Default + ToString>(value: T) -> Cell {
    right(value.to_string()).fg(if value < T::default() { Color::Red } else { Color::Green })
}

/// Share of a term in its total, zero when nothing was harvested or consumed.
fn share(energy: WattHours, total: WattHours) -> Cell {
    let fraction = if total > WattHours::ZERO { energy / total } else { 0.0 };
    right(FormattedPercentage(fraction)).add_attribute(Attribute::Dim)
}

pub fn build_tally_table(tally: &Tally) -> Table {
    let harvested = tally.harvest.total();
    let consumed = tally.consumption.total();

    let mut table = new_table();
    table.set_header(vec!["", "Terme", "Énergie", "Part"]);
    for (label, energy) in tally.harvest.entries() {
        table.add_row(vec![
            Cell::new("+").fg(Color::Green),
            Cell::new(label),
            right(energy),
            share(energy, harvested),
        ]);
    }
    for (label, energy) in tally.consumption.entries() {
        table.add_row(vec![
            Cell::new("−").fg(Color::Red),
            Cell::new(label),
            right(energy),
            share(energy, consumed),
        ]);
    }
    table.add_row(vec![
        Cell::new("="),
        Cell::new("bilan net").add_attribute(Attribute::Bold),
        signed(tally.net()),
        Cell::new(""),
    ]);
    table
}

pub fn build_totals_table(initial: &RunningTotals, final_: &RunningTotals) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Réservoir", "Initial", "Final", "Variation"]);
    let rows: [(&str, String, String, Cell); 3] = [
        (
            "énergie",
            initial.energy.to_string(),
            final_.energy.to_string(),
            signed(final_.energy - initial.energy),
        ),
        ("carburant", initial.fuel.to_string(), final_.fuel.to_string(), signed(final_.fuel - initial.fuel)),
        (
            "CO2 liquide",
            initial.liquid_co2.to_string(),
            final_.liquid_co2.to_string(),
            signed(final_.liquid_co2 - initial.liquid_co2),
        ),
    ];
    for (label, initial, final_, delta) in rows {
        table.add_row(vec![Cell::new(label), right(initial).add_attribute(Attribute::Dim), right(final_), delta]);
    }
    table
}

/// One row per day, taken at the end of the day.
pub fn build_daily_table(records: &[Record], every_n_days: u32) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Jour", "Récolté", "Consommé", "Énergie", "Carburant", "CO2 liquide"]);
    let ends_of_day = records.iter().filter(|record| {
        records
            .get(record.step.index.absolute as usize + 1)
            .is_none_or(|next| next.step.index.day != record.step.index.day)
    });
    for record in ends_of_day.filter(|record| record.step.index.day % every_n_days.max(1) == 0) {
        let step = &record.step;
        table.add_row(vec![
            Cell::new(step.index.day).add_attribute(Attribute::Dim),
            right(step.harvest.total()).fg(Color::Green),
            right(step.consumption.total()).fg(Color::Red),
            signed(record.totals.energy),
            signed(record.totals.fuel),
            signed(record.totals.liquid_co2),
        ]);
    }
    table
}

pub fn build_mass_balance_table(summary: &Summary) -> Table {
    let initial = &summary.initial.reservoirs;
    let final_ = &summary.final_.reservoirs;
    let rows: [(&str, Kilograms, Kilograms, Kilograms); 5] = [
        ("CO2", initial.co2, final_.co2, summary.deltas.co2),
        ("H2", initial.h2, final_.h2, summary.deltas.h2),
        ("H2O", initial.water, final_.water, summary.deltas.water),
        ("Charbon", initial.coal, final_.coal, summary.deltas.coal),
        ("O2", summary.initial.o2, summary.final_.o2, summary.deltas.o2),
    ];

    let mut table = new_table();
    table.set_header(vec!["Ressource", "Initial", "Final", "Δ"]);
    for (label, initial, final_, delta) in rows {
        table.add_row(vec![
            Cell::new(label),
            right(initial).add_attribute(Attribute::Dim),
            right(final_),
            signed(delta),
        ]);
    }
    table
}

pub fn build_mode_hours_table(summary: &Summary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Mode", "Heures", "Part"]);
    for (mode, hours) in &summary.mode_hours {
        // Hour counts are tiny compared to the 52-bit mantissa.
        #[allow(clippy::cast_precision_loss)]
        let share = *hours as f64 / summary.n_hours.max(1) as f64;
        table.add_row(vec![
            Cell::new(mode).fg(mode.color()),
            right(hours),
            right(FormattedPercentage(share)).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_checkpoints_table(checkpoints: &[Checkpoint]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Jour", "Altitude", "CO2", "H2", "H2O", "Charbon", "O2"]);
    for checkpoint in checkpoints {
        let snapshot = &checkpoint.snapshot;
        table.add_row(vec![
            Cell::new(checkpoint.day).add_attribute(Attribute::Dim),
            right(snapshot.altitude),
            right(snapshot.reservoirs.co2),
            right(snapshot.reservoirs.h2),
            right(snapshot.reservoirs.water),
            right(snapshot.reservoirs.coal),
            right(snapshot.o2),
        ]);
    }
    table
}

pub fn build_checks_table(checks: &Checks) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Vérification", "Valeur", ""]);
    table.add_row(vec![Cell::new("Masse totale"), right(checks.mass), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Masse à vide").add_attribute(Attribute::Dim),
        right(checks.empty_mass),
        Cell::new(""),
    ]);
    table.add_row(vec![Cell::new("Fluides").add_attribute(Attribute::Dim), right(checks.fluids), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Charge alaire"),
        right(format!("{:.1} kg/m²", checks.wing_loading)),
        if checks.wing_loading_is_acceptable() {
            Cell::new("acceptable").fg(Color::Green)
        } else {
            Cell::new("trop élevée").fg(Color::Red)
        },
    ]);
    table.add_row(vec![
        Cell::new("Rendement de Carnot"),
        right(FormattedPercentage(checks.carnot)),
        Cell::new(format!("{} → {}", checks.cold, checks.hot)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![Cell::new("Travail de détente"), right(checks.cycle.expansion_work), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Travail de compression"),
        right(checks.cycle.compression_work),
        Cell::new(""),
    ]);
    table.add_row(vec![Cell::new("Travail net réel"), signed(checks.cycle.real_work), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Rendement réel du cycle"),
        right(FormattedPercentage(checks.cycle.real_efficiency)),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Étincelle H2 (1 g)"),
        right(checks.spark_temperature),
        Cell::new(format!("+{:.0} K", checks.spark_temperature_rise().0)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Portance en croisière"),
        right(format!("{:.0} N", checks.cruise_lift)),
        Cell::new(checks.cruise_speed.to_string()).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Traînée en croisière"),
        right(format!("{:.1} N", checks.cruise_drag)),
        Cell::new(format!("finesse {:.1}", checks.cruise_lift / checks.cruise_drag)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Puissance en vol horizontal"),
        right(checks.level_flight_power),
        Cell::new("3000 m").add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Puissance en piqué"),
        right(checks.dive_power),
        Cell::new("30°, 50 m/s").add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Liquéfaction du CO2"),
        right(format!("{:.0} bar", checks.co2_storage_pressure.to_bars())),
        if checks.co2_condenses {
            Cell::new("possible").fg(Color::Green)
        } else {
            Cell::new("impossible").fg(Color::Red)
        },
    ]);
    table.add_row(vec![
        Cell::new("Volume du réservoir de CO2").add_attribute(Attribute::Dim),
        right(format!("{:.1} L", checks.co2_tank_volume * 1000.0)),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Chaleur de condensation").add_attribute(Attribute::Dim),
        right(format!("{:.1} MJ", checks.co2_condensation_heat.0 / 1e6)),
        Cell::new(""),
    ]);
    table
}

pub fn build_closed_cycle_table(balance: &ClosedCycleBalance) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Grandeur", "Valeur"]);
    let rows: [(&str, String); 16] = [
        ("Constante du mélange", format!("{:.2} J/(kg·K)", balance.gas_constant)),
        ("Cylindrée totale", format!("{:.2} cm³", balance.displacement * 1e6)),
        ("Masse par cycle", format!("{:.3} g", balance.mass_per_cycle.0 * 1000.0)),
        ("Travail spécifique", format!("{:.1} kJ/kg", balance.specific_work / 1000.0)),
        ("Travail par cycle", format!("{:.1}", balance.work_per_cycle)),
        ("Puissance indiquée", balance.indicated_power.to_string()),
        ("Puissance effective", balance.effective_power.to_string()),
        ("Débit massique", format!("{:.2} kg/h", balance.mass_flow * 3600.0)),
        ("Circulation complète", format!("{:.1} min", balance.circulation_time.0 / 60.0)),
        ("Puissance gravitaire (piqué)", balance.gravity_power.to_string()),
        ("Puissance turbine (piqué)", balance.turbine_power.to_string()),
        ("Recharge journalière", format!("{:.2} MJ", balance.daily_recharge.0 / 1e6)),
        ("Travail de compression", format!("{:.1} kJ/kg", balance.compression_specific_work / 1000.0)),
        ("Masse comprimable par jour", balance.compressible_mass.to_string()),
        ("Énergie nocturne (détente)", format!("{:.2} MJ", balance.night_energy.0 / 1e6)),
        ("Rendement aller-retour", FormattedPercentage(balance.round_trip_efficiency).to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), right(value)]);
    }
    table
}

pub fn build_stress_table(outcome: &StressOutcome, every_n_hours: usize) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Heure", "Phase", "Action", "Altitude", "H2 brûlé", "Charbon brûlé", "Énergie"]);
    for record in outcome.hours.iter().skip(every_n_hours.max(1) - 1).step_by(every_n_hours.max(1)) {
        table.add_row(vec![
            Cell::new(record.hour).add_attribute(Attribute::Dim),
            Cell::new(record.phase),
            Cell::new(record.action).fg(record.action.color()),
            right(record.altitude_end),
            right(record.h2_burnt),
            right(record.coal_burnt).fg(if record.coal_burnt > Kilograms::ZERO {
                Color::Red
            } else {
                Color::Reset
            }),
            right(WattHours::from(record.engine_energy)),
        ]);
    }
    table
}

pub fn build_stress_resources_table(outcome: &StressOutcome) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Ressource", "Initial", "Final"]);
    let rows: [(&str, Kilograms, Kilograms); 4] = [
        ("Charbon", outcome.initial.coal, outcome.final_.coal),
        ("H2", outcome.initial.h2, outcome.final_.h2),
        ("H2O", outcome.initial.water, outcome.final_.water),
        ("CO2", outcome.initial.co2, outcome.final_.co2),
    ];
    for (label, initial, final_) in rows {
        table.add_row(vec![Cell::new(label), right(initial).add_attribute(Attribute::Dim), right(final_)]);
    }
    table
}

pub fn build_recovery_table(day: &RecoveryDay) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Heure", "Conditions", "Mode", "Régime", "H2", "CO2 liquide", "Énergie", "Altitude"]);
    for hour in &day.hours {
        table.add_row(vec![
            Cell::new(hour.scenario.hour).add_attribute(Attribute::Dim),
            Cell::new(hour.scenario.description),
            Cell::new(hour.turbine.mode).fg(hour.turbine.mode.color()),
            right(format!("{:.0} tr/min", hour.turbine.rpm)),
            signed(hour.h2),
            signed(hour.liquid_co2),
            signed(hour.net_energy()),
            right(hour.altitude_end),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        signed(day.h2_balance()),
        signed(day.liquid_co2_balance()),
        signed(day.net_energy()),
        right(day.final_altitude),
    ]);
    table
}

pub fn build_dive_recharge_table(recharge: &DiveRecharge, balance: &DiveRechargeBalance) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Grandeur", "Valeur", ""]);
    table.add_row(vec![
        Cell::new("Gravité"),
        right(balance.gravity_power),
        Cell::new(format!("{}, {}°", recharge.mass, recharge.angle_degrees)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Vent relatif"),
        right(balance.turbine_power),
        Cell::new(format!("{:.0} km/h", recharge.speed.to_kilometres_per_hour())).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Puissance de compression"),
        right(balance.compression_power),
        if balance.covers_compressor() {
            Cell::new(format!("+{} de marge", balance.surplus())).fg(Color::Green)
        } else {
            Cell::new(format!("{} de déficit", balance.surplus().abs())).fg(Color::Red)
        },
    ]);
    table.add_row(vec![
        Cell::new("Débit de liquéfaction"),
        right(format!("{:.1} g/s", balance.liquefaction_rate * 1000.0)),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("CO2 liquéfié"),
        right(balance.liquefied),
        Cell::new(format!("en {:.1} min", recharge.duration.0 / 60.0)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Altitude perdue"),
        right(balance.altitude_lost),
        Cell::new(format!("{} → {}", recharge.initial_altitude, balance.final_altitude)).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Rendement de conversion"),
        right(FormattedPercentage(balance.conversion_efficiency)),
        Cell::new(format!(
            "{:.2} MJ stockés sur {:.2} MJ",
            balance.stored_energy.0 / 1e6,
            balance.potential_energy.0 / 1e6,
        ))
        .add_attribute(Attribute::Dim),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Budget, Glider},
        narrator::Narrator,
        recovery::Recovery,
        rng,
    };

    #[test]
    fn tally_table_lists_every_term() {
        let budget = Budget::default();
        let (_, mut rng) = rng::seeded(Some(1));
        let narration = Narrator::builder().budget(&budget).rng(&mut rng).run().unwrap();
        let rendered = build_tally_table(&narration.tally).to_string();
        for label in ["piqué", "éolienne", "TENG", "solaire", "combustion", "traînée", "bilan net"] {
            assert!(rendered.contains(label), "missing {label}");
        }
    }

    #[test]
    fn empty_tally_has_no_nan_share() {
        let rendered = build_tally_table(&Tally::default()).to_string();
        assert!(!rendered.contains("NaN"));
        assert!(rendered.contains("0.0%"));
    }

    #[test]
    fn daily_table_has_one_row_per_day() {
        let mut budget = Budget::default();
        budget.horizon.days = 3;
        let (_, mut rng) = rng::seeded(Some(1));
        let narration = Narrator::builder().budget(&budget).rng(&mut rng).run().unwrap();
        assert_eq!(build_daily_table(&narration.records, 1).row_count(), 3);
    }

    #[test]
    fn recovery_table_has_a_total_row() {
        let glider = Glider::default();
        let day = Recovery::builder().glider(&glider).run();
        let table = build_recovery_table(&day);
        assert_eq!(table.row_count(), day.hours.len() + 1);
        let rendered = table.to_string();
        assert!(rendered.contains("Régénération"));
        assert!(rendered.contains("Propulsion"));
    }

    #[test]
    fn dive_recharge_table_shows_the_surplus() {
        let recharge = DiveRecharge::for_glider(&Glider::default());
        let rendered = build_dive_recharge_table(&recharge, &recharge.compute()).to_string();
        assert!(rendered.contains("de marge"));
        assert!(rendered.contains("409.6 g/s"));
    }

    #[test]
    fn checks_table_flags_wing_loading() {
        let rendered = build_checks_table(&Checks::compute(&Glider::default())).to_string();
        assert!(rendered.contains("acceptable"));
    }
}
