use std::io::Write;

use crate::io::format::{format_g, format_repr};
use crate::model::agents::Census;
use crate::model::histogram::AgeHistogram;
use crate::model::mortality::MortalityEstimate;

/// Name of the generated C array.
pub const AGE_GROUP_ARRAY: &str = "people_per_age_group";

/// Write the grouped histogram as `//` diagnostic lines followed by a C
/// array literal of per-group proportions, ready to paste into a model.
pub fn write_age_group_table<W: Write>(out: &mut W, hist: &AgeHistogram) -> anyhow::Result<()> {
    let rows = hist.proportions()?;

    writeln!(out, "// Total people: {}", hist.total())?;
    for row in &rows {
        writeln!(
            out,
            "// age from {} proportion {} cumulative {}",
            row.lower_age,
            format_repr(row.proportion),
            format_repr(row.cumulative)
        )?;
    }

    writeln!(out, "static double {}[{}] = {{", AGE_GROUP_ARRAY, rows.len())?;
    let body = rows
        .iter()
        .map(|r| format!("    {}", format_g(r.proportion)))
        .collect::<Vec<_>>()
        .join(",\n");
    writeln!(out, "{}", body)?;
    writeln!(out, "}};")?;
    Ok(())
}

/// Write raw per-year counts as an `Age,Number` CSV, one row per slot.
pub fn write_age_year_csv<W: Write>(out: W, hist: &AgeHistogram) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["Age", "Number"])?;
    for (i, count) in hist.counts().iter().enumerate() {
        let age = i as u64 * hist.width() as u64;
        wtr.write_record([age.to_string(), count.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_mortality_report<W: Write>(out: &mut W, est: &MortalityEstimate) -> anyhow::Result<()> {
    writeln!(
        out,
        "{} deaths in uk if all infected; {} per week; {} per day",
        round_half_even(est.uk.deaths_if_all_infected),
        round_half_even(est.uk.deaths_per_week),
        round_half_even(est.uk.deaths_per_day)
    )?;
    writeln!(
        out,
        "{} deaths in cambridge if all infected; {} per week; {} per day",
        round_half_even(est.cambridge.deaths_if_all_infected),
        round_half_even(est.cambridge.deaths_per_week),
        round_half_even(est.cambridge.deaths_per_day)
    )?;
    writeln!(out, "{} days to cremate", round_half_even(est.days_to_cremate))?;
    Ok(())
}

pub const CENSUS_HEADER: &str =
    "cycle,susceptible,incubating,carrying,ill,recovered,vaccinated,died,expected_daily_infections";

pub fn write_census_header<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "{}", CENSUS_HEADER)?;
    Ok(())
}

pub fn write_census_row<W: Write>(out: &mut W, cycle: u32, c: &Census) -> anyhow::Result<()> {
    writeln!(
        out,
        "{},{},{},{},{},{},{},{},{:.6}",
        cycle,
        c.susceptible,
        c.incubating,
        c.carrying,
        c.ill,
        c.recovered,
        c.vaccinated,
        c.died,
        c.expected_daily_infections
    )?;
    Ok(())
}

fn round_half_even(x: f64) -> i64 {
    x.round_ties_even() as i64
}
