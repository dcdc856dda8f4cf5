use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Inputs to the back-of-envelope mortality and crematorium estimate.
///
/// Defaults are the UK figures from early 2021: ONS life tables and
/// mid-2019 population, reported deaths and cases to date, and the
/// Cambridge City Crematorium's capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MortalityInputs {
    pub life_expectancy_male_years: f64,
    pub life_expectancy_female_years: f64,

    pub deaths: f64,
    pub total_cases: f64,

    pub population_uk: f64,
    pub population_cambridge: f64,

    // Spread: at R0 = 3 about four generations expose everyone.
    pub cycles_to_spread: f64,
    pub cycle_duration_days: f64,
    pub weeks_to_die: f64,

    pub cremation_chambers: f64,
    pub hours_to_cremate: f64,
    pub proportion_cremated: f64,
}

impl Default for MortalityInputs {
    fn default() -> Self {
        Self {
            life_expectancy_male_years: 79.4,
            life_expectancy_female_years: 83.1,
            deaths: 94_580.0,
            total_cases: 3_543_646.0,
            population_uk: 66_796_807.0,
            population_cambridge: 124_798.0,
            cycles_to_spread: 4.0,
            cycle_duration_days: 6.0,
            weeks_to_die: 8.5,
            cremation_chambers: 3.0,
            hours_to_cremate: 4.0,
            proportion_cremated: 0.75,
        }
    }
}

/// Deaths expected in one population if everyone were infected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionDeaths {
    pub deaths_if_all_infected: f64,
    pub deaths_per_week: f64,
    pub deaths_per_day: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MortalityEstimate {
    pub life_expectancy_weeks: f64,
    pub weekly_death_rate_from_normal_causes: f64,
    pub infection_death_rate: f64,
    pub weeks_for_epidemic: f64,
    pub uk: RegionDeaths,
    pub cambridge: RegionDeaths,
    pub cremations_per_day: f64,
    pub cremations_in_cambridge: f64,
    pub days_to_cremate: f64,
}

impl MortalityInputs {
    pub fn check(&self) -> Result<()> {
        let divisors = [
            ("life expectancy", self.life_expectancy_male_years + self.life_expectancy_female_years),
            ("total_cases", self.total_cases),
            ("cycles_to_spread", self.cycles_to_spread),
            ("cycle_duration_days", self.cycle_duration_days),
            ("cremation_chambers", self.cremation_chambers),
            ("hours_to_cremate", self.hours_to_cremate),
        ];
        for (name, v) in divisors {
            if !(v > 0.0) {
                return Err(Error::InvalidConfig(format!("{} must be > 0 (got {})", name, v)));
            }
        }
        if self.weeks_to_die < 0.0 {
            return Err(Error::InvalidConfig("weeks_to_die must be >= 0".into()));
        }
        Ok(())
    }

    pub fn estimate(&self) -> Result<MortalityEstimate> {
        self.check()?;

        let life_expectancy_years = (self.life_expectancy_male_years + self.life_expectancy_female_years) / 2.0;
        let life_expectancy_weeks = life_expectancy_years * 52.0;

        let infection_death_rate = self.deaths / self.total_cases;

        let cycles_per_week = 7.0 / self.cycle_duration_days;
        let weeks_to_spread = self.cycles_to_spread / cycles_per_week;
        let weeks_for_epidemic = weeks_to_spread + self.weeks_to_die;

        let region = |population: f64| {
            let deaths_if_all_infected = population * infection_death_rate;
            let deaths_per_week = deaths_if_all_infected / weeks_for_epidemic;
            RegionDeaths { deaths_if_all_infected, deaths_per_week, deaths_per_day: deaths_per_week / 7.0 }
        };
        let uk = region(self.population_uk);
        let cambridge = region(self.population_cambridge);

        let cremations_per_day = self.cremation_chambers * (24.0 / self.hours_to_cremate);
        let cremations_in_cambridge = cambridge.deaths_if_all_infected * self.proportion_cremated;

        Ok(MortalityEstimate {
            life_expectancy_weeks,
            weekly_death_rate_from_normal_causes: 1.0 / life_expectancy_weeks,
            infection_death_rate,
            weeks_for_epidemic,
            uk,
            cambridge,
            cremations_per_day,
            cremations_in_cambridge,
            days_to_cremate: cremations_in_cambridge / cremations_per_day,
        })
    }
}
