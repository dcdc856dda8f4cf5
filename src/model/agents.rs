//! Agent-based population on a wrapped grid.
//!
//! Each person carries a health state, the number of days spent in it, a
//! spreader grade that scales their personal reproduction rate, and an
//! age group drawn from the national age distribution. Only the clock
//! advances between cycles; transmission, illness and recovery
//! transitions are not modelled yet.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Relative infectiousness of each spreader grade.
pub const SPREADER_RATES: [f64; 4] = [0.5, 1.0, 1.25, 12.5];
/// Share of the population in each spreader grade.
pub const SPREADER_RATE_PROPORTIONS: [f64; 4] = [0.25, 0.5, 0.2, 0.05];

/// UK proportions in six-year age groups, as produced by `age-groups`.
pub const PEOPLE_PER_AGE_GROUP: [f64; 16] = [
    0.0752058, 0.0796961, 0.0754907, 0.071097, 0.085826, 0.0956717, 0.0869349, 0.077162,
    0.0813619, 0.0645441, 0.057532, 0.0524967, 0.0458074, 0.028929, 0.0222447, 0.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthState {
    Susceptible,
    Incubating,
    Carrying,
    Ill,
    Recovered,
    Vaccinated,
    Died,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Person {
    pub days_in_state: u16,
    pub state: HealthState,
    pub spreader_grade: u8,
    pub age_group: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub population_size: u32,
    pub cycles: u32,
    pub starting_cases: u32,
    pub infectious_days: u32,
    pub neighbourhood: u32,
    pub reproduction_rate: f64,
    pub seed: u64,
    /// Proportion of people per age group; need not be normalised.
    pub age_group_proportions: Vec<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population_size: 1024 * 1024,
            cycles: 365,
            starting_cases: 1,
            infectious_days: 10,
            neighbourhood: 150,
            reproduction_rate: 3.0,
            seed: 0,
            age_group_proportions: PEOPLE_PER_AGE_GROUP.to_vec(),
        }
    }
}

impl SimConfig {
    pub fn check(&self) -> Result<()> {
        let fail = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));
        if self.population_size == 0 {
            return fail("population_size must be >= 1");
        }
        if self.infectious_days == 0 {
            return fail("infectious_days must be >= 1");
        }
        if self.starting_cases > self.population_size {
            return fail("starting_cases exceeds population_size");
        }
        if !(self.reproduction_rate >= 0.0) {
            return fail("reproduction_rate must be >= 0");
        }
        if self.age_group_proportions.is_empty() || self.age_group_proportions.len() > u8::MAX as usize + 1 {
            return fail("age_group_proportions must have 1..=256 entries");
        }
        if self.age_group_proportions.iter().any(|p| !(*p >= 0.0)) {
            return fail("age_group_proportions must be non-negative");
        }
        Ok(())
    }

    pub fn daily_reproduction_rate(&self) -> f64 {
        self.reproduction_rate / self.infectious_days as f64
    }
}

/// Running sums of `proportions`, used to map a uniform draw to a category.
pub fn cumulative(proportions: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    proportions
        .iter()
        .map(|p| {
            acc += p;
            acc
        })
        .collect()
}

/// First category whose cumulative share exceeds `f`; the last one if
/// rounding leaves `f` past the end.
pub fn pick_category(cumulative: &[f64], f: f64) -> usize {
    cumulative
        .iter()
        .position(|&c| c > f)
        .unwrap_or(cumulative.len().saturating_sub(1))
}

/// Squarish grid: `width = floor(sqrt(n))`, `height = n / width`.
pub fn grid_dimensions(population_size: u32) -> (u32, u32) {
    let width = ((population_size as f64).sqrt().floor() as u32).max(1);
    (width, population_size / width)
}

/// Head count per state after a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Census {
    pub susceptible: u32,
    pub incubating: u32,
    pub carrying: u32,
    pub ill: u32,
    pub recovered: u32,
    pub vaccinated: u32,
    pub died: u32,
    /// Sum of the personal daily reproduction rates of infectious people.
    pub expected_daily_infections: f64,
}

impl Census {
    pub fn total(&self) -> u32 {
        self.susceptible + self.incubating + self.carrying + self.ill + self.recovered + self.vaccinated + self.died
    }
}

pub struct Population {
    people: Vec<Person>,
    grid_width: u32,
    infectious_days: u32,
    daily_reproduction_rate: f64,
    rng: ChaCha8Rng,
}

impl Population {
    /// Lay out the grid, draw spreader grade and age group for everyone,
    /// then seed the starting cases.
    pub fn new(cfg: &SimConfig) -> Result<Self> {
        cfg.check()?;

        let (grid_width, grid_height) = grid_dimensions(cfg.population_size);
        let size = (grid_width * grid_height) as usize;
        info!(grid_width, grid_height, size, "population grid");

        let spreader_cumulative = cumulative(&SPREADER_RATE_PROPORTIONS);
        let total_age: f64 = cfg.age_group_proportions.iter().sum();
        if !(total_age > 0.0) {
            return Err(Error::ZeroPopulation);
        }
        let age_cumulative: Vec<f64> =
            cumulative(&cfg.age_group_proportions).into_iter().map(|c| c / total_age).collect();

        let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
        let mut people = Vec::with_capacity(size);
        for _ in 0..size {
            let spreader_grade = pick_category(&spreader_cumulative, rng.gen::<f64>()) as u8;
            let age_group = pick_category(&age_cumulative, rng.gen::<f64>()) as u8;
            people.push(Person { days_in_state: 0, state: HealthState::Susceptible, spreader_grade, age_group });
        }

        let mut pop = Self {
            people,
            grid_width,
            infectious_days: cfg.infectious_days,
            daily_reproduction_rate: cfg.daily_reproduction_rate(),
            rng,
        };
        pop.seed_cases(cfg.starting_cases.min(size as u32));
        Ok(pop)
    }

    // Draws with replacement, so a person can be picked twice.
    fn seed_cases(&mut self, n: u32) {
        let days = self.infectious_days.min(u16::MAX as u32) as u16;
        for _ in 0..n {
            let idx = self.rng.gen_range(0..self.people.len());
            let person = &mut self.people[idx];
            person.state = HealthState::Carrying;
            person.days_in_state = days;
            debug!(idx, "seeded case");
        }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn grid_width(&self) -> u32 {
        self.grid_width
    }

    /// Index of the cell `(dx, dy)` away from `base`, wrapping around the
    /// end of the population.
    pub fn neighbour(&self, base: usize, dx: i64, dy: i64) -> usize {
        let n = self.people.len() as i64;
        (base as i64 + dx + dy * self.grid_width as i64).rem_euclid(n) as usize
    }

    pub fn personal_reproduction_rate(&self, person: &Person) -> f64 {
        self.daily_reproduction_rate * SPREADER_RATES[person.spreader_grade as usize]
    }

    /// Advance everyone by one day.
    pub fn step(&mut self) {
        for person in &mut self.people {
            match person.state {
                HealthState::Susceptible | HealthState::Died => {}
                HealthState::Recovered
                | HealthState::Vaccinated
                | HealthState::Incubating
                | HealthState::Carrying
                | HealthState::Ill => {
                    person.days_in_state = person.days_in_state.saturating_add(1);
                }
            }
        }
    }

    pub fn census(&self) -> Census {
        let mut c = Census::default();
        for person in &self.people {
            match person.state {
                HealthState::Susceptible => c.susceptible += 1,
                HealthState::Incubating => c.incubating += 1,
                HealthState::Carrying => c.carrying += 1,
                HealthState::Ill => c.ill += 1,
                HealthState::Recovered => c.recovered += 1,
                HealthState::Vaccinated => c.vaccinated += 1,
                HealthState::Died => c.died += 1,
            }
            if matches!(person.state, HealthState::Carrying | HealthState::Ill) {
                c.expected_daily_infections += self.personal_reproduction_rate(person);
            }
        }
        c
    }

    /// Run `cycles + 1` days, counting down to zero, and hand the census
    /// after each to `observe` along with the remaining cycle count.
    pub fn run<F>(&mut self, cycles: u32, mut observe: F) -> anyhow::Result<Census>
    where
        F: FnMut(u32, &Census) -> anyhow::Result<()>,
    {
        let mut last = self.census();
        for remaining in (0..=cycles).rev() {
            self.step();
            last = self.census();
            observe(remaining, &last)?;
        }
        Ok(last)
    }
}
