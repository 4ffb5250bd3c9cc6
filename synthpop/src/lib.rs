//! Synthesizes a population of plausible-looking people spread across the world. Each country
//! gets a share of the population proportional to its number of internet users, and everybody
//! lives somewhere near their country's center, within a square the size of the country.
//!
//! The reference tables are loaded elsewhere (see the `importer` crate); this crate only needs
//! them in memory. People are streamed to a `PersonSink` one at a time, so memory use doesn't
//! grow with the size of the population.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand_xorshift::XorShiftRng;

use geom::{LonLat, LongitudeModel};
use pplutil::{prettyprint_usize, Timer};

pub use self::allocate::allocate;
pub use self::output::{CsvSink, PersonSink};
pub use self::person::{make_person, CountryShape, SyntheticPerson};

mod allocate;
mod output;
mod person;

/// Everything known about the world, keyed by country name. Iterating over these maps visits
/// countries in order of their names, which fixes the order people are generated in.
pub struct ReferenceData {
    /// The source of truth for how many people each country gets.
    pub internet_users: BTreeMap<String, u64>,
    /// Square kilometers. Not every country has one.
    pub areas: BTreeMap<String, f64>,
    /// A representative center. Countries missing here don't get anybody.
    pub locations: BTreeMap<String, LonLat>,
    pub names: NamePool,
}

/// First and last names to combine. Neither list is ever empty.
pub struct NamePool {
    first: Vec<String>,
    last: Vec<String>,
}

impl NamePool {
    pub fn new(first: Vec<String>, last: Vec<String>) -> Result<NamePool> {
        if first.is_empty() || last.is_empty() {
            bail!(
                "need at least one first and last name, but have {} first and {} last",
                first.len(),
                last.len()
            );
        }
        Ok(NamePool { first, last })
    }

    pub fn num_first(&self) -> usize {
        self.first.len()
    }

    pub fn num_last(&self) -> usize {
        self.last.len()
    }
}

pub struct Options {
    /// How many people to aim for. Countries without a location and rounding make the real
    /// number a bit smaller.
    pub num_people: usize,
    /// Ages are whole 365-day years in [min_age_years, max_age_years]
    pub min_age_years: i64,
    pub max_age_years: i64,
    pub longitude_model: LongitudeModel,
}

/// Nobody gets generated older than this. Larger ages would push birth dates out of range.
pub const MAX_AGE_YEARS: i64 = 1000;

impl Options {
    /// Ages must satisfy `0 <= min_age_years <= max_age_years <= MAX_AGE_YEARS`.
    pub fn check(&self) -> Result<()> {
        if self.min_age_years < 0
            || self.min_age_years > self.max_age_years
            || self.max_age_years > MAX_AGE_YEARS
        {
            bail!(
                "ages must satisfy 0 <= min <= max <= {}, not {} and {}",
                MAX_AGE_YEARS,
                self.min_age_years,
                self.max_age_years
            );
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Options {
        Options {
            num_people: 10_000_000,
            min_age_years: 18,
            max_age_years: 100,
            longitude_model: LongitudeModel::Legacy,
        }
    }
}

/// How many people each country gets. Building one checks everything that could make a run
/// fail before any output, so callers can hold off creating their sink until this succeeds.
pub struct Plan {
    quotas: BTreeMap<String, usize>,
    total: usize,
}

impl Plan {
    pub fn new(data: &ReferenceData, opts: &Options, timer: &mut Timer) -> Result<Plan> {
        opts.check()?;

        timer.start("allocate people to countries");
        let quotas = allocate(&data.internet_users, &data.locations, opts.num_people)?;
        let total: usize = quotas.values().sum();
        info!(
            "{} countries will have {} people in total ({} were requested). {} countries have no \
             location.",
            prettyprint_usize(quotas.len()),
            prettyprint_usize(total),
            prettyprint_usize(opts.num_people),
            prettyprint_usize(data.internet_users.len() - quotas.len())
        );
        timer.stop("allocate people to countries");

        Ok(Plan { quotas, total })
    }

    pub fn quotas(&self) -> &BTreeMap<String, usize> {
        &self.quotas
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Generates everybody in the plan, handing each person to `sink` as soon as they're made.
    /// Countries are visited in name order, and each country's people are emitted together.
    /// Returns the number of people generated.
    ///
    /// Any error aborts the run; people already emitted stay emitted.
    pub fn emit(
        self,
        data: &ReferenceData,
        opts: &Options,
        today: NaiveDate,
        rng: &mut XorShiftRng,
        sink: &mut dyn PersonSink,
        timer: &mut Timer,
    ) -> Result<usize> {
        timer.start("generate people");
        for (country, quota) in self.quotas {
            let shape = CountryShape::new(data, &country, opts.longitude_model, timer)
                .ok_or_else(|| anyhow!("{} has a quota, but no location", country))?;
            timer.start_iter(&format!("people in {}", country), quota);
            for _ in 0..quota {
                timer.next();
                let person = make_person(&shape, &data.names, opts, today, rng)
                    .with_context(|| format!("making somebody in {}", country))?;
                sink.emit(person)?;
            }
        }
        sink.finish()?;
        timer.stop("generate people");

        Ok(self.total)
    }
}

/// Plans and generates the whole population in one go. See `Plan::emit`.
pub fn generate(
    data: &ReferenceData,
    opts: &Options,
    today: NaiveDate,
    rng: &mut XorShiftRng,
    sink: &mut dyn PersonSink,
    timer: &mut Timer,
) -> Result<usize> {
    Plan::new(data, opts, timer)?.emit(data, opts, today, rng, sink, timer)
}
