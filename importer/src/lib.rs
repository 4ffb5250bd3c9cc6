//! Loads the reference tables that drive population synthesis: internet users, area, and location
//! by country, plus popular first and last names. Each table comes from a `Source`, downloaded and
//! cached if needed, and is parsed from its original format.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use anyhow::{Context, Result};

use pplutil::{prettyprint_usize, Timer};
use synthpop::{NamePool, ReferenceData};

pub use self::configuration::{
    default_configuration, load_configuration, parse_configuration, ImporterConfiguration, Source,
    DEFAULT_CONFIG_PATH,
};
pub use self::fetch::{CachingFetcher, Dataset, Fetcher};
pub use self::parse::{parse_areas, parse_internet_users, parse_locations, parse_names};

mod configuration;
mod fetch;
mod parse;

/// Fetches and parses every reference table. Any failure is fatal.
pub fn load_reference_data(fetcher: &mut dyn Fetcher, timer: &mut Timer) -> Result<ReferenceData> {
    timer.start("load reference data");

    let internet_users = load(fetcher, Dataset::InternetUsers, timer, parse_internet_users)?;
    let areas = load(fetcher, Dataset::Areas, timer, parse_areas)?;
    let locations = load(fetcher, Dataset::Locations, timer, parse_locations)?;
    let first_names = load(fetcher, Dataset::FirstNames, timer, |r| {
        parse_names(r, "firstname")
    })?;
    let last_names = load(fetcher, Dataset::LastNames, timer, |r| {
        parse_names(r, "lastname")
    })?;

    info!(
        "{} countries have internet user counts, {} have an area, {} have a location",
        prettyprint_usize(internet_users.len()),
        prettyprint_usize(areas.len()),
        prettyprint_usize(locations.len())
    );
    info!(
        "{} first names, {} last names",
        prettyprint_usize(first_names.len()),
        prettyprint_usize(last_names.len())
    );
    let names = NamePool::new(first_names, last_names)?;

    timer.stop("load reference data");
    Ok(ReferenceData {
        internet_users,
        areas,
        locations,
        names,
    })
}

fn load<T, F: FnOnce(Box<dyn std::io::Read>) -> Result<T>>(
    fetcher: &mut dyn Fetcher,
    dataset: Dataset,
    timer: &mut Timer,
    parse: F,
) -> Result<T> {
    let name = format!("load {}", dataset.describe());
    timer.start(&name);
    let result = fetcher
        .open(dataset)
        .and_then(parse)
        .with_context(|| format!("loading {}", dataset.describe()))?;
    timer.stop(&name);
    Ok(result)
}
