use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_xorshift::XorShiftRng;
use uuid::Uuid;

use geom::{LonLat, LongitudeModel};
use pplutil::Timer;

use crate::{NamePool, Options, ReferenceData};

/// One made-up person. Created, emitted, and forgotten.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticPerson {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub pos: LonLat,
}

/// Where people from one country get placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CountryShape {
    pub center: LonLat,
    /// None means everybody lands exactly on the center.
    pub area_km2: Option<f64>,
}

impl CountryShape {
    /// Returns None if the country has no known location. If the country's area can't be turned
    /// into a perturbation, warns once and falls back to the center for everybody in it.
    pub fn new(
        data: &ReferenceData,
        country: &str,
        model: LongitudeModel,
        timer: &mut Timer,
    ) -> Option<CountryShape> {
        let center = *data.locations.get(country)?;
        let mut area_km2 = data.areas.get(country).copied();
        if let Some(area) = area_km2 {
            if let Err(err) = geom::half_widths(center, area, model) {
                timer.warn(format!(
                    "{} has an unusable area ({}), so everybody there will be placed at {}",
                    country, err, center
                ));
                area_km2 = None;
            }
        }
        Some(CountryShape { center, area_km2 })
    }
}

/// Makes one person living somewhere in `shape`, born a whole number of 365-day "years" before
/// `today`. Fails if `opts` has unusable ages.
pub fn make_person(
    shape: &CountryShape,
    names: &NamePool,
    opts: &Options,
    today: NaiveDate,
    rng: &mut XorShiftRng,
) -> Result<SyntheticPerson> {
    opts.check()?;
    let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
    let name = names.random_name(rng);

    // Not calendar-aware; leap days are ignored.
    let years: i64 = rng.gen_range(-opts.max_age_years..=-opts.min_age_years);
    let birth_date = years
        .checked_mul(365)
        .and_then(Duration::try_days)
        .and_then(|offset| today.checked_add_signed(offset))
        .ok_or_else(|| anyhow!("{} years before {} isn't a valid date", -years, today))?;

    let pos = geom::scatter(shape.center, shape.area_km2, opts.longitude_model, rng)?;

    Ok(SyntheticPerson {
        id,
        name,
        birth_date,
        pos,
    })
}

impl NamePool {
    /// "First Last", drawn uniformly and independently with replacement.
    pub fn random_name(&self, rng: &mut XorShiftRng) -> String {
        // NamePool::new guarantees neither list is empty
        let first = self.first.choose(rng).map(|x| x.as_str()).unwrap_or("");
        let last = self.last.choose(rng).map(|x| x.as_str()).unwrap_or("");
        format!("{} {}", first, last)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use rand::SeedableRng;

    use super::*;

    fn names() -> NamePool {
        NamePool::new(
            vec!["Jean-Luc".to_string(), "Beverly".to_string()],
            vec!["Picard".to_string(), "Crusher".to_string(), "Troi".to_string()],
        )
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()
    }

    fn shape() -> CountryShape {
        CountryShape {
            center: LonLat::from_lat_lon(10.0, 20.0),
            area_km2: None,
        }
    }

    #[test]
    fn birth_dates_in_range() {
        let opts = Options::default();
        let mut rng = XorShiftRng::seed_from_u64(42);
        let oldest = today() - Duration::days(100 * 365);
        let youngest = today() - Duration::days(18 * 365);
        let mut seen = BTreeSet::new();
        for _ in 0..5000 {
            let person = make_person(&shape(), &names(), &opts, today(), &mut rng).unwrap();
            assert!(person.birth_date >= oldest);
            assert!(person.birth_date <= youngest);
            seen.insert(person.birth_date);
        }
        // Whole-year granularity means at most 83 distinct dates, and with this many draws, all
        // of them, including both ends.
        assert_eq!(seen.len(), 83);
        assert!(seen.contains(&oldest));
        assert!(seen.contains(&youngest));
    }

    #[test]
    fn names_come_from_the_pool() {
        let pool = names();
        let mut rng = XorShiftRng::seed_from_u64(42);
        let mut seen = BTreeSet::new();
        for _ in 0..1000 {
            let name = pool.random_name(&mut rng);
            let parts: Vec<&str> = name.split(' ').collect();
            assert_eq!(parts.len(), 2);
            assert!(["Jean-Luc", "Beverly"].contains(&parts[0]));
            assert!(["Picard", "Crusher", "Troi"].contains(&parts[1]));
            seen.insert(name);
        }
        // Every entry is reachable, including the last one in each list.
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn ids_are_v4_and_unique() {
        let opts = Options::default();
        let mut rng = XorShiftRng::seed_from_u64(42);
        let mut ids = BTreeSet::new();
        for _ in 0..10_000 {
            let person = make_person(&shape(), &names(), &opts, today(), &mut rng).unwrap();
            assert_eq!(person.id.get_version_num(), 4);
            assert_eq!(person.id.get_variant(), uuid::Variant::RFC4122);
            assert!(ids.insert(person.id));
        }
    }

    #[test]
    fn same_seed_same_person() {
        let opts = Options::default();
        let shape = CountryShape {
            center: LonLat::from_lat_lon(10.0, 20.0),
            area_km2: Some(40_000.0),
        };
        let a = make_person(
            &shape,
            &names(),
            &opts,
            today(),
            &mut XorShiftRng::seed_from_u64(7),
        )
        .unwrap();
        let b = make_person(
            &shape,
            &names(),
            &opts,
            today(),
            &mut XorShiftRng::seed_from_u64(7),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bad_ages_are_errors() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        for (min, max) in [(50, 20), (18, i64::MAX / 2)] {
            let opts = Options {
                min_age_years: min,
                max_age_years: max,
                ..Options::default()
            };
            assert!(make_person(&shape(), &names(), &opts, today(), &mut rng).is_err());
        }
    }

    #[test]
    fn unusable_area_falls_back_to_center() {
        let center = LonLat::from_lat_lon(0.0, 0.0);
        let mut data = ReferenceData {
            internet_users: BTreeMap::new(),
            areas: BTreeMap::new(),
            locations: BTreeMap::new(),
            names: names(),
        };
        data.locations.insert("Andoria".to_string(), center);
        data.areas.insert("Andoria".to_string(), 1e12);
        data.locations.insert("Betazed".to_string(), center);
        data.areas.insert("Betazed".to_string(), 100.0);

        let mut timer = Timer::throwaway();
        let andoria =
            CountryShape::new(&data, "Andoria", LongitudeModel::Legacy, &mut timer).unwrap();
        assert_eq!(andoria.area_km2, None);
        assert_eq!(timer.warnings().len(), 1);

        let betazed =
            CountryShape::new(&data, "Betazed", LongitudeModel::Legacy, &mut timer).unwrap();
        assert_eq!(betazed.area_km2, Some(100.0));
        assert_eq!(timer.warnings().len(), 1);

        assert!(CountryShape::new(&data, "Vulcan", LongitudeModel::Legacy, &mut timer).is_none());
    }
}
