use std::collections::BTreeMap;

use anyhow::Result;

use geom::LonLat;

/// Splits `num_people` among countries in proportion to their share of all internet users.
///
/// Every country contributes to the total, but only countries with a known location get a quota.
/// The share of countries without a location is dropped, not redistributed, so the quotas
/// usually sum to less than `num_people`. Each quota is rounded down, which loses at most one
/// person per country.
///
/// Fails if there are no internet users at all.
pub fn allocate(
    internet_users: &BTreeMap<String, u64>,
    locations: &BTreeMap<String, LonLat>,
    num_people: usize,
) -> Result<BTreeMap<String, usize>> {
    let total: u128 = internet_users.values().map(|x| *x as u128).sum();
    if total == 0 {
        bail!(
            "the {} countries with internet user counts have 0 users in total; can't weight \
             anybody",
            internet_users.len()
        );
    }

    let mut quotas = BTreeMap::new();
    for (country, users) in internet_users {
        if !locations.contains_key(country) {
            debug!("Skipping {}, because its location is unknown", country);
            continue;
        }
        // Exact integer floor of (users / total) * num_people. users <= total, so the result
        // always fits back into a usize.
        let quota = (*users as u128) * (num_people as u128) / total;
        quotas.insert(country.clone(), quota as usize);
    }
    Ok(quotas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(input: Vec<(&str, u64)>) -> BTreeMap<String, u64> {
        input
            .into_iter()
            .map(|(name, n)| (name.to_string(), n))
            .collect()
    }

    fn locations(names: Vec<&str>) -> BTreeMap<String, LonLat> {
        names
            .into_iter()
            .map(|name| (name.to_string(), LonLat::new(0.0, 0.0)))
            .collect()
    }

    #[test]
    fn proportional() {
        let quotas = allocate(
            &users(vec![("Andoria", 900), ("Betazed", 100)]),
            &locations(vec!["Andoria", "Betazed"]),
            100,
        )
        .unwrap();
        assert_eq!(quotas["Andoria"], 90);
        assert_eq!(quotas["Betazed"], 10);
    }

    #[test]
    fn missing_location_still_counts_towards_total() {
        let quotas = allocate(
            &users(vec![("Andoria", 900), ("Betazed", 100), ("Cardassia", 500)]),
            &locations(vec!["Andoria", "Betazed"]),
            100,
        )
        .unwrap();
        assert_eq!(quotas.len(), 2);
        assert_eq!(quotas["Andoria"], 60);
        assert_eq!(quotas["Betazed"], 6);
        assert!(!quotas.contains_key("Cardassia"));
    }

    #[test]
    fn location_without_users_gets_nobody() {
        let quotas = allocate(
            &users(vec![("Andoria", 900)]),
            &locations(vec!["Andoria", "Vulcan"]),
            100,
        )
        .unwrap();
        assert_eq!(quotas.len(), 1);
        assert_eq!(quotas["Andoria"], 100);
    }

    #[test]
    fn truncation_deficit_is_bounded() {
        let input = users(vec![
            ("Andoria", 333),
            ("Betazed", 333),
            ("Cardassia", 334),
            ("Denobula", 7),
            ("Ferenginar", 12_345),
        ]);
        let locs = locations(vec!["Andoria", "Betazed", "Cardassia", "Denobula", "Ferenginar"]);
        for num_people in [1, 7, 100, 999, 10_000_000] {
            let quotas = allocate(&input, &locs, num_people).unwrap();
            let sum: usize = quotas.values().sum();
            assert!(sum <= num_people);
            assert!(num_people - sum <= quotas.len());
        }
    }

    #[test]
    fn zero_people_requested() {
        let quotas = allocate(
            &users(vec![("Andoria", 900)]),
            &locations(vec!["Andoria"]),
            0,
        )
        .unwrap();
        assert_eq!(quotas["Andoria"], 0);
    }

    #[test]
    fn no_users_is_an_error() {
        let locs = locations(vec!["Andoria"]);
        assert!(allocate(&users(vec![("Andoria", 0)]), &locs, 100).is_err());
        assert!(allocate(&BTreeMap::new(), &locs, 100).is_err());
    }

    #[test]
    fn huge_counts_dont_overflow() {
        let quotas = allocate(
            &users(vec![("Andoria", u64::MAX), ("Betazed", u64::MAX)]),
            &locations(vec!["Andoria", "Betazed"]),
            10_000_000,
        )
        .unwrap();
        assert_eq!(quotas["Andoria"], 5_000_000);
        assert_eq!(quotas["Betazed"], 5_000_000);
    }
}
