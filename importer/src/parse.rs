//! Parsers for the raw reference files. The sources aren't consistently UTF-8, so fields are
//! decoded lossily.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Read;

use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder, Trim};

use geom::LonLat;

// Field numbers in the semicolon-separated country file
const COUNTRY_NAME_FIELD: usize = 21;
const COUNTRY_LATITUDE_FIELD: usize = 61;
const COUNTRY_LONGITUDE_FIELD: usize = 62;

/// Calls `cb` with every row of a delimited file, adding the row number to any error.
fn for_each_row<R: Read, F: FnMut(&ByteRecord) -> Result<()>>(
    reader: R,
    delimiter: u8,
    mut cb: F,
) -> Result<()> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::Fields)
        .from_reader(reader);
    let mut rec = ByteRecord::new();
    let mut row = 0;
    while rdr.read_byte_record(&mut rec)? {
        row += 1;
        cb(&rec).with_context(|| format!("row {}: {:?}", row, rec))?;
    }
    Ok(())
}

fn field(rec: &ByteRecord, idx: usize) -> Result<Cow<str>> {
    let bytes = rec
        .get(idx)
        .ok_or_else(|| anyhow!("only {} fields, need field {}", rec.len(), idx))?;
    Ok(String::from_utf8_lossy(bytes))
}

/// Numbers may have thousands separators, like "245,000,000".
fn parse_number(x: &str) -> Result<u64> {
    x.replace(',', "")
        .parse::<u64>()
        .with_context(|| format!("{} isn't a whole number", x))
}

/// A tab-separated rank file: rank, country, value. Later duplicates win.
fn parse_rank_file<R: Read>(reader: R) -> Result<BTreeMap<String, u64>> {
    let mut result = BTreeMap::new();
    for_each_row(reader, b'\t', |rec| {
        let country = field(rec, 1)?.into_owned();
        let value = parse_number(&field(rec, 2)?)?;
        result.insert(country, value);
        Ok(())
    })?;
    Ok(result)
}

pub fn parse_internet_users<R: Read>(reader: R) -> Result<BTreeMap<String, u64>> {
    parse_rank_file(reader)
}

/// Square kilometers
pub fn parse_areas<R: Read>(reader: R) -> Result<BTreeMap<String, f64>> {
    Ok(parse_rank_file(reader)?
        .into_iter()
        .map(|(country, area)| (country, area as f64))
        .collect())
}

/// The semicolon-separated country file, with comment lines (possibly behind a byte order mark)
/// and a header row to skip.
pub fn parse_locations<R: Read>(reader: R) -> Result<BTreeMap<String, LonLat>> {
    let mut result = BTreeMap::new();
    for_each_row(reader, b';', |rec| {
        let first = field(rec, 0)?;
        if first.trim_start_matches('\u{feff}').starts_with('#') {
            return Ok(());
        }
        let lat = field(rec, COUNTRY_LATITUDE_FIELD)?;
        let lon = field(rec, COUNTRY_LONGITUDE_FIELD)?;
        if lat == "latitude" || lon == "longitude" {
            return Ok(());
        }
        let lat = lat
            .parse::<f64>()
            .with_context(|| format!("bad latitude {}", lat))?;
        let lon = lon
            .parse::<f64>()
            .with_context(|| format!("bad longitude {}", lon))?;
        let country = field(rec, COUNTRY_NAME_FIELD)?.into_owned();
        result.insert(country, LonLat::from_lat_lon(lat, lon));
        Ok(())
    })?;
    Ok(result)
}

/// The first column of a CSV file, minus the header row and blanks.
pub fn parse_names<R: Read>(reader: R, header: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for_each_row(reader, b',', |rec| {
        let name = field(rec, 0)?;
        if !name.is_empty() && name != header {
            names.push(name.into_owned());
        }
        Ok(())
    })?;
    Ok(names)
}
