use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// The default place to look for overrides.
pub const DEFAULT_CONFIG_PATH: &str = "pplme.toml";

/// Where one reference table comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    /// Downloaded once, then read from the cache directory on later runs.
    Url(String),
    File(PathBuf),
}

impl Source {
    pub fn parse(x: &str) -> Source {
        if x.starts_with("http://") || x.starts_with("https://") {
            Source::Url(x.to_string())
        } else {
            Source::File(PathBuf::from(x))
        }
    }
}

pub struct ImporterConfiguration {
    pub cache_dir: PathBuf,
    pub internet_users: Source,
    pub areas: Source,
    pub locations: Source,
    pub first_names: Source,
    pub last_names: Source,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawImporterConfiguration {
    cache_dir: Option<String>,
    internet_users: Option<String>,
    areas: Option<String>,
    locations: Option<String>,
    first_names: Option<String>,
    last_names: Option<String>,
}

/// Reads overrides from `path`, or from `pplme.toml` if no path is given. Only an explicitly
/// requested file has to exist. A file that exists but can't be parsed is always an error.
pub fn load_configuration(path: Option<&Path>) -> Result<ImporterConfiguration> {
    let (path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_PATH), false),
    };
    if !required && !path.exists() {
        return Ok(default_configuration());
    }
    let text = fs_err::read_to_string(path)?;
    parse_configuration(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_configuration(text: &str) -> Result<ImporterConfiguration> {
    let config = toml::from_str::<RawImporterConfiguration>(text)?;
    Ok(fill_in_defaults(config))
}

pub fn default_configuration() -> ImporterConfiguration {
    ImporterConfiguration {
        cache_dir: PathBuf::from("data/input"),
        internet_users: Source::Url(
            "https://www.cia.gov/library/publications/the-world-factbook/rankorder/rawdata_2153.txt"
                .to_string(),
        ),
        areas: Source::Url(
            "https://www.cia.gov/library/publications/the-world-factbook/rankorder/rawdata_2147.txt"
                .to_string(),
        ),
        locations: Source::Url("http://www.opengeocode.org/cude/download.php?file=/home/fashions/public_html/opengeocode.org/download/cow.txt".to_string()),
        first_names: Source::Url(
            "http://www.quietaffiliate.com/Files/CSV_Database_of_First_Names.csv".to_string(),
        ),
        last_names: Source::Url(
            "http://www.quietaffiliate.com/Files/CSV_Database_of_Last_Names.csv".to_string(),
        ),
    }
}

fn fill_in_defaults(config: RawImporterConfiguration) -> ImporterConfiguration {
    let mut result = default_configuration();

    if let Some(dir) = config.cache_dir {
        result.cache_dir = PathBuf::from(dir);
    }
    result.internet_users = source_or_default(config.internet_users, result.internet_users);
    result.areas = source_or_default(config.areas, result.areas);
    result.locations = source_or_default(config.locations, result.locations);
    result.first_names = source_or_default(config.first_names, result.first_names);
    result.last_names = source_or_default(config.last_names, result.last_names);

    result
}

fn source_or_default(maybe_value: Option<String>, default: Source) -> Source {
    maybe_value.map(|x| Source::parse(&x)).unwrap_or(default)
}
