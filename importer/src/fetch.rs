use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pplutil::prettyprint_usize;

use crate::configuration::{ImporterConfiguration, Source};

/// The reference tables needed to generate people.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Dataset {
    InternetUsers,
    Areas,
    Locations,
    FirstNames,
    LastNames,
}

impl Dataset {
    pub fn all() -> Vec<Dataset> {
        vec![
            Dataset::InternetUsers,
            Dataset::Areas,
            Dataset::Locations,
            Dataset::FirstNames,
            Dataset::LastNames,
        ]
    }

    pub fn describe(self) -> &'static str {
        match self {
            Dataset::InternetUsers => "internet users by country",
            Dataset::Areas => "area by country",
            Dataset::Locations => "location by country",
            Dataset::FirstNames => "first names",
            Dataset::LastNames => "last names",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Dataset::InternetUsers => "internet_users",
            Dataset::Areas => "areas",
            Dataset::Locations => "locations",
            Dataset::FirstNames => "first_names",
            Dataset::LastNames => "last_names",
        }
    }
}

/// Produces the raw bytes of a reference table. Whatever is behind this (the network, a cache,
/// or memory in tests) is invisible to the parsers.
pub trait Fetcher {
    fn open(&mut self, dataset: Dataset) -> Result<Box<dyn Read>>;
}

/// Reads local files directly. URLs are downloaded into the cache directory the first time, and
/// the cached copy is used from then on.
pub struct CachingFetcher<'a> {
    config: &'a ImporterConfiguration,
}

impl<'a> CachingFetcher<'a> {
    pub fn new(config: &'a ImporterConfiguration) -> CachingFetcher<'a> {
        CachingFetcher { config }
    }

    fn source(&self, dataset: Dataset) -> &Source {
        match dataset {
            Dataset::InternetUsers => &self.config.internet_users,
            Dataset::Areas => &self.config.areas,
            Dataset::Locations => &self.config.locations,
            Dataset::FirstNames => &self.config.first_names,
            Dataset::LastNames => &self.config.last_names,
        }
    }
}

impl<'a> Fetcher for CachingFetcher<'a> {
    fn open(&mut self, dataset: Dataset) -> Result<Box<dyn Read>> {
        let path = match self.source(dataset) {
            Source::File(path) => path.clone(),
            Source::Url(url) => {
                let path = self
                    .config
                    .cache_dir
                    .join(cache_filename(dataset, url));
                download(url, &path)?;
                path
            }
        };
        let file = fs_err::File::open(&path)?;
        Ok(Box::new(std::io::BufReader::new(file)))
    }
}

/// Like "locations_cow.txt", from the last piece of the URL.
fn cache_filename(dataset: Dataset, url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or("");
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        dataset.slug().to_string()
    } else {
        format!("{}_{}", dataset.slug(), cleaned)
    }
}

/// If the output file doesn't already exist, downloads the URL into that location. A partial
/// download never lands at `output`.
fn download(url: &str, output: &Path) -> Result<()> {
    if output.exists() {
        info!("{} already exists", output.display());
        return Ok(());
    }
    if let Some(parent) = output.parent() {
        fs_err::create_dir_all(parent)?;
    }

    info!("Missing {}, so downloading {}", output.display(), url);
    let mut resp = reqwest::blocking::get(url).with_context(|| format!("downloading {}", url))?;
    resp.error_for_status_ref()
        .with_context(|| format!("downloading {}", url))?;

    let mut tmp = PathBuf::from(output);
    tmp.set_extension("part");
    let mut file = fs_err::File::create(&tmp)?;
    let bytes = resp
        .copy_to(&mut file)
        .with_context(|| format!("downloading {}", url))?;
    drop(file);
    fs_err::rename(&tmp, output)?;
    info!(
        "Downloaded {} bytes into {}",
        prettyprint_usize(bytes as usize),
        output.display()
    );
    Ok(())
}
