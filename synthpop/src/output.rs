use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::SyntheticPerson;

/// Somewhere to send people as they're generated.
pub trait PersonSink {
    fn emit(&mut self, person: SyntheticPerson) -> Result<()>;

    /// Called once after the last person.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps everybody in memory. Only sensible for small populations and tests.
impl PersonSink for Vec<SyntheticPerson> {
    fn emit(&mut self, person: SyntheticPerson) -> Result<()> {
        self.push(person);
        Ok(())
    }
}

/// Writes one headerless CSV row per person: `id,name,birth_date,latitude,longitude`.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> CsvSink<W> {
        CsvSink {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(inner),
        }
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| anyhow!("couldn't flush CSV output: {}", err.error()))
    }
}

#[derive(Serialize)]
struct Record<'a> {
    id: String,
    name: &'a str,
    birth_date: String,
    latitude: f64,
    longitude: f64,
}

impl<W: Write> PersonSink for CsvSink<W> {
    fn emit(&mut self, person: SyntheticPerson) -> Result<()> {
        self.writer.serialize(Record {
            id: person.id.hyphenated().to_string(),
            name: &person.name,
            birth_date: person.birth_date.format("%Y-%m-%d").to_string(),
            latitude: person.pos.latitude,
            longitude: person.pos.longitude,
        })?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
