//! Generates a dataset of vaguely real-looking people and writes it as CSV, by default to STDOUT.
//! Logs and progress go to STDERR.

#[macro_use]
extern crate log;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use structopt::clap::ErrorKind;
use structopt::StructOpt;

use geom::LongitudeModel;
use importer::CachingFetcher;
use pplutil::{prettyprint_usize, Timer};
use synthpop::{CsvSink, Options, Plan};

#[derive(StructOpt)]
#[structopt(
    name = "pplme",
    about = "Generates plausible-looking people, weighted by internet users per country"
)]
struct Args {
    /// How many people to generate. Countries without a known location and rounding make the
    /// real number somewhat smaller.
    #[structopt(default_value = "10000000", parse(try_from_str = parse_num_people))]
    num_people: usize,
    /// A seed for generating random numbers. If omitted, one is picked and logged.
    #[structopt(long)]
    rng_seed: Option<u64>,
    /// A TOML file overriding where reference data comes from. Defaults to pplme.toml, if it
    /// exists.
    #[structopt(long)]
    config: Option<PathBuf>,
    /// Write CSV here instead of STDOUT
    #[structopt(long)]
    output: Option<PathBuf>,
    /// How to spread people east-west: "legacy" or "equirectangular"
    #[structopt(long, default_value = "legacy")]
    longitude_model: LongitudeModel,
    /// Don't print timing and progress
    #[structopt(long)]
    quiet: bool,
}

fn parse_num_people(x: &str) -> Result<usize, String> {
    match x.parse::<usize>() {
        Ok(0) => Err("the number of people must be positive".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(format!("{} isn't a number of people: {}", x, err)),
    }
}

fn main() -> Result<()> {
    let args = match Args::from_iter_safe(std::env::args()) {
        Ok(args) => args,
        Err(err) => {
            if matches!(
                err.kind,
                ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed
            ) {
                err.exit();
            }
            eprintln!("{}", err.message);
            std::process::exit(2);
        }
    };
    pplutil::logger::setup();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let mut timer = if args.quiet {
        Timer::quiet("generate pplme dataset")
    } else {
        Timer::new("generate pplme dataset")
    };

    let config = importer::load_configuration(args.config.as_deref())?;
    let data = importer::load_reference_data(&mut CachingFetcher::new(&config), &mut timer)?;

    let opts = Options {
        num_people: args.num_people,
        longitude_model: args.longitude_model,
        ..Options::default()
    };
    // Anything fatal about the inputs surfaces here, before an existing output file is touched.
    let plan = Plan::new(&data, &opts, &mut timer)?;

    let seed = args.rng_seed.unwrap_or_else(rand::random);
    info!("Using --rng-seed={}", seed);
    let mut rng = XorShiftRng::seed_from_u64(seed);

    let output: Box<dyn Write> = match args.output {
        Some(ref path) => Box::new(fs_err::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut sink = CsvSink::new(output);

    let today = chrono::Local::now().date_naive();
    let total = plan.emit(&data, &opts, today, &mut rng, &mut sink, &mut timer)?;
    sink.into_inner()?.flush()?;
    info!("Generated {} people", prettyprint_usize(total));
    Ok(())
}
