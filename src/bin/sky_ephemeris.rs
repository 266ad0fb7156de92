//! Sky ephemeris tool
//!
//! Prints ephemeris tables, object information, mutual planetary
//! conjunctions, lunar phases and seasons for an observer.
//!
//! Usage:
//!   cargo run --bin sky_ephemeris -- table mars --from 2024-01-01 --to 2024-02-01 --lat 51.48
//!   cargo run --bin sky_ephemeris -- conjunctions jupiter,saturn --from 2020-12-01 --to 2021-01-01

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{info, LevelFilter};

use stargazer::almanac::{find_mutual_conjunctions, phases_between, seasons};
use stargazer::constants::DAY_S;
use stargazer::ephemeris::{generate_table, DateRange};
use stargazer::{
    time, CalculationSettings, CancelFlag, CelestialBody, EphemerisKey, GeoLocation, Planet,
    SkyContext,
};

/// Type alias for the error type used throughout this binary
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Apparent positions and events of celestial bodies",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print debugging output
    #[arg(short, long, action = ArgAction::SetTrue, global = true)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct Observer {
    /// Geographic longitude in degrees, positive WEST of Greenwich
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    lon: f64,

    /// Geographic latitude in degrees
    #[arg(long, default_value_t = 51.4769, allow_hyphen_values = true)]
    lat: f64,

    /// Height above sea level in meters
    #[arg(long, default_value_t = 0.0)]
    elevation: f64,

    /// Calculation settings file (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Use the faster, truncated theories
    #[arg(long, action = ArgAction::SetTrue)]
    fast: bool,
}

impl Observer {
    fn location(&self) -> Result<GeoLocation> {
        let location = GeoLocation {
            elevation: self.elevation,
            ..GeoLocation::new(self.lon, self.lat)
        };
        location.validate()?;
        Ok(location)
    }

    fn settings(&self) -> Result<CalculationSettings> {
        let mut settings = match &self.settings {
            Some(path) => CalculationSettings::from_path(path)?,
            None => CalculationSettings::default(),
        };
        settings.prefer_fast_calculation |= self.fast;
        Ok(settings)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tabulate quantities of one body over a date range
    Table {
        /// Sun, Moon or a planet name
        body: String,
        /// First instant (YYYY-MM-DD, RFC 3339 or a Julian Day)
        #[arg(long)]
        from: String,
        /// Last instant
        #[arg(long)]
        to: String,
        /// Step in days
        #[arg(long, default_value_t = 1.0)]
        step: f64,
        /// Comma-separated quantities, e.g. ra,dec,mag (default: all for the body)
        #[arg(long, value_delimiter = ',')]
        keys: Vec<EphemerisKey>,
        /// Print JSON instead of text
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
        #[command(flatten)]
        observer: Observer,
    },
    /// Describe one body at an instant
    Info {
        body: String,
        /// Instant (default: now)
        #[arg(long)]
        at: Option<String>,
        #[command(flatten)]
        observer: Observer,
    },
    /// Find mutual conjunctions in right ascension of planets
    Conjunctions {
        /// Comma-separated planet names
        #[arg(value_delimiter = ',')]
        planets: Vec<Planet>,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[command(flatten)]
        observer: Observer,
    },
    /// List the principal lunar phases in a range
    Phases {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Equinoxes and solstices of a year
    Seasons {
        #[arg(allow_hyphen_values = true)]
        year: i32,
    },
}

/// Julian Day (UT) from a date, an RFC 3339 timestamp or a bare number
fn parse_instant(s: &str) -> Result<f64> {
    if let Ok(jd) = s.parse::<f64>() {
        return Ok(jd);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(time::from_datetime(&dt.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("cannot parse '{}' as a date: {}", s, e))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("invalid date '{}'", s))?
        .and_utc();
    Ok(time::from_datetime(&midnight))
}

fn print_table(
    body: &str,
    from: &str,
    to: &str,
    step: f64,
    keys: Vec<EphemerisKey>,
    json: bool,
    observer: &Observer,
) -> Result<()> {
    let body: CelestialBody = body.parse()?;
    let range = DateRange::new(parse_instant(from)?, parse_instant(to)?, step);
    let keys = if keys.is_empty() { body.ephemeris_keys() } else { keys };

    let table = generate_table(
        body.as_object(),
        &observer.location()?,
        &observer.settings()?,
        &range,
        &keys,
        &CancelFlag::new(),
        |_| {},
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print!("{}", table);
    }
    Ok(())
}

fn print_info(body: &str, at: Option<&str>, observer: &Observer) -> Result<()> {
    let body: CelestialBody = body.parse()?;
    let julian_day = match at {
        Some(s) => parse_instant(s)?,
        None => time::from_datetime(&Utc::now()),
    };
    let ctx = SkyContext::with_settings(julian_day, observer.location()?, observer.settings()?);
    println!("{}", time::calendar_date(julian_day));
    print!("{}", body.info(&ctx)?);
    Ok(())
}

fn print_conjunctions(planets: &[Planet], from: &str, to: &str, observer: &Observer) -> Result<()> {
    let (from, to) = (parse_instant(from)?, parse_instant(to)?);
    let events = find_mutual_conjunctions(
        planets,
        from,
        to,
        &observer.location()?,
        &observer.settings()?,
        &CancelFlag::new(),
        |fraction| log::debug!("Conjunction scan {:.0}%", fraction * 100.0),
    )?;

    info!("Found {} conjunctions", events.len());
    for event in events {
        println!(
            "{}  {} - {}  {:.3}°  {:?}",
            time::calendar_date(event.julian_day),
            event.bodies.0,
            event.bodies.1,
            event.separation,
            event.direction
        );
    }
    Ok(())
}

fn print_phases(from: &str, to: &str) -> Result<()> {
    let from = parse_instant(from)?;
    let to = parse_instant(to)?;
    let events = phases_between(from, to, true, &CancelFlag::new(), |fraction| {
        log::debug!("Phase search {:.0}%", fraction * 100.0)
    })?;
    for event in events {
        println!("{}  {}", time::calendar_date(event.julian_day), event.phase);
    }
    Ok(())
}

fn print_seasons(year: i32) -> Result<()> {
    for (season, jde) in seasons(year, true)? {
        let julian_day = jde - time::delta_t(jde) / DAY_S;
        println!("{}  {}", time::calendar_date(julian_day), season);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let _logger = flexi_logger::Logger::try_with_env_or_str(level.as_str().to_ascii_lowercase())?
        .log_to_stderr()
        .start()?;

    match &cli.command {
        Command::Table {
            body,
            from,
            to,
            step,
            keys,
            json,
            observer,
        } => print_table(body, from, to, *step, keys.clone(), *json, observer),
        Command::Info { body, at, observer } => print_info(body, at.as_deref(), observer),
        Command::Conjunctions {
            planets,
            from,
            to,
            observer,
        } => print_conjunctions(planets, from, to, observer),
        Command::Phases { from, to } => print_phases(from, to),
        Command::Seasons { year } => print_seasons(*year),
    }
}
