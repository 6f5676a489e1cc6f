use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{crate_version, App, Arg, ArgMatches};
use layersat::{Bruteforce, LayeredSolver, Solver};
use log::LevelFilter;

/// Where the formula comes from
pub enum Input {
    Stdin,
    File(PathBuf),
    Random {
        num_variables: usize,
        num_clauses: usize,
        seed: u64,
    },
}

pub struct Config {
    pub input:       Input,
    pub output:      Option<PathBuf>,
    pub adjacencies: Option<PathBuf>,
    pub return_code: bool,
    pub log_level:   LevelFilter,
    pub solver:      Box<dyn Solver>,
}

fn is_number(value: String) -> Result<(), String> {
    value.parse::<u64>()
        .map(|_| ())
        .map_err(|_| format!("`{}` is not a non-negative integer", value))
}

fn number<T: std::str::FromStr>(value: &str, what: &str) -> anyhow::Result<T> {
    match value.parse::<T>() {
        Ok(number) => Ok(number),
        Err(_) => bail!("invalid {}: `{}`", what, value),
    }
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("layersat")
        .version(crate_version!())
        .author("Alex&Korbi&Radek inc.")
        .about("Decides 3-CNF formulas by layered propagation of satisfying sign assignments")
        .arg(
            Arg::with_name("input")
                .index(1)
                .value_name("INPUT")
                .help("DIMACS input file, standard input if omitted"),
        )
        .arg(
            Arg::with_name("algorithm")
                .long("algorithm")
                .value_name("ALGORITHM")
                .help("SAT solving algorithm")
                .takes_value(true)
                .possible_values(&["layered", "bruteforce"])
                .default_value("layered"),
        )
        .arg(
            Arg::with_name("parallel")
                .long("parallel")
                .help("Evaluate the nodes of a layer on the rayon thread pool"),
        )
        .arg(
            Arg::with_name("default-polarity")
                .long("default-polarity")
                .help("Value of variables the witness leaves unconstrained")
                .takes_value(true)
                .possible_values(&["true", "false"])
                .default_value("true"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("File name for output in DIMACS format"),
        )
        .arg(
            Arg::with_name("adjacencies")
                .long("adjacencies")
                .takes_value(true)
                .value_name("FILE")
                .help("Write the compatibility edges between consecutive layers as JSON"),
        )
        .arg(
            Arg::with_name("random")
                .long("random")
                .takes_value(true)
                .number_of_values(2)
                .value_names(&["VARIABLES", "CLAUSES"])
                .validator(is_number)
                .conflicts_with("input")
                .help("Solve a uniform random 3-CNF formula instead of reading one"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .requires("random")
                .validator(is_number)
                .help("Seed for --random (default 0)"),
        )
        .arg(
            Arg::with_name("return_code")
                .long("return-code")
                .short("r")
                .help("Exit with 10 if satisfiable and 20 if not (useful for scripting)")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more (-v info, -vv debug, -vvv trace)"),
        )
}

fn input(matches: &ArgMatches) -> anyhow::Result<Input> {
    if let Some(mut values) = matches.values_of("random") {
        let (num_variables, num_clauses) = match (values.next(), values.next()) {
            (Some(variables), Some(clauses)) => (number(variables, "variable count")?, number(clauses, "clause count")?),
            _ => unreachable!(), // already handled by clap
        };
        if num_variables < 3 {
            bail!("a random 3-CNF formula needs at least 3 variables, got {}", num_variables);
        }
        let seed = number(matches.value_of("seed").unwrap_or("0"), "seed")?;
        return Ok(Input::Random { num_variables, num_clauses, seed });
    }

    Ok(match matches.value_of("input") {
        Some(file) => Input::File(PathBuf::from(file)),
        None => Input::Stdin,
    })
}

pub fn make_config() -> anyhow::Result<Config> {
    let matches = app().get_matches();

    let solver: Box<dyn Solver> = match matches.value_of("algorithm") {
        Some("bruteforce") => Box::new(Bruteforce),
        Some("layered") => Box::new(
            LayeredSolver::new()
                .parallel(matches.is_present("parallel"))
                .default_polarity(matches.value_of("default-polarity") == Some("true")),
        ),
        _ => unreachable!(), // already handled by clap
    };

    let adjacencies = matches.value_of("adjacencies").map(PathBuf::from);
    if adjacencies.is_some() && matches.value_of("algorithm") != Some("layered") {
        bail!("--adjacencies only applies to the layered algorithm");
    }

    let log_level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Ok(Config {
        input: input(&matches).context("invalid --random arguments")?,
        output: matches.value_of("output").map(PathBuf::from),
        adjacencies,
        return_code: matches.is_present("return_code"),
        log_level,
        solver,
    })
}
