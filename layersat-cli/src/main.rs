mod config;

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::process::exit;

use anyhow::Context;
use config::{Config, Input};
use layersat::{generator::random_formula, LayeredGraph, SATSolution::Satisfiable, CNF};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn read_formula(input: &Input) -> anyhow::Result<CNF> {
    Ok(match input {
        Input::Stdin => {
            info!("No input file specified. Reading from standard input...");
            CNF::read(io::stdin().lock()).context("could not read formula from standard input")?
        }
        Input::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("could not open {}", path.display()))?;
            CNF::read(file).with_context(|| format!("could not read formula from {}", path.display()))?
        }
        Input::Random { num_variables, num_clauses, seed } => {
            info!("Generating random formula with {} variables and {} clauses (seed {})", num_variables, num_clauses, seed);
            random_formula(*num_variables, *num_clauses, &mut StdRng::seed_from_u64(*seed))
        }
    })
}

fn main() -> anyhow::Result<()> {
    let config: Config = config::make_config()?;

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .init();

    let formula = read_formula(&config.input)?;
    info!("{} variables, {} clauses", formula.num_variables, formula.len());

    if let Some(path) = &config.adjacencies {
        let file = File::create(path)
            .with_context(|| format!("could not create {}", path.display()))?;
        LayeredGraph::build(&formula).write_adjacencies(BufWriter::new(file))
            .with_context(|| format!("could not write adjacencies to {}", path.display()))?;
    }

    let solution = config.solver.solve(&formula);

    match &config.output {
        Some(path) => std::fs::write(path, solution.to_dimacs())
            .with_context(|| format!("could not write solution to {}", path.display()))?,
        None => print!("{}", solution.to_dimacs()),
    }

    if config.return_code {
        match solution {
            Satisfiable(_) => exit(10),
            _ => exit(20),
        }
    }
    Ok(())
}
