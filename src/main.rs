use std::process::ExitCode;

use clap::{Parser, Subcommand};
use geomlib::cli_commands::{self, OverlayName, PredicateName};

#[derive(Debug, Parser)]
#[clap(author, version, about = "Planar geometry tools over WKT input", long_about = None)]
struct Args {
    #[clap(long, default_value_t = 0, help = "Spatial reference id given to parsed geometries")]
    srid: i32,

    #[clap(long, help = "Round coordinates to a fixed grid with this scale")]
    scale: Option<f64>,

    #[clap(long, help = "Store coordinates in packed sequences")]
    packed: bool,

    #[clap(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print details about a geometry
    Info { wkt: String },
    /// Print the DE-9IM matrix of two geometries
    Relate {
        a: String,
        b: String,
        #[clap(long, help = "Match the matrix against this pattern")]
        pattern: Option<String>,
    },
    /// Evaluate a spatial predicate
    Predicate {
        #[clap(value_enum)]
        name: PredicateName,
        a: String,
        b: String,
    },
    /// Compute a set operation
    Overlay {
        #[clap(value_enum)]
        op: OverlayName,
        a: String,
        b: String,
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Compute the convex hull of a geometry
    Hull {
        wkt: String,
        #[clap(short, long)]
        output: Option<String>,
    },
}

fn main() -> ExitCode {
    if let Err(e) = main_inner() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn main_inner() -> Result<(), String> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let factory = cli_commands::build_factory(args.srid, args.scale, args.packed)?;
    log::debug!("Using factory with srid {} and {:?}", factory.srid(), factory.precision_model());

    match args.command {
        Command::Info { wkt } => cli_commands::parse_show_detail(&wkt, &factory),
        Command::Relate { a, b, pattern } => {
            cli_commands::show_relate(&a, &b, pattern.as_deref(), &factory)
        }
        Command::Predicate { name, a, b } => {
            let result = cli_commands::evaluate_predicate(name, &a, &b, &factory)?;
            println!("{result}");
            Ok(())
        }
        Command::Overlay { op, a, b, output } => {
            cli_commands::compute_overlay(op, &a, &b, output.as_deref(), &factory)
        }
        Command::Hull { wkt, output } => {
            cli_commands::compute_convex_hull(&wkt, output.as_deref(), &factory)
        }
    }
}
