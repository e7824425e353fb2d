use clap::{Parser as ClapParser, Subcommand};
use groq_lang::cli::{self, CheckOptions, CheckResult, CliError};
use groq_lang::{QueryLimits, normalize, to_json, to_json_pretty};
use std::io::{self, Read};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(ClapParser)]
#[command(name = "groq")]
#[command(about = "groq - run GROQ queries against a JSON dataset")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and execute a GROQ query
    Check {
        /// The GROQ query to execute
        query: String,

        /// Dataset as a JSON array or NDJSON (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Query parameter as name=<json>, repeatable
        #[arg(long = "param", value_name = "NAME=JSON")]
        params: Vec<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't execute
        #[arg(long)]
        syntax_only: bool,

        /// Print the parsed syntax tree
        #[arg(long)]
        ast: bool,

        /// Override every parse/evaluation depth limit
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
    },

    /// Print the normalized form of a query
    Normalize {
        /// The GROQ query to normalize
        query: String,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groq_lang=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            query,
            input,
            params,
            pretty,
            syntax_only,
            ast,
            max_depth,
        } => {
            let options = CheckOptions {
                query,
                input,
                params,
                syntax_only,
                limits: max_depth.map(QueryLimits::uniform).unwrap_or_default(),
            };
            run_check(options, pretty, ast)
        }
        Commands::Normalize { query } => normalize(&query)
            .map(|normalized| println!("{normalized}"))
            .map_err(|e| CliError::Parse(e.into())),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run_check(mut options: CheckOptions, pretty: bool, ast: bool) -> Result<(), CliError> {
    if options.input.is_none() && !options.syntax_only && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        options.input = Some(buffer);
    }

    if ast {
        let tree = groq_lang::parse_with_limits(&options.query, options.limits)?;
        println!("{tree:#?}");
    }

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid(_) => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if pretty {
                to_json_pretty(&output)
            } else {
                to_json(&output)
            };
            println!("{json}");
        }
    }
    Ok(())
}
