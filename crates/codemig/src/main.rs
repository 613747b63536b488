use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod file_walker;
mod recipes;
mod run;
mod ui;

#[derive(Parser)]
#[command(name = "codemig")]
#[command(about = "Migrate source trees from one coding convention to another", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a migration recipe over files and directories
    #[command(alias = "r")]
    Run(run::RunArgs),

    /// List built-in recipes
    Recipes(recipes::RecipesArgs),

    /// Print the TOML of a built-in recipe
    Show(recipes::ShowArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug; RUST_LOG overrides both.
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Commands::Run(args) => run::execute(args),
        Commands::Recipes(args) => recipes::execute_list(args),
        Commands::Show(args) => recipes::execute_show(args),
    }
}
