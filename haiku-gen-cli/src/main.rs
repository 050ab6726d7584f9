use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use haiku_gen_core::config::{DEFAULT_MAX_LINE_ATTEMPTS, DEFAULT_MAX_LINE_COUNT};
use haiku_gen_core::model::successor_table::SuccessorTable;
use haiku_gen_core::{GenerationConfig, RejectionPolicy, ResourcePaths, Resources};

mod compile;
mod interactive;

/// Writes haiku in the style of a sample text, or freeform verse on a theme.
#[derive(Parser)]
#[command(name = "haiku-gen", version)]
struct Cli {
    /// Directory holding the tables, sentence patterns and corpora
    #[arg(long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    /// Seed for reproducible poems
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// How many times a haiku line is restarted before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_ATTEMPTS, global = true)]
    max_attempts: usize,

    /// Longest freeform poem that may be asked for
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_COUNT, global = true)]
    max_lines: usize,

    /// Remove one occurrence of a rejected word instead of the whole word
    #[arg(long, global = true)]
    legacy_rejection: bool,

    /// Without a subcommand, asks for everything interactively
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write one haiku
    Haiku {
        /// First word of the poem
        #[arg(long)]
        start: String,
        /// Sample text to imitate (defaults to the bundled sonnets)
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
    /// Write one freeform poem
    Freeform {
        #[arg(long)]
        theme: String,
        /// Number of lines
        #[arg(long)]
        lines: Option<usize>,
    },
    /// List the available themes
    Themes,
    /// Build the binary tables from their public text sources
    Compile(compile::CompileArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = GenerationConfig::default();
    config.set_max_line_attempts(cli.max_attempts)?;
    config.set_max_line_count(cli.max_lines)?;
    if cli.legacy_rejection {
        config.rejection = RejectionPolicy::DecayOccurrence;
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let paths = ResourcePaths::default();

    match cli.command {
        Some(Command::Compile(args)) => compile::run(&args, &cli.data_dir, &paths),
        Some(Command::Themes) => {
            let resources = Resources::load(&cli.data_dir, &paths)?;
            for theme in resources.themes().themes() {
                println!("{theme}");
            }
            Ok(())
        }
        Some(Command::Haiku { start, corpus }) => {
            let resources = Resources::load(&cli.data_dir, &paths)?;
            let corpus = corpus.unwrap_or_else(|| paths.resolve(&cli.data_dir).default_corpus);
            let successors = SuccessorTable::load(&corpus)?;
            println!("{}", resources.haiku(&successors, &start, &config, &mut rng)?);
            Ok(())
        }
        Some(Command::Freeform { theme, lines }) => {
            let resources = Resources::load(&cli.data_dir, &paths)?;
            let lines = lines.unwrap_or(config.default_line_count());
            println!("{}", resources.freeform(&theme, lines, &config, &mut rng)?);
            Ok(())
        }
        None => {
            let resources = Resources::load(&cli.data_dir, &paths)?;
            let session = interactive::Session::new(&resources, &config, &cli.data_dir, &paths);
            session.run(&mut rng)?;
            Ok(())
        }
    }
}
