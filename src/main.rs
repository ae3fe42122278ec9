use clap::{Parser, Subcommand};
use horcrux::bind::BindOptions;
use horcrux::cli::{bind_directory, bind_files, show_info, split_file};
use horcrux::split::SplitOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "horcrux")]
#[command(version, author, about = "Split a file into encrypted horcruxes; any threshold of them resurrect it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a file into encrypted horcruxes
    #[command(alias = "s")]
    Split {
        /// File to split
        input: PathBuf,

        /// Number of horcruxes to create (2-99)
        #[arg(short = 'n', long, default_value_t = 5)]
        total: u8,

        /// Horcruxes required to resurrect the file (2-99)
        #[arg(short = 't', long, default_value_t = 3)]
        threshold: u8,

        /// Output directory (defaults to the input file's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resurrect the original file from horcruxes
    #[command(alias = "b")]
    Bind {
        /// Horcrux files, or a single directory to search (defaults to ".")
        inputs: Vec<PathBuf>,

        /// Output file (defaults to the filename recorded in the horcruxes)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a horcrux file's header
    #[command(alias = "i")]
    Info {
        /// Horcrux file to inspect
        file: PathBuf,
    },
}

fn default_output_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Show help when no command provided
    let command = match cli.command {
        Some(command) => command,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().unwrap();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Split {
            input,
            total,
            threshold,
            output,
        } => {
            let options = SplitOptions { total, threshold };
            let output_dir = output.unwrap_or_else(|| default_output_dir(&input));

            split_file(&input, &output_dir, &options).map(|report| {
                for path in &report.paths {
                    println!("Created {}", path.display());
                }
                println!(
                    "Split {} ({} bytes) into {} horcruxes; any {} resurrect it",
                    input.display(),
                    report.original_size,
                    total,
                    threshold
                );
            })
        }

        Commands::Bind { inputs, output } => {
            let outcome = if inputs.is_empty() {
                bind_directory(Path::new("."), output.as_deref())
            } else if inputs.len() == 1 && inputs[0].is_dir() {
                bind_directory(&inputs[0], output.as_deref())
            } else {
                bind_files(&inputs, output.as_deref(), &BindOptions::default())
            };

            outcome.map(|(result, written)| {
                println!(
                    "Resurrected {} from {} horcruxes to {}",
                    result.filename,
                    result.horcruxes_used,
                    written.display()
                );
            })
        }

        Commands::Info { file } => show_info(&file).map(|info| print!("{}", info)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
