//! Main CLI application for the crossword generator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossword_csp::{
    config::{CliOverrides, OutputFormat, Settings},
    generate::{CrosswordProblem, Solution, SolutionValidator},
    puzzle::{create_example_files, load_structure_from_file},
    utils::{init_logger, ColorOutput, SolutionFormatter},
};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "crossword_csp")]
#[command(about = "Crossword generator using constraint satisfaction")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a crossword structure from a word list
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Structure file (overrides config)
        #[arg(short, long)]
        structure: Option<PathBuf>,

        /// Words file (overrides config)
        #[arg(short, long)]
        words: Option<PathBuf>,

        /// Write the filled grid to this file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Re-run arc consistency after every tentative assignment
        #[arg(long)]
        maintain_arc_consistency: bool,

        /// Search the first slot's candidates in parallel
        #[arg(long)]
        parallel: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and input files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a saved JSON solution against a structure
    Validate {
        /// Structure file
        #[arg(short, long)]
        structure: PathBuf,

        /// Solution file (JSON)
        #[arg(long)]
        solution: PathBuf,
    },

    /// Analyze a puzzle: slots, crossings and candidate counts
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Structure file (overrides config)
        #[arg(short, long)]
        structure: Option<PathBuf>,

        /// Words file (overrides config)
        #[arg(short, long)]
        words: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Solve { verbose: true, .. });
    init_logger(verbose);

    match cli.command {
        Commands::Solve {
            config, structure, words, output, format,
            maintain_arc_consistency, parallel, verbose
        } => {
            let overrides = CliOverrides {
                structure_file: structure,
                words_file: words,
                output_file: output,
                format,
                maintain_arc_consistency,
                parallel,
            };
            solve_command(config, overrides, verbose)
        }
        Commands::Setup { directory, force } => {
            setup_command(directory, force)
        }
        Commands::Validate { structure, solution } => {
            validate_command(structure, solution)
        }
        Commands::Analyze { config, structure, words } => {
            let overrides = CliOverrides {
                structure_file: structure,
                words_file: words,
                ..Default::default()
            };
            analyze_command(config, overrides)
        }
    }
}

/// Load the config file, falling back to defaults when it is missing
fn load_settings(config_path: &Path) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(&config_path.to_path_buf())
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        println!("{}", ColorOutput::warning(&format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
        Ok(Settings::default())
    }
}

fn solve_command(config_path: PathBuf, cli_overrides: CliOverrides, verbose: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🧩 Starting Crossword Generator"));

    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&cli_overrides);

    if verbose {
        println!("Configuration:");
        println!("  Structure file: {}", settings.input.structure_file.display());
        println!("  Words file: {}", settings.input.words_file.display());
        println!("  Arc consistency: {}", settings.solver.enforce_arc_consistency);
        println!("  Maintain arc consistency: {}", settings.solver.maintain_arc_consistency);
        println!("  Parallel: {}", settings.solver.parallel);
        println!();
    }

    settings.validate()
        .context("Configuration validation failed")?;

    let start_time = Instant::now();
    let mut problem = CrosswordProblem::new(settings.clone())
        .context("Failed to create crossword problem")?;

    if verbose {
        println!("{}", problem.analyze());
    }

    println!("{}", ColorOutput::info("🔎 Propagating constraints and searching..."));
    let solution = problem.solve()
        .context("Failed to generate crossword")?;

    let total_time = start_time.elapsed();

    let Some(solution) = solution else {
        println!("{}", ColorOutput::warning("❌ No solution."));
        if verbose {
            if let Some(statistics) = problem.statistics() {
                println!("\n{}", statistics);
            }
        }
        return Ok(());
    };

    println!("{}", ColorOutput::success(&format!(
        "✅ Filled {} slot(s) in {:.3}s",
        solution.metadata.slot_count,
        total_time.as_secs_f64()
    )));

    if verbose {
        println!("\n{}", SolutionFormatter::format_solution(problem.crossword(), &solution));
    } else {
        println!("\n{}", SolutionFormatter::format_grid(problem.crossword(), &solution));
    }

    if let Some(ref output_file) = settings.output.output_file {
        SolutionFormatter::save_solution(problem.crossword(), &solution, output_file, settings.output.format)
            .context("Failed to save solution")?;
        println!("{}", ColorOutput::success(&format!(
            "Solution saved to {}", output_file.display()
        )));
    }

    if verbose {
        if let Some(statistics) = problem.statistics() {
            println!("\n{}", statistics);
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let data_dir = directory.join("data");

    for dir in [&config_dir, &data_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default().to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    let structure_path = data_dir.join("structure0.txt");
    if !structure_path.exists() || force {
        create_example_files(&data_dir)
            .context("Failed to create example puzzle")?;
        println!("Created example puzzle in: {}", data_dir.display());
    } else {
        println!("Skipped: {} (already exists)", structure_path.display());
    }

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your own structures and word lists to {}", data_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

fn validate_command(structure_path: PathBuf, solution_path: PathBuf) -> Result<()> {
    println!("{}", ColorOutput::info("🔍 Validating solution..."));

    let crossword = load_structure_from_file(&structure_path)
        .with_context(|| format!("Failed to load structure from {}", structure_path.display()))?;

    let solution = Solution::load_from_file(&solution_path)
        .with_context(|| format!("Failed to load solution from {}", solution_path.display()))?;

    let result = SolutionValidator::new(&crossword).validate(&solution.assignment());

    println!("{}", result);

    if result.is_valid {
        println!("{}", SolutionFormatter::format_grid(&crossword, &solution));
        println!("{}", ColorOutput::success("✅ Solution is valid!"));
    } else {
        println!("{}", ColorOutput::error("❌ Solution is invalid"));
        if let Some(error) = result.error_message {
            println!("Error: {}", error);
        }
    }

    Ok(())
}

fn analyze_command(config_path: PathBuf, cli_overrides: CliOverrides) -> Result<()> {
    println!("{}", ColorOutput::info("🔬 Analyzing puzzle..."));

    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&cli_overrides);

    let problem = CrosswordProblem::new(settings)
        .context("Failed to create problem for analysis")?;

    println!("Structure ({}x{}):", problem.crossword().width, problem.crossword().height);
    println!("{}", problem.crossword());

    let analysis = problem.analyze();
    println!("{}", analysis);

    if analysis.proven_unsolvable {
        println!("{}", ColorOutput::warning("Propagation alone rules out every fill"));
    }

    Ok(())
}
