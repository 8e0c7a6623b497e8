mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_MALFORMED_SPEC, MALFORMED_SPEC_PREFIX};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "remora",
    version,
    about = "Manifest editing and renv.lock export for Guix workspaces"
)]
struct Cli {
    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add or remove package specifications in a manifest.
    ///
    /// Reads the manifest from stdin and writes the edited document to
    /// stdout, unless --manifest selects a file to rewrite in place.
    Modify {
        /// Edit the named manifest file in place instead of stdin/stdout.
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Operations: +spec adds, -spec removes. Repeatable, any order.
        #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
        specs: Vec<String>,
    },
    /// Export the R packages of a resolved profile as renv.lock.
    Export {
        /// Path to the resolved profile JSON.
        profile: Option<PathBuf>,
        /// Write the lock document to a file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Build kind to export.
        #[arg(long, default_value = remora_renv::DEFAULT_BUILD_SYSTEM)]
        build_system: String,
        /// R version for the lock header (default: inferred from the profile).
        #[arg(long)]
        r_version: Option<String>,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("REMORA_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Modify { manifest, specs } => {
            commands::modify::run(&specs, manifest.as_deref())
        }
        Commands::Export {
            profile,
            output,
            build_system,
            r_version,
        } => commands::export::run(
            profile.as_deref(),
            output.as_deref(),
            &build_system,
            r_version.as_deref(),
        ),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with(MALFORMED_SPEC_PREFIX) {
                EXIT_MALFORMED_SPEC
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
