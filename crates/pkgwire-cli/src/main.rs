mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_INVALID_POLICY, EXIT_MANIFEST_ERROR};
use pkgwire_schema::PackageManager;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "pkgwire",
    version,
    about = "Wire snyk test and protect policies into package.json"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

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
    /// Add the `test` or `protect` policy to a manifest.
    Add {
        /// Policy kind: `test` or `protect`.
        kind: String,
        /// Path to package.json.
        #[arg(long, default_value = "package.json")]
        manifest: PathBuf,
        /// snyk version to declare (as `^VERSION`). Dependencies are left alone when omitted.
        #[arg(long = "snyk-version", value_name = "VERSION")]
        snyk_version: Option<String>,
        /// Lifecycle script for the protect hook when neither `prepare` nor `prepublish` exists.
        /// Only valid with the `protect` policy.
        #[arg(long, value_name = "NAME")]
        script: Option<String>,
        /// Run-script convention (npm or yarn). Detected from yarn.lock when omitted.
        #[arg(long, value_name = "MANAGER")]
        package_manager: Option<PackageManager>,
        /// Print the edited manifest instead of writing it.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Show whether a manifest is testing/protecting and where the dependencies live.
    Status {
        /// Path to package.json.
        #[arg(long, default_value = "package.json")]
        manifest: PathBuf,
        /// Run-script convention (npm or yarn). Detected from yarn.lock when omitted.
        #[arg(long, value_name = "MANAGER")]
        package_manager: Option<PackageManager>,
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
            tracing_subscriber::EnvFilter::try_from_env("PKGWIRE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        Commands::Add {
            kind,
            manifest,
            snyk_version,
            script,
            package_manager,
            dry_run,
        } => commands::add::run(
            &manifest,
            &kind,
            &commands::add::AddArgs {
                version: snyk_version,
                script,
                package_manager,
                dry_run,
            },
            json_output,
        ),
        Commands::Status {
            manifest,
            package_manager,
        } => commands::status::run(&manifest, package_manager, json_output),
        Commands::Completions { shell } => commands::generate::completions::<Cli>(shell),
        Commands::ManPages { dir } => commands::generate::man_pages::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("failed to parse manifest")
                || msg.starts_with("failed to read manifest")
                || msg.starts_with("failed to write manifest")
            {
                EXIT_MANIFEST_ERROR
            } else if msg.starts_with("invalid policy kind") {
                EXIT_INVALID_POLICY
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
