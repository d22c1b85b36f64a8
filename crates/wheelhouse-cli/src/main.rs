mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{CONFIG_ERROR_PREFIX, EXIT_CONFIG_ERROR, EXIT_FAILURE};
use std::path::PathBuf;
use std::process::ExitCode;
use wheelhouse_core::Settings;
use wheelhouse_runtime::{DEFAULT_GIT_REF, DEFAULT_REPO_URL};
use wheelhouse_store::WHEELS_BASE_URL_ENV;

#[derive(Debug, Parser)]
#[command(
    name = "wheelhouse",
    version,
    about = "Pin, hash-verify and publish Python wheels for reproducible package builds"
)]
struct Cli {
    /// Settings file (defaults to ./wheelhouse.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

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
    /// Write a hashed requirements file for a Poetry project's main dependencies.
    Requirements {
        #[arg(long, default_value = "pyproject.toml")]
        pyproject: PathBuf,
        #[arg(long, default_value = "poetry.lock")]
        lock: PathBuf,
        /// Output file (stdout when omitted).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Pin dependencies to the wheel hashes in the signed hash sums file.
    UpdateRequirements {
        /// Pinned requirements file listing the dependencies to hash.
        #[arg(long, conflicts_with_all = ["pyproject", "lock"])]
        requirements: Option<PathBuf>,
        /// Take dependencies from a Poetry project instead.
        #[arg(long, requires = "lock")]
        pyproject: Option<PathBuf>,
        #[arg(long, requires = "pyproject")]
        lock: Option<PathBuf>,
        /// Where to write the hashed requirements.
        #[arg(long, short)]
        output: PathBuf,
        /// Hash sums file (defaults to <repo_root>/sha256sums.txt).
        #[arg(long)]
        sums: Option<PathBuf>,
        /// Package directory, used in the hint for building missing wheels.
        #[arg(long, default_value = ".")]
        pkg_dir: PathBuf,
    },
    /// Check that every requirement in a hashed requirements file has hashes.
    CheckHashes {
        requirements: PathBuf,
    },
    /// Recompute artifact digests and compare them with the hash sums file.
    VerifyArtifacts {
        #[arg(long)]
        sums: Option<PathBuf>,
        /// Directory holding the artifacts (defaults to <repo_root>/localwheels).
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Delete nightly .deb packages older than the retention period.
    CleanNightlies {
        dir: PathBuf,
        /// Retention in days (overrides the settings file).
        #[arg(long)]
        days: Option<u64>,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Regenerate simple/index.html from the project directories.
    UpdateIndex {
        #[arg(long)]
        simple: Option<PathBuf>,
    },
    /// Create simple/<project>/index.html for each pinned requirement.
    CreateDirs {
        requirements: PathBuf,
        #[arg(long)]
        simple: Option<PathBuf>,
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// Print the download URL of every artifact in the hash sums file.
    DownloadUrls {
        #[arg(long)]
        sums: Option<PathBuf>,
        #[arg(long, env = WHEELS_BASE_URL_ENV)]
        base_url: Option<String>,
    },
    /// Check that Debian package builds are reproducible with reprotest.
    Reprotest {
        /// Packages to test (defaults to every workstation component).
        packages: Vec<String>,
        #[arg(long, env = "PKG_GITREF", default_value = DEFAULT_GIT_REF)]
        git_ref: String,
    },
    /// Check that .deb packages ship no conffiles.
    CheckConffiles {
        /// Packages to inspect (defaults to the build output directory).
        debs: Vec<PathBuf>,
        /// Only inspect discovered packages whose name starts with this prefix.
        #[arg(long, default_value = "securedrop-keyring")]
        prefix: String,
    },
    /// Rebuild committed wheels from a fresh clone and require a clean tree.
    CheckWheelRebuild {
        /// Components to rebuild (defaults to every component with wheels).
        names: Vec<String>,
        #[arg(long, default_value = DEFAULT_REPO_URL)]
        repo_url: String,
        /// Directory to clone into.
        #[arg(long, default_value = "/tmp")]
        workdir: PathBuf,
    },
    /// Print the project name declared in <dir>/setup.py.
    ProjectName {
        #[arg(default_value = ".")]
        dir: PathBuf,
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
            tracing_subscriber::EnvFilter::try_from_env("WHEELHOUSE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json = cli.json;
    let result = match Settings::discover(cli.config.as_deref()) {
        Err(e) => Err(commands::core_error(&e)),
        Ok(settings) => dispatch(cli.command, &settings, json),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with(CONFIG_ERROR_PREFIX) {
                EXIT_CONFIG_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}

fn dispatch(command: Commands, settings: &Settings, json: bool) -> Result<u8, String> {
    match command {
        Commands::Requirements {
            pyproject,
            lock,
            output,
        } => commands::requirements::run(&pyproject, &lock, output.as_deref(), json),
        Commands::UpdateRequirements {
            requirements,
            pyproject,
            lock,
            output,
            sums,
            pkg_dir,
        } => {
            let source = match (requirements, pyproject, lock) {
                (Some(path), _, _) => commands::update_requirements::Source::Requirements(path),
                (None, Some(pyproject), Some(lock)) => {
                    commands::update_requirements::Source::Poetry { pyproject, lock }
                }
                _ => {
                    return Err(format!(
                        "{CONFIG_ERROR_PREFIX} pass --requirements or both --pyproject and --lock"
                    ))
                }
            };
            let sums = sums.unwrap_or_else(|| settings.sums_path());
            commands::update_requirements::run(
                &source,
                &output,
                &sums,
                &pkg_dir,
                &settings.build_script,
                json,
            )
        }
        Commands::CheckHashes { requirements } => {
            commands::check_hashes::run(&requirements, json)
        }
        Commands::VerifyArtifacts { sums, dir } => {
            let sums = sums.unwrap_or_else(|| settings.sums_path());
            let dir = dir.unwrap_or_else(|| settings.layout().localwheels_dir());
            commands::verify_artifacts::run(&sums, &dir, json)
        }
        Commands::CleanNightlies { dir, days, dry_run } => commands::clean_nightlies::run(
            &dir,
            days.unwrap_or(settings.retention_days),
            dry_run,
            json,
        ),
        Commands::UpdateIndex { simple } => {
            let simple = simple.unwrap_or_else(|| settings.layout().simple_dir());
            commands::update_index::run(&simple, json)
        }
        Commands::CreateDirs {
            requirements,
            simple,
            template,
        } => {
            let simple = simple.unwrap_or_else(|| settings.layout().simple_dir());
            let template = template.unwrap_or_else(|| settings.layout().project_index_template());
            commands::create_dirs::run(&requirements, &simple, &template, json)
        }
        Commands::DownloadUrls { sums, base_url } => {
            let sums = sums.unwrap_or_else(|| settings.sums_path());
            let base_url = base_url.unwrap_or_else(|| settings.wheels_base_url.clone());
            commands::download_urls::run(&sums, &base_url, json)
        }
        Commands::Reprotest { packages, git_ref } => {
            commands::reprotest::run(&packages, &git_ref, json)
        }
        Commands::CheckConffiles { debs, prefix } => {
            commands::check_conffiles::run(&debs, &prefix, json)
        }
        Commands::CheckWheelRebuild {
            names,
            repo_url,
            workdir,
        } => commands::check_wheel_rebuild::run(
            &names,
            &repo_url,
            &workdir,
            &settings.build_script,
            json,
        ),
        Commands::ProjectName { dir } => commands::project_name::run(&dir, json),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    }
}
