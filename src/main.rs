use anyhow::Result;
use clap::Parser;
use git_ai_install::exec::exec;
use git_ai_install::install::{Config, install};
use git_ai_install::locate::{BinaryLocator, InstallMode};
use std::ffi::OsString;
use std::path::PathBuf;

/// git-ai-install - installer and launcher for the git-ai npm package
///
/// `install` runs from npm's postinstall hook and downloads the git-ai release
/// matching the package version. `exec` is what the package's `git-ai` bin
/// runs: it finds the binary and forwards all arguments to it.
///
/// Examples:
///   git-ai-install install                  # Download into ./bin
///   git-ai-install exec -- commit --dry-run # Run git-ai
#[derive(Parser, Debug)]
#[command(author, version = env!("GIT_AI_INSTALL_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory containing the package's package.json (defaults to the current directory)
    #[arg(
        long = "package-dir",
        env = "GIT_AI_PACKAGE_DIR",
        value_name = "PATH",
        global = true
    )]
    pub package_dir: Option<PathBuf>,

    /// Where the binary is expected to live
    #[arg(
        long,
        env = "GIT_AI_INSTALL_MODE",
        value_enum,
        default_value_t = InstallMode::LocalBin,
        global = true
    )]
    pub mode: InstallMode,

    /// Release download host (defaults to https://github.com)
    #[arg(
        long = "download-base-url",
        env = "GIT_AI_DOWNLOAD_BASE_URL",
        value_name = "URL",
        global = true
    )]
    pub download_base_url: Option<String>,

    /// Operating system to install for, instead of the host's
    #[arg(long, env = "GIT_AI_OS", global = true)]
    pub os: Option<String>,

    /// CPU architecture to install for, instead of the host's
    #[arg(long, env = "GIT_AI_ARCH", global = true)]
    pub arch: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Download and unpack the git-ai release for this platform
    Install,

    /// Print the path of the installed git-ai binary
    Locate,

    /// Run git-ai, forwarding arguments and exit code
    Exec(ExecArgs),
}

#[derive(clap::Args, Debug)]
pub struct ExecArgs {
    /// Arguments passed to git-ai unchanged
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<OsString>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = git_ai_install::runtime::RealRuntime;

    let config = Config::new(
        &runtime,
        cli.package_dir,
        cli.mode,
        cli.download_base_url,
        cli.os,
        cli.arch,
    )?;

    match cli.command {
        Commands::Install => {
            let code = install(&runtime, &config).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Locate => {
            let platform = config.platform()?;
            let locator = BinaryLocator::new(&runtime, config.package_root.clone(), config.mode);
            println!("{}", locator.locate(&platform)?.display());
        }
        Commands::Exec(args) => {
            let code = exec(&runtime, &config, &args.args)?;
            std::process::exit(code);
        }
    }
    Ok(())
}
