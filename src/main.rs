use clap::Parser;
use log::{debug, LevelFilter};
use miette::Result;
use std::str::FromStr;
use umlt::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let log_level = LevelFilter::from_str(&global.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            global.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    debug!(log_level:% = log_level; "Starting umlt");

    match cli.command {
        Commands::Init(args) => umlt::cli::commands::init::run(args),
        Commands::Import(args) => umlt::cli::commands::import::run(args, &global),
        Commands::Generate(args) => umlt::cli::commands::generate::run(args, &global),
        Commands::Job(args) => umlt::cli::commands::job::run(args, &global),
        Commands::Show(args) => umlt::cli::commands::show::run(args, &global),
        Commands::Validate(args) => umlt::cli::commands::validate::run(args, &global),
        Commands::Templates(args) => umlt::cli::commands::templates::run(args, &global),
        Commands::Config(cmd) => umlt::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => umlt::cli::commands::completions::run(args),
    }
}
