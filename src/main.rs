use clap::Parser;
use miette::Result;
use shipquote::cli::{Cli, Commands};
use shipquote::core::{logging, Config};

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
    let config = Config::load();

    logging::init(&logging::directive(
        cli.global.verbose,
        cli.global.quiet,
        config.log_level.as_deref(),
    ));
    for problem in &config.problems {
        tracing::warn!("{}", problem);
    }

    let global = cli.global.with_config(&config);

    match cli.command {
        Commands::Quote(args) => shipquote::cli::commands::quote::run(args, &global),
        Commands::Breakdown(args) => shipquote::cli::commands::breakdown::run(args, &global),
        Commands::Materials(args) => shipquote::cli::commands::materials::run(args, &global),
        Commands::Components(args) => shipquote::cli::commands::components::run(args, &global),
        Commands::Check(args) => shipquote::cli::commands::check::run(args, &global),
        Commands::Completions(args) => shipquote::cli::commands::completions::run(args),
    }
}
