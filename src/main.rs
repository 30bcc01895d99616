use clap::Parser;
use tdc::cli::commands::Cli;
use tdc::cli::handlers;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over `--debug`, which wins over the `warn` default.
fn init_logging(debug: bool) {
    let default = if debug { "warn,tdc=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}
