use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

mod application;
mod presentation;

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    application::run()
}
