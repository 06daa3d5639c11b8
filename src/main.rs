use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_VAR: &str = "COMMISSION_LOG";

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let code = commission::cli::run_with_args(&args);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
