//! genmedia CLI tool
//!
//! Command-line interface for the genmedia library: background removal,
//! background replacement, and text-to-video generation against a managed
//! inference endpoint.

#[cfg(feature = "cli")]
use genmedia::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> std::process::ExitCode {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
