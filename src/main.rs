use clap::Parser;
use fintwin::cli::{Cli, Command, render_projection, render_trace};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = fintwin::telemetry::init_logging(&cli.log_level) {
        eprintln!("Logging setup failed: {e}");
    }

    match cli.command {
        Command::Serve(args) => {
            if let Err(e) = fintwin::api::run_http_server(args.addr()).await {
                tracing::error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Project(args) => match render_projection(&args) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("Failed to encode projection: {e}");
                std::process::exit(1);
            }
        },
        Command::Trace(args) => print!("{}", render_trace(&args)),
    }
}
