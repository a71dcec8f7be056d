mod cli;
mod config;
#[cfg(feature = "desktop")]
mod desktop;
mod error;
mod logging;
mod server;
mod terminal;

use clap::Parser;
use tokio::runtime::Runtime;

use services::QuizService;

use crate::cli::{Cli, Command};
use crate::config::{FALLBACK_API_KEY_VAR, build_quiz_service};
use crate::error::AppError;

fn fallback_key() -> Option<String> {
    std::env::var(FALLBACK_API_KEY_VAR).ok()
}

fn runtime() -> Result<Runtime, AppError> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

#[cfg(feature = "desktop")]
fn launch_desktop(service: QuizService) -> Result<(), AppError> {
    desktop::launch(service);
    Ok(())
}

#[cfg(not(feature = "desktop"))]
fn launch_desktop(_service: QuizService) -> Result<(), AppError> {
    Err(AppError::DesktopUnavailable)
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Quiz(args) => {
            let service = build_quiz_service(&args, fallback_key())?;
            runtime()?.block_on(terminal::run(&service))
        }
        // The desktop launcher owns its own async runtime.
        Command::Ui(args) => launch_desktop(build_quiz_service(&args, fallback_key())?),
        Command::Serve(args) => runtime()?.block_on(server::serve(&args, fallback_key())),
    }
}

fn main() {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(err) = run(cli.into_command()) {
        // At this layer (binary glue), printing once is fine.
        eprintln!("error: {err}");
        std::process::exit(2);
    }
}
