use clap::Parser;
use env_logger::Env;
use log::error;
use sitetime_lib::cli::{self, Args};
use sitetime_lib::config::Settings;
use sitetime_lib::error::AppError;
use sitetime_lib::open_store;

async fn run(args: &Args) -> Result<String, AppError> {
    let settings = Settings::load()?;
    cli::execute(&args.command, &settings, || open_store(&settings.db_path)).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match run(&args).await {
        Ok(output) => {
            #[allow(clippy::print_stdout, reason = "command output goes to stdout")]
            {
                println!("{}", output.trim_end());
            }
        }
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}
