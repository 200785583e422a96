use anyhow::Result;
use clap::Parser;

use clipling::cli::commands::{Session, cache, endpoints, request, speak};
use clipling::cli::{Args, Command};
use clipling::endpoint::EndpointCategory;
use clipling::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init(telemetry::level_for(args.verbose, args.quiet));

    let session = Session::load(args.config.as_deref(), args.quiet)?;

    match args.command {
        Some(Command::Translate(input)) => {
            request::run_request(EndpointCategory::Translate, &input, &session).await?;
        }
        Some(Command::Fix(input)) => {
            request::run_request(EndpointCategory::FixGrammar, &input, &session).await?;
        }
        Some(Command::Learn(input)) => {
            request::run_request(EndpointCategory::LearnGrammar, &input, &session).await?;
        }
        Some(Command::Speak { input, lang }) => {
            speak::run_speak(&input, lang.as_deref(), &session).await?;
        }
        Some(Command::Endpoints { category }) => {
            endpoints::print_endpoints(category.as_deref(), &session)?;
        }
        Some(Command::Cache { command }) => {
            cache::run_cache(command, &session).await?;
        }
        None => {
            request::run_request(EndpointCategory::Translate, &args.input, &session).await?;
        }
    }

    Ok(())
}
