use anyhow::Result;

use super::{Session, cancel_on_ctrl_c, finish};
use crate::api::{FallbackOrchestrator, ResponseMode};
use crate::cli::InputArgs;
use crate::endpoint::EndpointCategory;
use crate::grammar;
use crate::input::InputReader;
use crate::ui::Spinner;

const fn spinner_message(category: EndpointCategory) -> &'static str {
    match category {
        EndpointCategory::Translate => "Translating...",
        EndpointCategory::FixGrammar => "Fixing grammar...",
        EndpointCategory::LearnGrammar => "Preparing lesson...",
    }
}

/// Sends the input to the `category` endpoint group and prints the result.
pub async fn run_request(
    category: EndpointCategory,
    input: &InputArgs,
    session: &Session,
) -> Result<()> {
    let text = InputReader::read_text(input.text.as_deref(), input.file.as_deref())?;
    let group = session.config.group(category);
    let policy = session.config.retry_policy();
    let orchestrator = FallbackOrchestrator::default();
    let cancel = cancel_on_ctrl_c();

    let spinner = Spinner::new(spinner_message(category), session.quiet);

    if category == EndpointCategory::LearnGrammar {
        let outcome = grammar::learn(&orchestrator, &group, &text, policy, &cancel).await;
        spinner.stop();
        let lesson = finish(outcome)?;
        println!("{}", serde_json::to_string_pretty(&lesson)?);
    } else {
        let outcome = orchestrator
            .dispatch(&group, &text, ResponseMode::Text, policy, &cancel)
            .await;
        spinner.stop();
        println!("{}", finish(outcome)?);
    }

    Ok(())
}
