use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use docqa_llm::ModelChoice;

/// Words that end an interactive session
const EXIT_WORDS: &[&str] = &["exit", "quit", ":q"];

/// Pick the generation model, starting on `default`
pub fn choose_model(default: ModelChoice) -> Result<ModelChoice> {
    let choices = ModelChoice::all();
    let labels: Vec<String> = choices
        .iter()
        .map(|choice| format!("{} ({})", choice, choice.default_model_id()))
        .collect();
    let default_idx = choices.iter().position(|c| *c == default).unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Answer with")
        .items(&labels)
        .default(default_idx)
        .interact()?;

    Ok(choices[selection])
}

/// Confirm deleting an index
pub fn confirm_remove(name: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(format!("Delete index '{}'? It must be rebuilt before asking questions", name))
        .default(false)
        .interact()?;

    Ok(confirmed)
}

/// Ask for the next question; `None` ends the session
pub fn prompt_question() -> Result<Option<String>> {
    let question: String = Input::new()
        .with_prompt("Question (empty to quit)")
        .allow_empty(true)
        .interact_text()?;

    Ok(parse_question(&question))
}

fn parse_question(input: &str) -> Option<String> {
    let question = input.trim();
    if question.is_empty() || EXIT_WORDS.contains(&question.to_lowercase().as_str()) {
        None
    } else {
        Some(question.to_string())
    }
}
