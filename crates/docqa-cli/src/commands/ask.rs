use crate::cli::AskArgs;
use crate::config_loader::{find_workspace_root, load_workspace_config_with_overrides};
use crate::errors;
use crate::interactive::{choose_model, prompt_question};
use crate::output::OutputWriter;
use crate::output_types::{AskOutput, SourceItem};
use crate::progress::AnswerProgress;
use crate::services;
use anyhow::{bail, Result};
use docqa_core::config::{CliConfigOverrides, LayeredConfig};
use docqa_llm::ModelChoice;
use docqa_retrieval::{AnswerResult, AnsweringPipeline, IndexManager, VectorIndex};

/// Characters of each source excerpt shown to the user
const EXCERPT_PREVIEW_CHARS: usize = 1000;

pub async fn execute(args: AskArgs, output: &OutputWriter) -> Result<()> {
    let workspace_root = find_workspace_root()?;

    let overrides = CliConfigOverrides {
        index_name: args.index,
        model: args.model.map(|m| m.to_string()),
        provider: args.provider,
        ..Default::default()
    };
    let config = load_workspace_config_with_overrides(&workspace_root, overrides)?;
    let default_choice = services::model_choice(&config)?;

    let embedder = services::create_embedder(&config)?;
    let pipeline = AnsweringPipeline::new(embedder.clone(), services::create_generator(&config))
        .with_template(services::prompt_template(&config)?);

    let manager = IndexManager::new(services::index_store(&config), embedder);
    let index = manager.load(&config.index_name.value).await?;

    match args.question {
        Some(question) => {
            let result = answer(&pipeline, &index, &config, default_choice, &question, output).await?;
            render(output, &index, &question, &result)
        }
        None => {
            if output.is_json() {
                bail!("Interactive mode is not available with --json; pass the question as an argument");
            }
            // An explicit --model skips the picker
            let choice = match args.model {
                Some(choice) => choice,
                None => choose_model(default_choice)?,
            };
            interactive_loop(&pipeline, &index, &config, choice, output).await
        }
    }
}

async fn interactive_loop(
    pipeline: &AnsweringPipeline,
    index: &VectorIndex,
    config: &LayeredConfig,
    choice: ModelChoice,
    output: &OutputWriter,
) -> Result<()> {
    output.info(format!(
        "Index '{}' has {} chunks; answering with {}",
        index.name(),
        index.len(),
        choice
    ));

    while let Some(question) = prompt_question()? {
        match answer(pipeline, index, config, choice, &question, output).await {
            Ok(result) => render(output, index, &question, &result)?,
            // Keep the session alive after a failed question
            Err(e) => errors::from_anyhow(e).display(),
        }
    }

    Ok(())
}

async fn answer(
    pipeline: &AnsweringPipeline,
    index: &VectorIndex,
    config: &LayeredConfig,
    choice: ModelChoice,
    question: &str,
    output: &OutputWriter,
) -> Result<AnswerResult> {
    let spec = services::model_spec(config, choice)?;
    let progress = AnswerProgress::new(!output.is_json());

    let result = pipeline.answer_with_progress(question, index, &spec, |stage| progress.update(stage)).await;
    if result.is_err() {
        progress.fail();
    }
    Ok(result?)
}

fn render(output: &OutputWriter, index: &VectorIndex, question: &str, result: &AnswerResult) -> Result<()> {
    if output.is_json() {
        return output.result(AskOutput {
            question: question.trim().to_string(),
            answer: result.answer.clone(),
            model: result.model.clone(),
            index_name: index.name().to_string(),
            sources: result
                .sources
                .iter()
                .enumerate()
                .map(|(i, source)| SourceItem {
                    rank: i + 1,
                    document_path: source.document_path.clone(),
                    page: source.page,
                    score: source.score,
                    excerpt: source.excerpt.clone(),
                })
                .collect(),
        });
    }

    output.section("Answer");
    output.text(&result.answer);

    output.section("Sources");
    for (i, source) in result.sources.iter().enumerate() {
        output.info(format!("{}. {} (score: {:.3})", i + 1, source.locator(), source.score));
        let preview = source.excerpt_preview(EXCERPT_PREVIEW_CHARS);
        if preview.len() < source.excerpt.len() {
            output.text(format!("   {}…", preview));
        } else {
            output.text(format!("   {}", preview));
        }
    }
    output.kv("Model", &result.model);

    Ok(())
}
