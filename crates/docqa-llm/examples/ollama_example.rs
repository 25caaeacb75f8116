//! Example demonstrating the Ollama adapters
//!
//! Embeds two sentences and asks a local model a question about them.
//!
//! Note: This example requires Ollama to be running locally with
//! `nomic-embed-text` and `llama3` pulled.
//! To run: cargo run -p docqa-llm --example ollama_example

use docqa_llm::{Embedder, Generator, ModelChoice, OllamaEmbedder, OllamaGenerator};

#[tokio::main]
async fn main() {
    println!("DocQA LLM - Ollama Example");
    println!("==========================\n");

    let embedder = OllamaEmbedder::localhost("nomic-embed-text", 768);

    println!("Embedder Configuration:");
    println!("  Model: {}", embedder.model_name());
    println!("  Dimensions: {}", embedder.dimensions());
    println!();

    let texts = [
        "Employees accrue two days of paid leave per month",
        "Expense reports are due within thirty days",
    ];

    println!("Attempting to generate embeddings...");
    println!("(This will fail if Ollama is not running)\n");

    match embedder.embed(&texts).await {
        Ok(embeddings) => {
            println!("✓ Successfully generated {} embeddings", embeddings.len());
            for (i, embedding) in embeddings.iter().enumerate() {
                println!("  Embedding {}: {} dimensions", i + 1, embedding.len());
            }
        }
        Err(e) => {
            println!("✗ Failed to generate embeddings: {}", e);
            return;
        }
    }

    let generator = OllamaGenerator::new("http://localhost:11434");
    let spec = ModelChoice::Llama3.spec(Some("llama3"));
    let prompt = format!("Context:\n{}\n\nQuestion: How much leave do employees get?", texts.join("\n\n"));

    match generator.generate(&prompt, &spec).await {
        Ok(answer) => println!("\nAnswer from {}:\n{}", spec.model_id, answer.trim()),
        Err(e) => println!("\n✗ Generation failed: {}", e),
    }
}
