//! DocQA Retrieval - Vector index and answering pipeline
//!
//! This crate implements the retrieval use cases: building and loading
//! vector indexes, similarity search, and grounded answer generation.

pub mod index;
pub mod models;
pub mod pipeline;
pub mod prompt;

#[cfg(test)]
pub(crate) mod testing;

pub use index::{IndexBuildResult, IndexManager, IndexPhase, IndexProgress, SearchHit, VectorIndex};
pub use models::{AnswerResult, SourceReference};
pub use pipeline::{AnswerStage, AnsweringPipeline, DEFAULT_TOP_K};
pub use prompt::{PromptTemplate, DEFAULT_TEMPLATE};
