pub mod api;
pub mod artifact;
pub mod config;
pub mod error;
pub mod grouping;
pub mod naming;
pub mod parse;
pub mod report;
pub mod synth;

pub use api::{ApiDescription, OperationContext, OperationId, ParsedApi};
pub use artifact::{Artifact, ArtifactKind, Plan, WritePolicy};
pub use error::{ContextError, GeneratorError, ParseError};
pub use grouping::{ApiGroup, GroupName, group_operations};
pub use report::{GenerationReport, Outcome, SkipReason};
pub use synth::OutputTree;

/// A target-language backend that turns a parsed API into files under an
/// output tree.
pub trait CodeGenerator {
    type Options;

    fn generate(
        &self,
        api: &ParsedApi,
        options: &Self::Options,
        tree: &mut OutputTree,
    ) -> Result<(), GeneratorError>;
}
