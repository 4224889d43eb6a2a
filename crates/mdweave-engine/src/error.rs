use crate::parsing::deps::FactoryId;

/// Raised while turning a [`ParserBuilder`](crate::ParserBuilder) into a
/// [`Parser`](crate::Parser).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cyclic ordering constraints between factories: {}", join_ids(.factories))]
    DependencyCycle { factories: Vec<FactoryId> },
    #[error("Factory id registered twice: {0}")]
    DuplicateFactory(FactoryId),
    #[error("Two delimiter processors claim the character {0:?}")]
    DuplicateDelimiter(char),
}

/// Raised by the parse entry points that read their input themselves.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_ids(ids: &[FactoryId]) -> String {
    ids.iter()
        .map(|id| id.0)
        .collect::<Vec<_>>()
        .join(", ")
}
