use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Unknown merge variable: {0}")]
    UnknownMergeVariable(String),
}
