use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Invalid JSON file: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Invalid JSON file: expected an object of prompts")]
    NotAnObject,

    #[error("Invalid JSON file: value of \"{key}\" is not a string")]
    NonStringValue { key: String },

    #[error("Please enter a key name")]
    EmptyKey,

    #[error("Key already exists")]
    DuplicateKey(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PromptError>;
