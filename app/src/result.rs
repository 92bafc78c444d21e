use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
#[error(transparent)]
#[diagnostic(code("E-IO"))]
pub struct IOError {
    #[from]
    inner: io::Error,
}

#[derive(Error, Diagnostic, Debug)]
pub enum CaseError {
    #[error("Could not parse {}", path.display())]
    #[diagnostic(code("E-001"))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Template {name} is defined more than once")]
    #[diagnostic(code("E-002"))]
    DuplicateTemplate { name: String },
}
