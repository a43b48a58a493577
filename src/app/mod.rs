// Application layer: the interactive shell that drives the pipeline.

pub mod shell;

pub use shell::{render, DisplayedError, Shell, Submission};
