//! Diagnostic error types for the rdfwalk crate.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for walk generation.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text, source errors) through to the
/// caller.
#[derive(Debug, Error, Diagnostic)]
pub enum WalkGenError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Convenience alias for functions returning rdfwalk results.
pub type WalkGenResult<T> = std::result::Result<T, WalkGenError>;

// ---------------------------------------------------------------------------
// Index errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum IndexError {
    #[error("cannot read triple source {path}: {source}")]
    #[diagnostic(
        code(rdfwalk::index::io),
        help(
            "The triple source could not be opened or read. Check that the \
             path exists, is a regular file, and has read permissions. \
             Triples loaded from earlier sources are retained."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("not a directory: {path}")]
    #[diagnostic(
        code(rdfwalk::index::not_a_directory),
        help(
            "Directory ingestion requires a directory path. To load a single \
             triple file, use `load_file` instead of `load_dir`."
        )
    )]
    NotADirectory { path: String },
}

// ---------------------------------------------------------------------------
// Selector errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SelectorError {
    #[error("cannot read entity file {path}: {source}")]
    #[diagnostic(
        code(rdfwalk::selector::io),
        help(
            "The entity file could not be read. It must be a UTF-8 plain \
             text file with one entity URI per line."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Output errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum OutputError {
    #[error("cannot create walk file {path}: {source}")]
    #[diagnostic(
        code(rdfwalk::output::create),
        help(
            "The walk output file could not be created. Check that the \
             parent directory is writable and the disk is not full."
        )
    )]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to walk sink: {source}")]
    #[diagnostic(
        code(rdfwalk::output::write),
        help("A write to the walk sink failed. Check free disk space.")
    )]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error("walk sink lock poisoned by a panicked worker")]
    #[diagnostic(
        code(rdfwalk::output::poisoned),
        help(
            "A worker thread panicked while holding the sink lock. The walk \
             file is incomplete; re-run the generation."
        )
    )]
    SinkPoisoned,
}

// ---------------------------------------------------------------------------
// Dispatch errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DispatchError {
    #[error("failed to build worker pool: {message}")]
    #[diagnostic(
        code(rdfwalk::dispatch::thread_pool),
        help(
            "The worker thread pool could not be created. Check the \
             configured thread count and available system resources."
        )
    )]
    ThreadPool { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_error_converts_to_walk_gen_error() {
        let err = IndexError::NotADirectory {
            path: "/tmp/graph.nt".into(),
        };
        let top: WalkGenError = err.into();
        assert!(matches!(
            top,
            WalkGenError::Index(IndexError::NotADirectory { .. })
        ));
    }

    #[test]
    fn output_error_converts_to_walk_gen_error() {
        let err = OutputError::SinkPoisoned;
        let top: WalkGenError = err.into();
        assert!(matches!(top, WalkGenError::Output(OutputError::SinkPoisoned)));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = IndexError::Io {
            path: "data/graph.nt".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("data/graph.nt"));
        assert!(msg.contains("no such file"));
    }
}
