use thiserror::Error;

use crate::types::DatasourceId;

/// Convenience alias for `Result<T, MeshgateError>`.
pub type MeshgateResult<T> = Result<T, MeshgateError>;

/// Error classification for abort/report decisions.
///
/// - `UserError`  — bad request (unknown table, unsupported distribution);
///   aborts before any backend work, user-correctable
/// - `Backend`    — one statement failed on one destination; collected,
///   never aborts sibling statement units
/// - `Timeout`    — a phase barrier's bound elapsed; fatal for the request
/// - `InternalBug`— post-rewrite assertion failed; should never happen
///
/// Rule inapplicability is deliberately *not* an error: conversion rules
/// return `Option` and the planner tries other strategies on `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UserError,
    Backend,
    Timeout,
    InternalBug,
}

/// Top-level error type for the middleware core.
#[derive(Error, Debug)]
pub enum MeshgateError {
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Backend statement error: {0}")]
    Backend(#[from] BackendError),

    /// A fan-out phase barrier timed out before every unit finished.
    /// Already-dispatched units are not cancelled; their eventual outcome
    /// is irrelevant once this error is raised.
    #[error("Phase `{phase}` timed out after {elapsed_ms}ms with {pending} unit(s) unfinished")]
    PhaseTimeout {
        phase: &'static str,
        elapsed_ms: u64,
        pending: usize,
    },

    /// Internal invariant violation — indicates a defect, never expected
    /// in correct operation. Always carries a unique `error_code` and
    /// `debug_context` for post-mortem.
    #[error("InternalInvariant [{error_code}]: {message} | context: {debug_context}")]
    InternalInvariant {
        error_code: &'static str,
        message: String,
        debug_context: String,
    },
}

/// User-correctable request errors. These abort the request before any
/// backend work is dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Unknown table: {schema}.{table}")]
    UnknownTable { schema: String, table: String },

    #[error("Unsupported distribution kind `{kind}` for {schema}.{table}")]
    UnsupportedDistribution {
        schema: String,
        table: String,
        kind: String,
    },

    #[error("CREATE TABLE requires a table name")]
    MissingTableName,
}

/// One statement execution failed on one destination datasource.
///
/// Backend errors are accumulated across both phases and reported as one
/// aggregated failure; they never abort sibling units.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("datasource `{datasource}` rejected `{statement}`: {message}")]
pub struct BackendError {
    pub datasource: DatasourceId,
    pub statement: String,
    pub message: String,
}

impl MeshgateError {
    /// Classify this error for abort/report decisions.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeshgateError::Request(_) => ErrorKind::UserError,
            MeshgateError::Backend(_) => ErrorKind::Backend,
            MeshgateError::PhaseTimeout { .. } => ErrorKind::Timeout,
            MeshgateError::InternalInvariant { .. } => ErrorKind::InternalBug,
        }
    }

    /// Returns true if this is a user/input error.
    pub fn is_user_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::UserError)
    }

    /// Returns true if this error is fatal for the whole request
    /// (timeout or internal defect), as opposed to a collectable
    /// per-destination backend failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Timeout | ErrorKind::InternalBug)
    }

    /// Construct an internal invariant violation with error code and context.
    pub fn internal_invariant(
        error_code: &'static str,
        message: impl Into<String>,
        debug_context: impl Into<String>,
    ) -> Self {
        MeshgateError::InternalInvariant {
            error_code,
            message: message.into(),
            debug_context: debug_context.into(),
        }
    }

    /// Emit a structured log entry for fatal errors. Called before a
    /// timeout or invariant violation propagates to the response sink.
    pub fn log_if_fatal(&self) {
        match self {
            MeshgateError::InternalInvariant {
                error_code,
                message,
                debug_context,
            } => {
                tracing::error!(
                    error_code = error_code,
                    error_category = "InternalBug",
                    debug_context = debug_context.as_str(),
                    "FATAL [{}]: {}",
                    error_code,
                    message
                );
            }
            MeshgateError::PhaseTimeout {
                phase,
                elapsed_ms,
                pending,
            } => {
                tracing::error!(
                    phase = phase,
                    elapsed_ms = elapsed_ms,
                    pending = pending,
                    "phase barrier timed out"
                );
            }
            _ => {}
        }
    }
}
