use std::fmt;

use crate::io::remote::RemoteError;

/// Which kind of entity a soft outcome refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    Project,
    Section,
    Label,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Task => "task",
            EntityKind::Project => "project",
            EntityKind::Section => "section",
            EntityKind::Label => "label",
        };
        f.write_str(s)
    }
}

/// An expected, non-exceptional reason an operation did nothing.
///
/// These never reach the service: they are detected during resolution or
/// duplicate checking and reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Soft {
    /// A project partial name matched nothing
    ProjectNotFound { query: String },
    /// A section partial name matched nothing within the resolved project
    SectionNotFound { query: String, project: String },
    /// A section (or section-scoped command) was given without `--project`
    ProjectRequired { context: &'static str },
    /// Update/done/delete target did not match anything in scope
    NotFound { kind: EntityKind, query: String },
    /// Create found an existing entity with the same name in scope
    Duplicate {
        kind: EntityKind,
        name: String,
        id: String,
    },
}

impl Soft {
    /// Whether this outcome means the user asked for something impossible
    /// (as opposed to a benign no-op).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Soft::ProjectNotFound { .. } | Soft::SectionNotFound { .. } | Soft::ProjectRequired { .. }
        )
    }
}

impl fmt::Display for Soft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Soft::ProjectNotFound { query } => write!(f, "no project found matching '{}'", query),
            Soft::SectionNotFound { query, project } => write!(
                f,
                "no section found matching '{}' in project '{}'",
                query, project
            ),
            Soft::ProjectRequired { context } => write!(f, "{} requires --project", context),
            Soft::NotFound { kind, query } => write!(f, "no {} found matching '{}'", kind, query),
            Soft::Duplicate { kind, name, id } => write!(
                f,
                "{} '{}' (ID: {}) already exists, skipping",
                kind, name, id
            ),
        }
    }
}

/// Result of a core operation that did not fail at the transport level.
#[derive(Debug)]
pub enum Outcome<T> {
    Done(T),
    Soft(Soft),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Done(v) => Outcome::Done(f(v)),
            Outcome::Soft(s) => Outcome::Soft(s),
        }
    }

    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(v) => Some(v),
            Outcome::Soft(_) => None,
        }
    }

    pub fn soft(&self) -> Option<&Soft> {
        match self {
            Outcome::Done(_) => None,
            Outcome::Soft(s) => Some(s),
        }
    }
}

/// Early exit from an operation pipeline: either soft or hard.
///
/// Lets pipeline steps use `?` for both kinds; [`finish`] splits them again
/// at the public boundary.
#[derive(Debug)]
pub(crate) enum Halt {
    Soft(Soft),
    Hard(RemoteError),
}

impl From<RemoteError> for Halt {
    fn from(e: RemoteError) -> Self {
        Halt::Hard(e)
    }
}

impl From<Soft> for Halt {
    fn from(s: Soft) -> Self {
        Halt::Soft(s)
    }
}

pub(crate) fn finish<T>(result: Result<T, Halt>) -> Result<Outcome<T>, RemoteError> {
    match result {
        Ok(v) => Ok(Outcome::Done(v)),
        Err(Halt::Soft(s)) => Ok(Outcome::Soft(s)),
        Err(Halt::Hard(e)) => Err(e),
    }
}
