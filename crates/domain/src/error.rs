//! Unified error types for the domain layer
//!
//! `DomainError` covers parsing and validation failures shared by every module.
//! Operations with richer rejection reasons (skill choices, hero class changes,
//! quiz answers) return their own error enums so callers can match exhaustively.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Rejected skill branch choice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkillChoiceError {
    #[error("No hero class selected")]
    NoHeroClass,

    #[error("Level {level} does not exist in a {max_level}-level tree")]
    LevelOutOfRange { level: usize, max_level: usize },

    #[error("Level {level} is locked: needs {required} stars, has {current}")]
    LevelLocked {
        level: usize,
        required: u32,
        current: u32,
    },

    #[error("Branch {branch_id} is not offered at level {level}")]
    UnknownBranch { level: usize, branch_id: String },

    #[error("Level {level} already has branch {existing} chosen")]
    AlreadyChosen { level: usize, existing: String },
}

/// Rejected hero class change.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeroClassError {
    #[error("Hero class is locked as {current}")]
    Locked { current: String },

    #[error("No hero class selected")]
    NoHeroClass,
}

/// Rejected guild assignment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuildAssignmentError {
    #[error("Student already belongs to guild {existing}")]
    AlreadyAssigned { existing: String },
}

/// Rejected quiz answer or premature finish.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("Quiz has no questions")]
    NoQuestions,

    #[error("Question {index} out of range (quiz has {count})")]
    QuestionOutOfRange { index: usize, count: usize },

    #[error("Option {option} out of range for question {question} ({count} options)")]
    OptionOutOfRange {
        question: usize,
        option: usize,
        count: usize,
    },

    #[error("Quiz incomplete: {answered} of {total} answered")]
    Incomplete { answered: usize, total: usize },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for Reason {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "respect" => Ok(Self::Respect),
    ///             _ => Err(DomainError::parse(format!("Unknown reason: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("display name cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: display name cannot be empty"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Student", "123e4567-e89b-12d3-a456-426614174000");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Student"));
        assert!(err.to_string().contains("123e4567"));
    }

    #[test]
    fn test_constraint_error() {
        let err = DomainError::constraint("guild already assigned");
        assert_eq!(
            err.to_string(),
            "Constraint violation: guild already assigned"
        );
    }
}
