//! Input validation for timetabling problems.
//!
//! Checks structural integrity of offerings and rooms before solving.
//! Detects:
//! - Duplicate IDs
//! - Offerings with no schedulable session (no lecture and no lab hours)
//! - Non-finite or negative hour loads
//! - Room preferences referencing unknown rooms
//!
//! Advisory: the solvers do not call this themselves. The boundary that
//! materializes inputs decides whether to reject or proceed.

use std::collections::HashSet;

use crate::models::{ClassOffering, Room};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An offering has neither lecture nor lab hours.
    EmptyOffering,
    /// An hour load is negative, NaN, or infinite.
    InvalidHours,
    /// A room preference references a room that doesn't exist.
    UnknownRoomReference,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a timetabling problem.
///
/// Checks:
/// 1. No duplicate offering IDs
/// 2. No duplicate room IDs
/// 3. Every offering has at least one session (lecture or lab hours > 0)
/// 4. Hour loads are finite and non-negative
/// 5. Room preferences reference existing rooms
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(classes: &[ClassOffering], rooms: &[Room]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut room_ids = HashSet::new();
    for room in rooms {
        if !room_ids.insert(room.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", room.id),
            ));
        }
    }

    let mut class_ids = HashSet::new();
    for cls in classes {
        if !class_ids.insert(cls.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate class ID: {}", cls.id),
            ));
        }

        for (name, hours) in [("lecture_hours", cls.lecture_hours), ("lab_hours", cls.lab_hours)] {
            if !hours.is_finite() || hours < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidHours,
                    format!("Class '{}' has invalid {name}: {hours}", cls.subject_code),
                ));
            }
        }

        if cls.lecture_hours <= 0.0 && cls.lab_hours <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyOffering,
                format!("Class '{}' has no schedulable session", cls.subject_code),
            ));
        }

        if let Some(pref) = &cls.room_preference {
            for room_id in pref.priority.iter().chain(pref.options.iter()) {
                if !room_ids.contains(room_id) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownRoomReference,
                        format!(
                            "Class '{}' prefers unknown room {room_id}",
                            cls.subject_code
                        ),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
