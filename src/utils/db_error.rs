//! Helpers for inspecting database constraint violations.

/// Name of the unique constraint a failed statement violated, if any.
pub fn violated_unique_constraint(e: &sqlx::Error) -> Option<&str> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    db_err.constraint()
}

/// Whether the error is a unique violation on the given constraint.
pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    violated_unique_constraint(e) == Some(constraint)
}

/// Name of the foreign key constraint a failed statement violated, if any.
pub fn violated_foreign_key(e: &sqlx::Error) -> Option<&str> {
    let db_err = e.as_database_error()?;

    if !db_err.is_foreign_key_violation() {
        return None;
    }

    db_err.constraint()
}

/// Whether the error is a foreign key violation on the given constraint.
pub fn is_foreign_key_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    violated_foreign_key(e) == Some(constraint)
}
