//! Translation of `sqlx` failures into [`CoreError`].

use recipebox_core::error::CoreError;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Classify a sqlx error.
///
/// - Unique violations on `uq_` constraints become [`CoreError::Conflict`].
/// - Foreign key violations become [`CoreError::Validation`].
/// - Everything else is logged and becomes [`CoreError::Internal`].
pub fn into_core(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                return CoreError::Conflict(conflict_message(constraint));
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return CoreError::Validation(format!(
                    "Referenced entity does not exist ({constraint})"
                ));
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(format!("Database error: {err}"))
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_ratings_recipe_rater" => "This user has already rated this recipe".to_string(),
        "uq_images_name" => "An image with this name already exists".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}
