//! Shared Diesel and pool error mapping for the booking repositories.
//!
//! Each repository passes its port error constructors so the mapping stays
//! in one place while the error types remain per port.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error.
pub(super) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Name of the unique constraint a write violated, if that is why it failed.
pub(super) fn unique_violation(error: &DieselError) -> Option<&str> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.constraint_name().unwrap_or_default())
        }
        _ => None,
    }
}

/// Map Diesel errors into query/connection constructors.
///
/// Messages are generic; the driver detail is only logged at debug level.
pub(super) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            query("transaction conflict")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::AppointmentRepositoryError;
    use rstest::rstest;

    struct Info {
        message: &'static str,
        constraint: Option<&'static str>,
    }

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(Info {
                message: "boom",
                constraint,
            }),
        )
    }

    fn map(error: DieselError) -> AppointmentRepositoryError {
        map_diesel_error(
            error,
            |message| AppointmentRepositoryError::query(message),
            |message| AppointmentRepositoryError::connection(message),
        )
    }

    #[rstest]
    #[case(DieselError::NotFound, AppointmentRepositoryError::query("record not found"))]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection, None),
        AppointmentRepositoryError::connection("database connection error")
    )]
    #[case(
        database_error(DatabaseErrorKind::SerializationFailure, None),
        AppointmentRepositoryError::query("transaction conflict")
    )]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation, None),
        AppointmentRepositoryError::query("database error")
    )]
    fn diesel_errors_map_to_port_errors(
        #[case] error: DieselError,
        #[case] expected: AppointmentRepositoryError,
    ) {
        assert_eq!(map(error), expected);
    }

    #[rstest]
    fn unique_violations_expose_constraint() {
        let error = database_error(DatabaseErrorKind::UniqueViolation, Some("users_email_key"));
        assert_eq!(unique_violation(&error), Some("users_email_key"));
        assert_eq!(unique_violation(&DieselError::NotFound), None);
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out"), |message| {
            AppointmentRepositoryError::connection(message)
        });
        assert_eq!(mapped, AppointmentRepositoryError::connection("timed out"));
    }
}
