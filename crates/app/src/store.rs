//! Store errors shared by the catalog and cart stores.

use std::num::TryFromIntError;

use sqlx::{
    Error, Row,
    error::{DatabaseError, ErrorKind},
    postgres::PgRow,
};
use thiserror::Error;

/// Failure reported by a store call.
///
/// Absence is never an error at this level: lookups return `Option` and the
/// services decide what a missing row means.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("value out of range for storage")]
    OutOfRange(#[from] TryFromIntError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

/// Read a non-negative integer column into an unsigned Rust type.
pub(crate) fn try_get_unsigned<S, U>(row: &PgRow, col: &str) -> Result<U, Error>
where
    S: for<'r> sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    U: TryFrom<S, Error = TryFromIntError>,
{
    let signed: S = row.try_get(col)?;

    U::try_from(signed).map_err(|e| Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
