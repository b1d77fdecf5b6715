//! Shared store handle and blocking registry execution.

use crate::error::ApiError;
use classroll_core::{
    ClassService, RegistryResult, SqliteClassRepository, SqliteStudentRepository, StudentService,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub type SqliteClassService<'conn> = ClassService<SqliteClassRepository<'conn>>;
pub type SqliteStudentService<'conn> =
    StudentService<SqliteStudentRepository<'conn>, SqliteClassService<'conn>>;

/// Handler state: one migrated connection opened at startup.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs one Class registry operation on a blocking worker.
    pub async fn with_classes<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&SqliteClassService<'c>) -> RegistryResult<T> + Send + 'static,
    {
        self.run(move |conn| op(&class_service(conn)?)).await
    }

    /// Runs one Student registry operation on a blocking worker.
    pub async fn with_students<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&SqliteStudentService<'c>) -> RegistryResult<T> + Send + 'static,
    {
        self.run(move |conn| op(&student_service(conn)?)).await
    }

    /// Runs one operation that needs both registries, such as the class
    /// delete gate asking the Student registry for a count.
    pub async fn with_registries<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&SqliteClassService<'c>, &SqliteStudentService<'c>) -> RegistryResult<T>
            + Send
            + 'static,
    {
        self.run(move |conn| op(&class_service(conn)?, &student_service(conn)?))
            .await
    }

    async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> RegistryResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| ApiError::Internal("store lock poisoned".to_string()))?;
            op(&guard).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("registry task failed: {err}")))?
    }
}

fn class_service(conn: &Connection) -> RegistryResult<SqliteClassService<'_>> {
    Ok(ClassService::new(SqliteClassRepository::try_new(conn)?))
}

fn student_service(conn: &Connection) -> RegistryResult<SqliteStudentService<'_>> {
    Ok(StudentService::new(
        SqliteStudentRepository::try_new(conn)?,
        class_service(conn)?,
    ))
}
