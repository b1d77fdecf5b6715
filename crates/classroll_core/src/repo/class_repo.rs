//! Class repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and label lookups over canonical `classes` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `(standard, division)` uniqueness is enforced by a `UNIQUE` constraint;
//!   a losing concurrent write surfaces as `RepoError::UniqueViolation`.
//! - Deleting a class still referenced by students surfaces as
//!   `RepoError::ForeignKeyViolation` (`ON DELETE RESTRICT`).
//! - Listing is deterministic: `standard ASC, division ASC`.

use crate::db::now_epoch_ms;
use crate::model::class::{Class, ClassId, ClassLabel};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const CLASS_SELECT_SQL: &str = "SELECT
    id,
    standard,
    division,
    created_at,
    updated_at
FROM classes";

const CLASS_COLUMNS: &[&str] = &["id", "standard", "division", "created_at", "updated_at"];

/// Repository interface for class persistence.
pub trait ClassRepository {
    /// Inserts one class with a generated id.
    fn create_class(&self, label: &ClassLabel) -> RepoResult<Class>;
    /// Loads one class by id.
    fn get_class(&self, id: ClassId) -> RepoResult<Option<Class>>;
    /// Loads one class by its normalized `(standard, division)` pair.
    fn find_class(&self, label: &ClassLabel) -> RepoResult<Option<Class>>;
    /// Lists all classes ordered by `standard, division`.
    fn list_classes(&self) -> RepoResult<Vec<Class>>;
    /// Lists every division of one standard ordered by division.
    fn list_classes_by_standard(&self, standard: &str) -> RepoResult<Vec<Class>>;
    /// Overwrites `(standard, division)` and refreshes `updated_at`.
    fn update_class(&self, id: ClassId, label: &ClassLabel) -> RepoResult<Class>;
    /// Removes one class.
    fn delete_class(&self, id: ClassId) -> RepoResult<()>;
}

/// SQLite-backed class repository.
#[derive(Clone, Copy)]
pub struct SqliteClassRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClassRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "classes", CLASS_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl ClassRepository for SqliteClassRepository<'_> {
    fn create_class(&self, label: &ClassLabel) -> RepoResult<Class> {
        let now = now_epoch_ms();
        let class = Class {
            id: Uuid::new_v4(),
            standard: label.standard.clone(),
            division: label.division.clone(),
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            "INSERT INTO classes (
                id,
                standard,
                division,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                class.id.to_string(),
                class.standard.as_str(),
                class.division.as_str(),
                class.created_at,
                class.updated_at,
            ],
        )?;

        Ok(class)
    }

    fn get_class(&self, id: ClassId) -> RepoResult<Option<Class>> {
        self.conn
            .query_row(
                &format!("{CLASS_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                read_class_row,
            )
            .optional()?
            .map(parse_class_row)
            .transpose()
    }

    fn find_class(&self, label: &ClassLabel) -> RepoResult<Option<Class>> {
        self.conn
            .query_row(
                &format!("{CLASS_SELECT_SQL} WHERE standard = ?1 AND division = ?2;"),
                params![label.standard.as_str(), label.division.as_str()],
                read_class_row,
            )
            .optional()?
            .map(parse_class_row)
            .transpose()
    }

    fn list_classes(&self) -> RepoResult<Vec<Class>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CLASS_SELECT_SQL} ORDER BY standard ASC, division ASC;"
        ))?;
        let rows = stmt.query_map([], read_class_row)?;
        collect_classes(rows)
    }

    fn list_classes_by_standard(&self, standard: &str) -> RepoResult<Vec<Class>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CLASS_SELECT_SQL} WHERE standard = ?1 ORDER BY division ASC;"
        ))?;
        let rows = stmt.query_map([standard], read_class_row)?;
        collect_classes(rows)
    }

    fn update_class(&self, id: ClassId, label: &ClassLabel) -> RepoResult<Class> {
        let changed = self.conn.execute(
            "UPDATE classes
             SET
                standard = ?2,
                division = ?3,
                updated_at = ?4
             WHERE id = ?1;",
            params![
                id.to_string(),
                label.standard.as_str(),
                label.division.as_str(),
                now_epoch_ms(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get_class(id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete_class(&self, id: ClassId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM classes WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

/// Raw column values, parsed outside the rusqlite row callback so that
/// invalid data maps to `RepoError::InvalidData`.
struct ClassRow {
    id: String,
    standard: String,
    division: String,
    created_at: i64,
    updated_at: i64,
}

fn read_class_row(row: &Row<'_>) -> rusqlite::Result<ClassRow> {
    Ok(ClassRow {
        id: row.get("id")?,
        standard: row.get("standard")?,
        division: row.get("division")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_class_row(row: ClassRow) -> RepoResult<Class> {
    Ok(Class {
        id: parse_uuid(&row.id, "classes.id")?,
        standard: row.standard,
        division: row.division,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn collect_classes(
    rows: impl Iterator<Item = rusqlite::Result<ClassRow>>,
) -> RepoResult<Vec<Class>> {
    let mut classes = Vec::new();
    for row in rows {
        classes.push(parse_class_row(row?)?);
    }
    Ok(classes)
}
