//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, pagination and class-filtered queries over `students`.
//! - Expose per-class counts used by the class delete gate.
//!
//! # Invariants
//! - `roll_no` uniqueness is enforced by a `UNIQUE` constraint.
//! - `class_id` must reference an existing class (`FOREIGN KEY`); a dangling
//!   reference surfaces as `RepoError::ForeignKeyViolation`.
//! - Every list is deterministic: `name ASC, id ASC`.

use crate::db::now_epoch_ms;
use crate::model::class::ClassId;
use crate::model::student::{Student, StudentId, ValidStudentInput};
use crate::repo::{count_to_u64, ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    roll_no,
    mobile_no,
    class_id,
    created_at,
    updated_at
FROM students";

const STUDENT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "roll_no",
    "mobile_no",
    "class_id",
    "created_at",
    "updated_at",
];

/// Window options for listing students.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentListQuery {
    /// Maximum rows to return.
    pub limit: u32,
    /// Number of rows to skip.
    pub offset: u64,
}

/// Repository interface for student persistence.
pub trait StudentRepository {
    /// Inserts one student with a generated id.
    fn create_student(&self, input: &ValidStudentInput, class_id: ClassId)
        -> RepoResult<Student>;
    /// Loads one student by id.
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Loads one student by roll number.
    fn find_by_roll_no(&self, roll_no: &str) -> RepoResult<Option<Student>>;
    /// Lists one window of all students.
    fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>>;
    /// Counts all students.
    fn count_students(&self) -> RepoResult<u64>;
    /// Counts students referencing one class.
    fn count_by_class(&self, class_id: ClassId) -> RepoResult<u64>;
    /// Lists students of any of the given classes.
    fn list_by_classes(&self, class_ids: &[ClassId]) -> RepoResult<Vec<Student>>;
    /// Points one student at another class.
    fn update_student_class(&self, id: StudentId, class_id: ClassId) -> RepoResult<Student>;
    /// Removes one student.
    fn delete_student(&self, id: StudentId) -> RepoResult<()>;
}

/// SQLite-backed student repository.
#[derive(Clone, Copy)]
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "students", STUDENT_COLUMNS)?;
        Ok(Self { conn })
    }

    fn load_one(&self, where_sql: &str, value: String) -> RepoResult<Option<Student>> {
        self.conn
            .query_row(
                &format!("{STUDENT_SELECT_SQL} WHERE {where_sql};"),
                [value],
                read_student_row,
            )
            .optional()?
            .map(parse_student_row)
            .transpose()
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn create_student(
        &self,
        input: &ValidStudentInput,
        class_id: ClassId,
    ) -> RepoResult<Student> {
        let now = now_epoch_ms();
        let student = Student {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            roll_no: input.roll_no.clone(),
            mobile_no: input.mobile_no.clone(),
            class_id,
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            "INSERT INTO students (
                id,
                name,
                roll_no,
                mobile_no,
                class_id,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                student.id.to_string(),
                student.name.as_str(),
                student.roll_no.as_str(),
                student.mobile_no.as_str(),
                student.class_id.to_string(),
                student.created_at,
                student.updated_at,
            ],
        )?;

        Ok(student)
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.load_one("id = ?1", id.to_string())
    }

    fn find_by_roll_no(&self, roll_no: &str) -> RepoResult<Option<Student>> {
        self.load_one("roll_no = ?1", roll_no.to_string())
    }

    fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL} ORDER BY name ASC, id ASC LIMIT ?1 OFFSET ?2;"
        ))?;
        let rows = stmt.query_map(
            params![
                i64::from(query.limit),
                i64::try_from(query.offset).unwrap_or(i64::MAX)
            ],
            read_student_row,
        )?;
        collect_students(rows)
    }

    fn count_students(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students;", [], |row| row.get(0))?;
        count_to_u64(total, "students")
    }

    fn count_by_class(&self, class_id: ClassId) -> RepoResult<u64> {
        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM students WHERE class_id = ?1;",
            [class_id.to_string()],
            |row| row.get(0),
        )?;
        count_to_u64(total, "students.class_id")
    }

    fn list_by_classes(&self, class_ids: &[ClassId]) -> RepoResult<Vec<Student>> {
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; class_ids.len()].join(", ");
        let sql = format!(
            "{STUDENT_SELECT_SQL} WHERE class_id IN ({placeholders}) ORDER BY name ASC, id ASC;"
        );
        let bind_values = class_ids
            .iter()
            .map(|id| Value::Text(id.to_string()))
            .collect::<Vec<_>>();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind_values), read_student_row)?;
        collect_students(rows)
    }

    fn update_student_class(&self, id: StudentId, class_id: ClassId) -> RepoResult<Student> {
        let changed = self.conn.execute(
            "UPDATE students
             SET
                class_id = ?2,
                updated_at = ?3
             WHERE id = ?1;",
            params![id.to_string(), class_id.to_string(), now_epoch_ms()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get_student(id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

struct StudentRow {
    id: String,
    name: String,
    roll_no: String,
    mobile_no: String,
    class_id: String,
    created_at: i64,
    updated_at: i64,
}

fn read_student_row(row: &Row<'_>) -> rusqlite::Result<StudentRow> {
    Ok(StudentRow {
        id: row.get("id")?,
        name: row.get("name")?,
        roll_no: row.get("roll_no")?,
        mobile_no: row.get("mobile_no")?,
        class_id: row.get("class_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_student_row(row: StudentRow) -> RepoResult<Student> {
    Ok(Student {
        id: parse_uuid(&row.id, "students.id")?,
        name: row.name,
        roll_no: row.roll_no,
        mobile_no: row.mobile_no,
        class_id: parse_uuid(&row.class_id, "students.class_id")?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn collect_students(
    rows: impl Iterator<Item = rusqlite::Result<StudentRow>>,
) -> RepoResult<Vec<Student>> {
    let mut students = Vec::new();
    for row in rows {
        students.push(parse_student_row(row?)?);
    }
    Ok(students)
}
