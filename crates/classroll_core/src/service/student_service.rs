//! Student registry use-case service.
//!
//! # Responsibility
//! - Create, list, fetch, reassign and delete students.
//! - Resolve each student's class at read time for responses.
//! - Provide class- and standard-filtered rosters.
//!
//! # Invariants
//! - A student is only created or reassigned against an existing class.
//! - Roll numbers are unique across all students.
//! - Every list is ordered by `name ASC, id ASC`.
//! - Class fields are looked up by id, never copied into student storage.
//! - Classes are read through the Class registry (`ClassLookup`), never from
//!   class storage.

use crate::model::class::{normalize_standard, Class, ClassId, ClassInput, ClassLabel};
use crate::model::student::{Student, StudentDetails, StudentId, StudentInput};
use crate::repo::student_repo::{StudentListQuery, StudentRepository};
use crate::repo::RepoError;
use crate::service::class_service::CLASS_NOT_FOUND;
use crate::service::pagination::{total_pages, PageRequest};
use crate::service::{ClassLookup, RegistryError, RegistryResult, StudentCounter};
use log::{info, warn};
use std::collections::HashMap;
use uuid::Uuid;

pub const STUDENT_NOT_FOUND: &str = "Student not found";
const ROLL_NO_TAKEN: &str = "Student with this roll number already exists";

/// One page of students plus the counters needed to render pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentPage {
    pub items: Vec<StudentDetails>,
    /// Total students across all pages.
    pub total: u64,
    /// Effective 1-based page number.
    pub page: u32,
    /// Effective page size.
    pub limit: u32,
    /// `ceil(total / limit)`.
    pub total_pages: u64,
}

/// Students of one class, tagged with the class label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRoster {
    /// `standard-division`, e.g. `10-A`.
    pub label: String,
    pub students: Vec<StudentDetails>,
}

/// Students of every division of one standard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardRoster {
    pub standard: String,
    pub students: Vec<StudentDetails>,
}

/// Student registry facade over a student repository and the Class registry.
pub struct StudentService<S: StudentRepository, L: ClassLookup> {
    students: S,
    classes: L,
}

impl<S: StudentRepository, L: ClassLookup> StudentService<S, L> {
    /// Creates a service over `students` that resolves classes through `classes`.
    pub fn new(students: S, classes: L) -> Self {
        Self { students, classes }
    }

    /// Creates one student assigned to an existing class.
    ///
    /// # Errors
    /// - `Validation` when any field fails its constraint.
    /// - `NotFound` (`Class not found`) when the class id is unknown or malformed.
    /// - `Conflict` when the roll number is taken.
    pub fn create_student(&self, input: &StudentInput) -> RegistryResult<StudentDetails> {
        let valid = input.validate()?;
        let class_id = Uuid::parse_str(&valid.class_ref).map_err(|_| class_not_found())?;
        let class = self
            .classes
            .find_by_id(class_id)?
            .ok_or_else(class_not_found)?;

        if self.students.find_by_roll_no(&valid.roll_no)?.is_some() {
            return Err(RegistryError::Conflict(ROLL_NO_TAKEN.to_string()));
        }

        match self.students.create_student(&valid, class.id) {
            Ok(student) => {
                info!(
                    "event=student_create module=service status=ok student_id={} class_id={}",
                    student.id, class.id
                );
                Ok(StudentDetails::new(student, class))
            }
            Err(RepoError::UniqueViolation(_)) => {
                warn!("event=student_create module=service status=conflict source=store");
                Err(RegistryError::Conflict(ROLL_NO_TAKEN.to_string()))
            }
            Err(RepoError::ForeignKeyViolation) => {
                warn!("event=student_create module=service status=class_missing source=store");
                Err(class_not_found())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Lists one page of students ordered by name.
    pub fn list_students(&self, page: PageRequest) -> RegistryResult<StudentPage> {
        let total = self.students.count_students()?;
        let query = StudentListQuery {
            limit: page.limit,
            offset: page.offset(),
        };
        let students = self.students.list_students(&query)?;
        let items = self.resolve_all(students, HashMap::new())?;

        Ok(StudentPage {
            items,
            total,
            page: page.page,
            limit: page.limit,
            total_pages: total_pages(total, page.limit),
        })
    }

    /// Gets one student with its class resolved.
    pub fn get_student(&self, id: StudentId) -> RegistryResult<StudentDetails> {
        let student = self.require_student(id)?;
        let class = self.resolve_class(&student)?;
        Ok(StudentDetails::new(student, class))
    }

    /// Moves one student to the class named by `(standard, division)`.
    ///
    /// # Errors
    /// - `Validation` when standard or division is blank.
    /// - `NotFound` (`Student not found`) when the student is unknown.
    /// - `NotFound` (`Class {standard}-{division} not found`) when no such class exists.
    pub fn update_student_class(
        &self,
        id: StudentId,
        input: &ClassInput,
    ) -> RegistryResult<StudentDetails> {
        let label = input.validate()?;
        self.require_student(id)?;
        let class = self
            .classes
            .find_by_label(&label)?
            .ok_or_else(|| label_not_found(&label))?;

        match self.students.update_student_class(id, class.id) {
            Ok(student) => {
                info!(
                    "event=student_reassign module=service status=ok student_id={} class_id={}",
                    student.id, class.id
                );
                Ok(StudentDetails::new(student, class))
            }
            Err(RepoError::NotFound(_)) => Err(student_not_found()),
            Err(RepoError::ForeignKeyViolation) => {
                warn!("event=student_reassign module=service status=class_missing source=store student_id={id}");
                Err(label_not_found(&label))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes one student; classes are never affected.
    pub fn delete_student(&self, id: StudentId) -> RegistryResult<()> {
        match self.students.delete_student(id) {
            Ok(()) => {
                info!("event=student_delete module=service status=ok student_id={id}");
                Ok(())
            }
            Err(RepoError::NotFound(_)) => Err(student_not_found()),
            Err(err) => Err(err.into()),
        }
    }

    /// Lists the students of one class ordered by name.
    ///
    /// # Errors
    /// - `NotFound` (`Class {standard}-{division} not found`) when no such class exists.
    pub fn list_by_class(&self, standard: &str, division: &str) -> RegistryResult<ClassRoster> {
        let label = ClassLabel::normalized(standard, division);
        let class = self
            .classes
            .find_by_label(&label)?
            .ok_or_else(|| label_not_found(&label))?;

        let students = self.students.list_by_classes(&[class.id])?;
        let known = HashMap::from([(class.id, class)]);
        Ok(ClassRoster {
            label: label.to_string(),
            students: self.resolve_all(students, known)?,
        })
    }

    /// Lists the students of every division of one standard ordered by name.
    ///
    /// # Errors
    /// - `NotFound` (`No classes found for standard {standard}`) when the standard has no classes.
    pub fn list_by_standard(&self, standard: &str) -> RegistryResult<StandardRoster> {
        let standard = normalize_standard(standard);
        let classes = self.classes.list_by_standard(&standard)?;
        if classes.is_empty() {
            return Err(RegistryError::NotFound(format!(
                "No classes found for standard {standard}"
            )));
        }

        let class_ids = classes.iter().map(|class| class.id).collect::<Vec<_>>();
        let students = self.students.list_by_classes(&class_ids)?;
        let known = classes
            .into_iter()
            .map(|class| (class.id, class))
            .collect::<HashMap<_, _>>();

        Ok(StandardRoster {
            standard,
            students: self.resolve_all(students, known)?,
        })
    }

    fn require_student(&self, id: StudentId) -> RegistryResult<Student> {
        self.students
            .get_student(id)?
            .ok_or_else(student_not_found)
    }

    fn resolve_class(&self, student: &Student) -> RegistryResult<Class> {
        self.classes
            .find_by_id(student.class_id)?
            .ok_or_else(|| dangling_reference(student))
    }

    /// Joins each student with its class, looking each class up at most once.
    fn resolve_all(
        &self,
        students: Vec<Student>,
        mut known: HashMap<ClassId, Class>,
    ) -> RegistryResult<Vec<StudentDetails>> {
        let mut resolved = Vec::with_capacity(students.len());
        for student in students {
            let class = match known.get(&student.class_id) {
                Some(class) => class.clone(),
                None => {
                    let class = self.resolve_class(&student)?;
                    known.insert(class.id, class.clone());
                    class
                }
            };
            resolved.push(StudentDetails::new(student, class));
        }
        Ok(resolved)
    }
}

impl<S: StudentRepository, L: ClassLookup> StudentCounter for StudentService<S, L> {
    /// Counts students assigned to one class.
    fn count_by_class(&self, class_id: ClassId) -> RegistryResult<u64> {
        Ok(self.students.count_by_class(class_id)?)
    }
}

fn class_not_found() -> RegistryError {
    RegistryError::NotFound(CLASS_NOT_FOUND.to_string())
}

fn student_not_found() -> RegistryError {
    RegistryError::NotFound(STUDENT_NOT_FOUND.to_string())
}

fn label_not_found(label: &ClassLabel) -> RegistryError {
    RegistryError::NotFound(format!("Class {label} not found"))
}

fn dangling_reference(student: &Student) -> RegistryError {
    RegistryError::Store(RepoError::InvalidData(format!(
        "student {} references missing class {}",
        student.id, student.class_id
    )))
}
