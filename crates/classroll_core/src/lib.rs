//! Core domain logic for the class roll registry.
//! This crate is the single source of truth for Class/Student invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, init_console_logging, init_logging, logging_status, LogTarget,
};
pub use model::class::{Class, ClassId, ClassInput, ClassLabel};
pub use model::student::{Student, StudentDetails, StudentId, StudentInput, ValidStudentInput};
pub use model::validation::ValidationError;
pub use repo::class_repo::{ClassRepository, SqliteClassRepository};
pub use repo::student_repo::{SqliteStudentRepository, StudentListQuery, StudentRepository};
pub use repo::{RepoError, RepoResult};
pub use service::class_service::{ClassService, CLASS_NOT_FOUND};
pub use service::pagination::{total_pages, PageRequest, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use service::student_service::{
    ClassRoster, StandardRoster, StudentPage, StudentService, STUDENT_NOT_FOUND,
};
pub use service::{ClassLookup, ErrorKind, RegistryError, RegistryResult, StudentCounter};
