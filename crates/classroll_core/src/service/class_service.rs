//! Class registry use-case service.
//!
//! # Responsibility
//! - Create, list, fetch, update and delete classes.
//! - Serve class lookups to the Student registry through `ClassLookup`.
//! - Gate class deletion on the count reported by the Student registry.
//!
//! # Invariants
//! - No two classes share `(standard, division)` after any create/update.
//! - A class with N > 0 students is never deleted; the error reports N.
//! - This service owns class storage only. Student counts arrive through
//!   `StudentCounter`, never from student storage.

use crate::model::class::{Class, ClassId, ClassInput, ClassLabel};
use crate::repo::class_repo::ClassRepository;
use crate::repo::RepoError;
use crate::service::{ClassLookup, RegistryError, RegistryResult, StudentCounter};
use log::{info, warn};

pub const CLASS_NOT_FOUND: &str = "Class not found";

/// Class registry facade over a class repository.
#[derive(Clone)]
pub struct ClassService<C: ClassRepository> {
    classes: C,
}

impl<C: ClassRepository> ClassService<C> {
    /// Creates a service using the provided repository implementation.
    pub fn new(classes: C) -> Self {
        Self { classes }
    }

    /// Creates one class from raw input.
    ///
    /// # Errors
    /// - `Validation` when standard or division is blank.
    /// - `Conflict` when the normalized pair already exists.
    pub fn create_class(&self, input: &ClassInput) -> RegistryResult<Class> {
        let label = input.validate()?;
        if self.classes.find_class(&label)?.is_some() {
            return Err(class_exists(&label));
        }

        match self.classes.create_class(&label) {
            Ok(class) => {
                info!(
                    "event=class_create module=service status=ok class_id={}",
                    class.id
                );
                Ok(class)
            }
            Err(RepoError::UniqueViolation(_)) => {
                warn!("event=class_create module=service status=conflict source=store");
                Err(class_exists(&label))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Lists every class ordered by `standard, division`.
    pub fn list_classes(&self) -> RegistryResult<Vec<Class>> {
        Ok(self.classes.list_classes()?)
    }

    /// Gets one class by id.
    pub fn get_class(&self, id: ClassId) -> RegistryResult<Class> {
        self.classes.get_class(id)?.ok_or_else(class_not_found)
    }

    /// Replaces `(standard, division)` of one class.
    ///
    /// # Errors
    /// - `Validation` when standard or division is blank.
    /// - `NotFound` when `id` is unknown.
    /// - `Conflict` when a different class already owns the target pair.
    pub fn update_class(&self, id: ClassId, input: &ClassInput) -> RegistryResult<Class> {
        let label = input.validate()?;
        self.get_class(id)?;

        if let Some(existing) = self.classes.find_class(&label)? {
            if existing.id != id {
                return Err(class_exists(&label));
            }
        }

        match self.classes.update_class(id, &label) {
            Ok(class) => {
                info!(
                    "event=class_update module=service status=ok class_id={}",
                    class.id
                );
                Ok(class)
            }
            Err(RepoError::UniqueViolation(_)) => {
                warn!("event=class_update module=service status=conflict source=store class_id={id}");
                Err(class_exists(&label))
            }
            Err(RepoError::NotFound(_)) => Err(class_not_found()),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes one class once `students` reports nobody assigned to it.
    ///
    /// # Errors
    /// - `NotFound` when `id` is unknown.
    /// - `PreconditionFailed` with the exact student count otherwise blocked.
    pub fn delete_class<N: StudentCounter>(
        &self,
        id: ClassId,
        students: &N,
    ) -> RegistryResult<()> {
        self.get_class(id)?;

        let dependents = students.count_by_class(id)?;
        if dependents > 0 {
            return Err(RegistryError::PreconditionFailed { dependents });
        }

        match self.classes.delete_class(id) {
            Ok(()) => {
                info!("event=class_delete module=service status=ok class_id={id}");
                Ok(())
            }
            Err(RepoError::ForeignKeyViolation) => {
                // A student was assigned between the count and the delete.
                warn!("event=class_delete module=service status=blocked source=store class_id={id}");
                let dependents = students.count_by_class(id)?.max(1);
                Err(RegistryError::PreconditionFailed { dependents })
            }
            Err(RepoError::NotFound(_)) => Err(class_not_found()),
            Err(err) => Err(err.into()),
        }
    }
}

impl<C: ClassRepository> ClassLookup for ClassService<C> {
    fn find_by_id(&self, id: ClassId) -> RegistryResult<Option<Class>> {
        Ok(self.classes.get_class(id)?)
    }

    fn find_by_label(&self, label: &ClassLabel) -> RegistryResult<Option<Class>> {
        Ok(self.classes.find_class(label)?)
    }

    fn list_by_standard(&self, standard: &str) -> RegistryResult<Vec<Class>> {
        Ok(self.classes.list_classes_by_standard(standard)?)
    }
}

fn class_not_found() -> RegistryError {
    RegistryError::NotFound(CLASS_NOT_FOUND.to_string())
}

fn class_exists(label: &ClassLabel) -> RegistryError {
    RegistryError::Conflict(format!("Class {label} already exists"))
}

#[cfg(test)]
mod tests {
    use super::ClassService;
    use crate::model::class::{Class, ClassId, ClassInput, ClassLabel};
    use crate::repo::class_repo::ClassRepository;
    use crate::repo::{RepoError, RepoResult};
    use crate::service::{RegistryError, RegistryResult, StudentCounter};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use uuid::Uuid;

    /// Write outcome forced by `RacyClasses`.
    #[derive(Clone, Copy)]
    enum WriteFailure {
        Unique,
        ForeignKey,
        Missing,
    }

    impl WriteFailure {
        fn into_error(self, id: ClassId) -> RepoError {
            match self {
                Self::Unique => RepoError::UniqueViolation("classes.standard".to_string()),
                Self::ForeignKey => RepoError::ForeignKeyViolation,
                Self::Missing => RepoError::NotFound(id),
            }
        }
    }

    /// Class store whose pre-checks pass but whose writes lose a race.
    struct RacyClasses {
        stored: Class,
        failure: WriteFailure,
    }

    impl RacyClasses {
        fn new(failure: WriteFailure) -> Self {
            Self {
                stored: Class {
                    id: Uuid::new_v4(),
                    standard: "10".to_string(),
                    division: "A".to_string(),
                    created_at: 1,
                    updated_at: 1,
                },
                failure,
            }
        }
    }

    impl ClassRepository for RacyClasses {
        fn create_class(&self, _label: &ClassLabel) -> RepoResult<Class> {
            Err(self.failure.into_error(Uuid::new_v4()))
        }

        fn get_class(&self, id: ClassId) -> RepoResult<Option<Class>> {
            Ok(Some(self.stored.clone()).filter(|class| class.id == id))
        }

        fn find_class(&self, _label: &ClassLabel) -> RepoResult<Option<Class>> {
            Ok(None)
        }

        fn list_classes(&self) -> RepoResult<Vec<Class>> {
            Ok(vec![self.stored.clone()])
        }

        fn list_classes_by_standard(&self, standard: &str) -> RepoResult<Vec<Class>> {
            Ok(self.list_classes()?
                .into_iter()
                .filter(|class| class.standard == standard)
                .collect())
        }

        fn update_class(&self, id: ClassId, _label: &ClassLabel) -> RepoResult<Class> {
            Err(self.failure.into_error(id))
        }

        fn delete_class(&self, id: ClassId) -> RepoResult<()> {
            Err(self.failure.into_error(id))
        }
    }

    /// Reports queued counts in order, repeating the last one.
    struct ScriptedCounter {
        counts: RefCell<VecDeque<u64>>,
    }

    impl ScriptedCounter {
        fn new(counts: &[u64]) -> Self {
            Self {
                counts: RefCell::new(counts.iter().copied().collect()),
            }
        }
    }

    impl StudentCounter for ScriptedCounter {
        fn count_by_class(&self, _class_id: ClassId) -> RegistryResult<u64> {
            let mut counts = self.counts.borrow_mut();
            let next = if counts.len() > 1 {
                counts.pop_front()
            } else {
                counts.front().copied()
            };
            Ok(next.unwrap_or_default())
        }
    }

    #[test]
    fn create_losing_unique_race_is_conflict() {
        let service = ClassService::new(RacyClasses::new(WriteFailure::Unique));
        let err = service
            .create_class(&ClassInput::new(" 10 ", "a"))
            .unwrap_err();
        assert!(matches!(
            &err,
            RegistryError::Conflict(message) if message == "Class 10-A already exists"
        ));
    }

    #[test]
    fn update_losing_unique_race_is_conflict() {
        let repo = RacyClasses::new(WriteFailure::Unique);
        let id = repo.stored.id;
        let service = ClassService::new(repo);
        let err = service
            .update_class(id, &ClassInput::new("9", "b"))
            .unwrap_err();
        assert!(matches!(
            &err,
            RegistryError::Conflict(message) if message == "Class 9-B already exists"
        ));
    }

    #[test]
    fn update_of_class_removed_mid_call_is_not_found() {
        let repo = RacyClasses::new(WriteFailure::Missing);
        let id = repo.stored.id;
        let err = ClassService::new(repo)
            .update_class(id, &ClassInput::new("9", "B"))
            .unwrap_err();
        assert!(matches!(&err, RegistryError::NotFound(message) if message == "Class not found"));
    }

    #[test]
    fn delete_reports_counter_dependents_without_touching_store() {
        let repo = RacyClasses::new(WriteFailure::Missing);
        let id = repo.stored.id;
        let err = ClassService::new(repo)
            .delete_class(id, &ScriptedCounter::new(&[3]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::PreconditionFailed { dependents: 3 }));
    }

    #[test]
    fn delete_blocked_by_store_reports_recount() {
        let repo = RacyClasses::new(WriteFailure::ForeignKey);
        let id = repo.stored.id;
        let err = ClassService::new(repo)
            .delete_class(id, &ScriptedCounter::new(&[0, 2]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::PreconditionFailed { dependents: 2 }));
    }

    #[test]
    fn delete_blocked_by_store_reports_at_least_one_dependent() {
        let repo = RacyClasses::new(WriteFailure::ForeignKey);
        let id = repo.stored.id;
        let err = ClassService::new(repo)
            .delete_class(id, &ScriptedCounter::new(&[0]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::PreconditionFailed { dependents: 1 }));
        assert_eq!(
            err.message(),
            "Cannot delete class. 1 student(s) are assigned to this class"
        );
    }

    #[test]
    fn delete_of_class_removed_mid_call_is_not_found() {
        let repo = RacyClasses::new(WriteFailure::Missing);
        let id = repo.stored.id;
        let err = ClassService::new(repo)
            .delete_class(id, &ScriptedCounter::new(&[0]))
            .unwrap_err();
        assert!(matches!(&err, RegistryError::NotFound(message) if message == "Class not found"));
    }

    #[test]
    fn delete_of_unknown_class_is_not_found_before_counting() {
        let err = ClassService::new(RacyClasses::new(WriteFailure::ForeignKey))
            .delete_class(Uuid::new_v4(), &ScriptedCounter::new(&[5]))
            .unwrap_err();
        assert!(matches!(&err, RegistryError::NotFound(message) if message == "Class not found"));
    }
}
