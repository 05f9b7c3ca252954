//! The semester list owned by the front-end.
//!
//! A [`SemesterBook`] holds the user's semesters in chronological order
//! and hands them to the aggregator whenever results are requested.

use crate::analysis;
use crate::models::{EntryMode, QuickTotals, ResultRow, Semester, SemesterId, Subject};
use thiserror::Error;
use tracing::debug;

/// Errors from editing a [`SemesterBook`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("no semester with id {0}")]
    UnknownSemester(SemesterId),

    #[error("semester {semester} has no subject at position {index}")]
    UnknownSubject { semester: SemesterId, index: usize },
}

/// Ordered, editable list of semesters.
#[derive(Debug, Clone, Default)]
pub struct SemesterBook {
    semesters: Vec<Semester>,
    next_id: u32,
}

impl SemesterBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty semester and return its id.
    pub fn add_semester(&mut self, name: impl Into<String>, mode: EntryMode) -> SemesterId {
        let id = SemesterId(self.next_id);
        self.next_id += 1;

        let mut semester = Semester::quick(id, name, 0.0, 0.0);
        semester.mode = mode;
        debug!("Added semester {} '{}' ({})", id, semester.name, mode);
        self.semesters.push(semester);

        id
    }

    /// Remove a semester, returning it.
    #[allow(dead_code)] // Editing API; the CLI only appends
    pub fn remove_semester(&mut self, id: SemesterId) -> Result<Semester, BookError> {
        let index = self.position(id)?;
        Ok(self.semesters.remove(index))
    }

    #[allow(dead_code)] // Editing API; the CLI only appends
    pub fn rename_semester(&mut self, id: SemesterId, name: impl Into<String>) -> Result<(), BookError> {
        self.get_mut(id)?.name = name.into();
        Ok(())
    }

    /// Switch the input mode. Data entered for the other mode is kept.
    #[allow(dead_code)] // Editing API; the CLI only appends
    pub fn set_mode(&mut self, id: SemesterId, mode: EntryMode) -> Result<(), BookError> {
        self.get_mut(id)?.mode = mode;
        Ok(())
    }

    pub fn set_quick_totals(
        &mut self,
        id: SemesterId,
        credits: f64,
        credit_points: f64,
    ) -> Result<(), BookError> {
        self.get_mut(id)?.quick = QuickTotals {
            credits,
            credit_points,
        };
        Ok(())
    }

    /// Append a subject and return its position in the semester.
    pub fn add_subject(&mut self, id: SemesterId, subject: Subject) -> Result<usize, BookError> {
        let semester = self.get_mut(id)?;
        semester.subjects.push(subject);
        Ok(semester.subjects.len() - 1)
    }

    #[allow(dead_code)] // Editing API; the CLI only appends
    pub fn remove_subject(&mut self, id: SemesterId, index: usize) -> Result<Subject, BookError> {
        let semester = self.get_mut(id)?;
        if index >= semester.subjects.len() {
            return Err(BookError::UnknownSubject {
                semester: id,
                index,
            });
        }
        Ok(semester.subjects.remove(index))
    }

    /// Move a semester to `new_index`, clamped to the end of the list.
    #[allow(dead_code)] // Editing API; the CLI only appends
    pub fn move_semester(&mut self, id: SemesterId, new_index: usize) -> Result<(), BookError> {
        let index = self.position(id)?;
        let semester = self.semesters.remove(index);
        let new_index = new_index.min(self.semesters.len());
        self.semesters.insert(new_index, semester);
        Ok(())
    }

    #[allow(dead_code)] // Editing API; the CLI only appends
    pub fn get(&self, id: SemesterId) -> Option<&Semester> {
        self.semesters.iter().find(|s| s.id == id)
    }

    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    pub fn len(&self) -> usize {
        self.semesters.len()
    }

    #[allow(dead_code)] // Editing API; the CLI only appends
    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty()
    }

    /// Remove all semesters. Ids are not reused.
    pub fn clear(&mut self) {
        self.semesters.clear();
    }

    /// Recompute the result rows from the current semesters.
    pub fn results(&self) -> Vec<ResultRow> {
        analysis::aggregate(&self.semesters)
    }

    fn position(&self, id: SemesterId) -> Result<usize, BookError> {
        self.semesters
            .iter()
            .position(|s| s.id == id)
            .ok_or(BookError::UnknownSemester(id))
    }

    fn get_mut(&mut self, id: SemesterId) -> Result<&mut Semester, BookError> {
        self.semesters
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(BookError::UnknownSemester(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(book: &SemesterBook) -> Vec<&str> {
        book.semesters().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_add_and_results() {
        let mut book = SemesterBook::new();
        assert!(book.is_empty());
        assert!(book.results().is_empty());

        let first = book.add_semester("Semester 1", EntryMode::Quick);
        book.set_quick_totals(first, 23.0, 170.0).unwrap();

        let second = book.add_semester("Semester 2", EntryMode::Detailed);
        book.add_subject(second, Subject::new("A", 4.0, 10.0)).unwrap();
        book.add_subject(second, Subject::new("B", 3.0, 9.0)).unwrap();

        assert_ne!(first, second);
        assert_eq!(book.len(), 2);

        let rows = book.results();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].credits, 7.0);
        assert_eq!(rows[1].cumulative_credits, 30.0);
        assert_eq!(rows[1].cumulative_credit_points, 237.0);
    }

    #[test]
    fn test_results_follow_edits() {
        let mut book = SemesterBook::new();
        let id = book.add_semester("S", EntryMode::Detailed);
        book.add_subject(id, Subject::new("A", 4.0, 10.0)).unwrap();
        book.add_subject(id, Subject::new("B", 4.0, 6.0)).unwrap();
        assert_eq!(book.results()[0].sgpa, 8.0);

        let removed = book.remove_subject(id, 1).unwrap();
        assert_eq!(removed.name, "B");
        assert_eq!(book.results()[0].sgpa, 10.0);

        assert_eq!(
            book.remove_subject(id, 5),
            Err(BookError::UnknownSubject {
                semester: id,
                index: 5
            })
        );
    }

    #[test]
    fn test_mode_switch_keeps_data() {
        let mut book = SemesterBook::new();
        let id = book.add_semester("S", EntryMode::Quick);
        book.set_quick_totals(id, 20.0, 150.0).unwrap();
        book.add_subject(id, Subject::new("A", 2.0, 9.0)).unwrap();
        assert_eq!(book.results()[0].credits, 20.0);

        book.set_mode(id, EntryMode::Detailed).unwrap();
        assert_eq!(book.results()[0].credits, 2.0);

        book.set_mode(id, EntryMode::Quick).unwrap();
        assert_eq!(book.results()[0].credit_points, 150.0);
    }

    #[test]
    fn test_move_and_remove() {
        let mut book = SemesterBook::new();
        let a = book.add_semester("A", EntryMode::Quick);
        let b = book.add_semester("B", EntryMode::Quick);
        let c = book.add_semester("C", EntryMode::Quick);

        book.move_semester(c, 0).unwrap();
        assert_eq!(names(&book), vec!["C", "A", "B"]);

        book.move_semester(c, 99).unwrap();
        assert_eq!(names(&book), vec!["A", "B", "C"]);

        book.rename_semester(b, "Bee").unwrap();
        let removed = book.remove_semester(a).unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(names(&book), vec!["Bee", "C"]);

        assert_eq!(book.remove_semester(a), Err(BookError::UnknownSemester(a)));
        assert!(book.get(a).is_none());
        assert_eq!(book.get(b).map(|s| s.name.as_str()), Some("Bee"));
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut book = SemesterBook::new();
        let first = book.add_semester("A", EntryMode::Quick);
        book.clear();
        assert!(book.is_empty());

        let second = book.add_semester("B", EntryMode::Quick);
        assert_ne!(first, second);
        assert_eq!(
            book.set_mode(first, EntryMode::Detailed),
            Err(BookError::UnknownSemester(first))
        );
    }
}
