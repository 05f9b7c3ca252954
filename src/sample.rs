//! Built-in example dataset.

use crate::book::SemesterBook;
use crate::models::EntryMode;
use tracing::debug;

/// Quick-mode totals of the example semesters: (name, credits, credit points).
pub const EXAMPLE_SEMESTERS: [(&str, f64, f64); 4] = [
    ("Semester 1", 23.0, 170.0),
    ("Semester 2", 23.0, 200.0),
    ("Semester 3", 22.0, 208.0),
    ("Semester 4", 22.0, 192.0),
];

impl SemesterBook {
    /// Replace the contents of the book with the example dataset.
    pub fn load_example(&mut self) {
        self.clear();
        for (name, credits, credit_points) in EXAMPLE_SEMESTERS {
            let id = self.add_semester(name, EntryMode::Quick);
            // The id was just allocated, so it is always present.
            let _ = self.set_quick_totals(id, credits, credit_points);
        }
        debug!("Loaded {} example semesters", EXAMPLE_SEMESTERS.len());
    }
}
