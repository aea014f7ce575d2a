//! RocksDB column family definitions.

/// Course catalog: course_id → Course
pub const CF_COURSES: &str = "courses";

/// Course number index: course_number → course_id
///
/// Uniqueness guard for number allocation. An existing entry for a freshly
/// computed number means two allocations raced; the loser gets a duplicate
/// error instead of a second course with the same number.
pub const CF_COURSE_NUMBERS: &str = "course_numbers";

/// Student records: id → Student
pub const CF_STUDENTS: &str = "students";

/// Staff-assigned external code index: student_code → id
pub const CF_STUDENT_CODES: &str = "student_codes";

/// Enrollment rows: (student_id, course_id) → Enrollment
pub const CF_ENROLLMENTS: &str = "enrollments";

/// Enrollments by course index: (course_id, student_id) → student_id
///
/// Supports the course-side cascade without scanning the whole ledger.
pub const CF_ENROLLMENTS_BY_COURSE: &str = "enrollments_by_course";

/// Get all column family names
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        CF_COURSES,
        CF_COURSE_NUMBERS,
        CF_STUDENTS,
        CF_STUDENT_CODES,
        CF_ENROLLMENTS,
        CF_ENROLLMENTS_BY_COURSE,
    ]
}
