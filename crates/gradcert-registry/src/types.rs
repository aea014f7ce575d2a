//! Registry type definitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a course's sessions are delivered
///
/// Serialized names match the catalog values staff already use. Storage is
/// unaffected: bincode encodes variants by index.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionType {
    #[serde(rename = "Theoretical")]
    Theory = 0x01,
    #[serde(rename = "Theory and Practical")]
    TheoryAndPractical = 0x02,
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionType::Theory => "Theoretical",
            SessionType::TheoryAndPractical => "Theory and Practical",
        };
        write!(f, "{}", s)
    }
}

/// Course record
///
/// `course_number` is the staff-visible ordinal assigned at creation. It is
/// allocated by the registry, never by the caller, and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub course_id: Uuid,
    pub course_number: u32,
    pub course_name: String,
    pub session_type: SessionType,
}

/// Student record
///
/// `id` is the public verification identifier: the certificate URL and the
/// rendered artifact are both derived from it, so it is generated once at
/// registration and never changes or gets reused. `student_code` is the
/// staff-assigned external code shown on the certificate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: Uuid,
    pub student_code: String,
    pub name: String,
    pub profile_photo_url: Option<String>,
    pub entry_session: String,
    pub graduation_date: Option<NaiveDate>,
    pub verification_artifact_url: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Enrollment row linking one student to one course
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enrollment {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: u64,
}

/// Fields for registering a new student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub student_code: String,
    pub name: String,
    pub entry_session: String,
    pub graduation_date: Option<NaiveDate>,
}

/// Partial update of a student record
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub student_code: Option<String>,
    pub name: Option<String>,
    pub entry_session: Option<String>,
    pub graduation_date: Option<NaiveDate>,
}

/// Partial update of a course record
///
/// `course_number` is deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseUpdate {
    pub course_name: Option<String>,
    pub session_type: Option<SessionType>,
}

/// Current Unix time in seconds
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
