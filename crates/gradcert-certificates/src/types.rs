//! Certificate view types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One course line on a certificate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateCourse {
    pub course_number: u32,
    pub course_name: String,
    pub session_type: String,
}

/// Public certificate view returned by the resolver
///
/// Carries exactly what the certificate display needs; internal timestamps
/// and the artifact reference are deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateView {
    pub id: Uuid,
    pub student_code: String,
    pub name: String,
    pub profile_photo_url: Option<String>,
    pub entry_session: String,
    pub graduation_date: Option<NaiveDate>,
    pub courses: Vec<CertificateCourse>,
}
