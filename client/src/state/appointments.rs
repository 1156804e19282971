//! Appointment history records and their list filters.
//!
//! DESIGN
//! ======
//! Filtering is a pure function over a borrowed slice so the history panels
//! can recompute the visible rows on every keystroke without cloning records.
//! The filter itself is UI-local state: search text, status, department.

#[cfg(test)]
#[path = "appointments_test.rs"]
mod appointments_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of a past appointment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] =
        [AppointmentStatus::Completed, AppointmentStatus::Cancelled, AppointmentStatus::NoShow];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::NoShow => "No Show",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown appointment status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// Patient details embedded in an appointment row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub name: String,
    pub phone: String,
    pub reason: String,
    pub age: u32,
    pub gender: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: u32,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, 24-hour clock.
    pub time: String,
    /// Minutes.
    pub duration: u32,
    pub status: AppointmentStatus,
    pub patient: PatientSummary,
    pub doctor: String,
    pub notes: String,
    pub diagnosis: String,
    pub department: String,
    #[serde(default)]
    pub staff_notes: String,
}

// =============================================================================
// FILTERS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AppointmentStatus),
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    /// Accepts `all` or any status wire name, matching the dropdown values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" { Ok(Self::All) } else { s.parse().map(Self::Only) }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub search: String,
    pub status: StatusFilter,
    /// `None` means every department.
    pub department: Option<String>,
}

impl AppointmentFilter {
    /// Search hits the patient name and doctor name case-insensitively and the
    /// patient phone verbatim. An empty search matches everything.
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.matches_search(appointment) && self.matches_status(appointment) && self.matches_department(appointment)
    }

    fn matches_search(&self, appointment: &Appointment) -> bool {
        let needle = self.search.to_lowercase();
        appointment.patient.name.to_lowercase().contains(&needle)
            || appointment.patient.phone.contains(self.search.as_str())
            || appointment.doctor.to_lowercase().contains(&needle)
    }

    fn matches_status(&self, appointment: &Appointment) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => appointment.status == status,
        }
    }

    fn matches_department(&self, appointment: &Appointment) -> bool {
        self.department
            .as_deref()
            .map_or(true, |department| appointment.department == department)
    }
}

pub fn filter_appointments<'a>(appointments: &'a [Appointment], filter: &AppointmentFilter) -> Vec<&'a Appointment> {
    appointments.iter().filter(|a| filter.matches(a)).collect()
}

/// Distinct departments, sorted, for the department dropdown.
pub fn departments(appointments: &[Appointment]) -> Vec<&str> {
    let mut names: Vec<&str> = appointments.iter().map(|a| a.department.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// Appointment history panel state.
#[derive(Clone, Debug, Default)]
pub struct AppointmentHistoryState {
    pub items: Vec<Appointment>,
    pub filter: AppointmentFilter,
    pub loading: bool,
    pub error: Option<String>,
}

impl AppointmentHistoryState {
    pub fn visible(&self) -> Vec<&Appointment> {
        filter_appointments(&self.items, &self.filter)
    }
}

// =============================================================================
// SAMPLE DATA
// =============================================================================

/// Clinic-wide history shown before the appointments endpoint exists.
pub fn sample_appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            id: 1,
            date: "2024-03-15".to_owned(),
            time: "09:00".to_owned(),
            duration: 30,
            status: AppointmentStatus::Completed,
            patient: PatientSummary {
                name: "John Smith".to_owned(),
                phone: "+1 (555) 123-4567".to_owned(),
                reason: "Regular checkup".to_owned(),
                age: 35,
                gender: "Male".to_owned(),
            },
            doctor: "Dr. Sarah Wilson".to_owned(),
            notes: "Patient reported feeling better. Blood pressure normal.".to_owned(),
            diagnosis: "Healthy - No issues found".to_owned(),
            department: "General Medicine".to_owned(),
            staff_notes: "Patient arrived on time, vitals taken".to_owned(),
        },
        Appointment {
            id: 2,
            date: "2024-03-15".to_owned(),
            time: "09:30".to_owned(),
            duration: 30,
            status: AppointmentStatus::Completed,
            patient: PatientSummary {
                name: "Sarah Johnson".to_owned(),
                phone: "+1 (555) 234-5678".to_owned(),
                reason: "Follow-up consultation".to_owned(),
                age: 28,
                gender: "Female".to_owned(),
            },
            doctor: "Dr. Michael Brown".to_owned(),
            notes: "Asthma symptoms well controlled. Continue current treatment.".to_owned(),
            diagnosis: "Asthma - Well controlled".to_owned(),
            department: "Pulmonology".to_owned(),
            staff_notes: "Patient checked in early, breathing normal".to_owned(),
        },
        Appointment {
            id: 3,
            date: "2024-03-14".to_owned(),
            time: "14:00".to_owned(),
            duration: 30,
            status: AppointmentStatus::Completed,
            patient: PatientSummary {
                name: "Emily Davis".to_owned(),
                phone: "+1 (555) 456-7890".to_owned(),
                reason: "Routine checkup".to_owned(),
                age: 32,
                gender: "Female".to_owned(),
            },
            doctor: "Dr. James Wilson".to_owned(),
            notes: "Patient reported feeling better. Migraine frequency reduced.".to_owned(),
            diagnosis: "Migraine - Improved".to_owned(),
            department: "Neurology".to_owned(),
            staff_notes: "Patient arrived on time, no complaints".to_owned(),
        },
    ]
}
