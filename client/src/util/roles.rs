//! Role constants and the feature permission table.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every dashboard consults this table while rendering to decide which panels
//! and actions a signed-in user may see. The table is static and never
//! mutated; unknown roles or features resolve to "no access".

#[cfg(test)]
#[path = "roles_test.rs"]
mod roles_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// ROLE
// =============================================================================

/// A user role as issued by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    SuperAdmin,
    Doctor,
    Patient,
    Staff,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::SuperAdmin, Role::Doctor, Role::Patient, Role::Staff];

    /// Wire identifier (`"SuperAdmin"`, `"Doctor"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SuperAdmin",
            Self::Doctor => "Doctor",
            Self::Patient => "Patient",
            Self::Staff => "Staff",
        }
    }

    /// Human-readable label for headers and profile menus.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::Doctor => "Doctor",
            Self::Patient => "Patient",
            Self::Staff => "Staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

/// Display name for a raw role string; unknown roles are echoed unchanged.
pub fn role_display_name(raw: &str) -> String {
    raw.parse::<Role>()
        .map_or_else(|_| raw.to_owned(), |role| role.display_name().to_owned())
}

pub fn has_role(user_role: Role, required: Role) -> bool {
    user_role == required
}

pub fn has_any_role(user_role: Role, required: &[Role]) -> bool {
    required.contains(&user_role)
}

/// A single-role user satisfies this only when every required role is theirs.
pub fn has_all_roles(user_role: Role, required: &[Role]) -> bool {
    required.iter().all(|role| *role == user_role)
}

// =============================================================================
// FEATURES
// =============================================================================

/// A UI capability gated by role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    ClinicRegistration,
    DoctorManagement,
    PatientManagement,
    AppointmentManagement,
    MedicalRecords,
    Analytics,
    Settings,
}

impl Feature {
    /// Every feature, in the order dashboards list them.
    pub const ALL: [Feature; 7] = [
        Feature::ClinicRegistration,
        Feature::DoctorManagement,
        Feature::PatientManagement,
        Feature::AppointmentManagement,
        Feature::MedicalRecords,
        Feature::Analytics,
        Feature::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClinicRegistration => "clinic-registration",
            Self::DoctorManagement => "doctor-management",
            Self::PatientManagement => "patient-management",
            Self::AppointmentManagement => "appointment-management",
            Self::MedicalRecords => "medical-records",
            Self::Analytics => "analytics",
            Self::Settings => "settings",
        }
    }

    /// Roles allowed to use this feature.
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::ClinicRegistration | Self::DoctorManagement | Self::Analytics | Self::Settings => {
                &[Role::SuperAdmin]
            }
            Self::PatientManagement => &[Role::SuperAdmin, Role::Doctor, Role::Staff],
            Self::AppointmentManagement | Self::MedicalRecords => &[Role::Doctor, Role::Staff],
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature: {0}")]
pub struct UnknownFeature(pub String);

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| UnknownFeature(s.to_owned()))
    }
}

pub fn can_access_feature(role: Role, feature: Feature) -> bool {
    has_any_role(role, feature.allowed_roles())
}

/// String-keyed lookup used where role and feature come straight off the wire.
pub fn can_access_feature_str(raw_role: &str, raw_feature: &str) -> bool {
    match (raw_role.parse::<Role>(), raw_feature.parse::<Feature>()) {
        (Ok(role), Ok(feature)) => can_access_feature(role, feature),
        _ => false,
    }
}

pub fn accessible_features(role: Role) -> Vec<Feature> {
    Feature::ALL
        .into_iter()
        .filter(|feature| can_access_feature(role, *feature))
        .collect()
}
