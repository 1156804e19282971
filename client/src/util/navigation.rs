//! Role landing routes, header menus, and per-panel sidebar configuration.
//!
//! SYSTEM CONTEXT
//! ==============
//! After login the client sends each role to its own dashboard and renders a
//! role-specific menu. Panels (`/patient`, `/doctor`, `/clinic`,
//! `/superadmin`) additionally carry a sidebar with icons and nested entries.
//!
//! Unknown role strings resolve to [`FALLBACK_DASHBOARD_ROUTE`] and an empty
//! menu rather than an error.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

use serde::Serialize;

use super::roles::Role;

pub const LOGIN_ROUTE: &str = "/login";
pub const FALLBACK_DASHBOARD_ROUTE: &str = "/dashboard";

/// A labelled link in a menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

const fn item(label: &'static str, path: &'static str) -> NavItem {
    NavItem { label, path }
}

// =============================================================================
// ROLE LOOKUPS
// =============================================================================

pub fn dashboard_route(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "/superadmin/dashboard",
        Role::Doctor => "/doctor/dashboard",
        Role::Patient => "/patient/dashboard",
        Role::Staff => "/staff/dashboard",
    }
}

pub fn dashboard_route_str(raw_role: &str) -> &'static str {
    raw_role.parse::<Role>().map_or(FALLBACK_DASHBOARD_ROUTE, dashboard_route)
}

const SUPER_ADMIN_MENU: &[NavItem] = &[
    item("Dashboard", "/superadmin/dashboard"),
    item("Clinics", "/superadmin/clinics"),
    item("Doctors", "/superadmin/doctors"),
    item("Analytics", "/superadmin/analytics"),
    item("Settings", "/superadmin/settings"),
];

const DOCTOR_MENU: &[NavItem] = &[
    item("Dashboard", "/doctor/dashboard"),
    item("Patients", "/doctor/patients"),
    item("Appointments", "/doctor/appointments"),
    item("Medical Records", "/doctor/medical-records"),
];

const PATIENT_MENU: &[NavItem] = &[
    item("Dashboard", "/patient/dashboard"),
    item("Appointments", "/patient/appointments"),
    item("Medical Records", "/patient/medical-records"),
    item("Health Tips", "/patient/health-tips"),
];

const STAFF_MENU: &[NavItem] = &[
    item("Dashboard", "/staff/dashboard"),
    item("Patients", "/staff/patients"),
    item("Appointments", "/staff/appointments"),
];

/// Header navigation entries for a role.
pub fn navigation_items(role: Role) -> &'static [NavItem] {
    match role {
        Role::SuperAdmin => SUPER_ADMIN_MENU,
        Role::Doctor => DOCTOR_MENU,
        Role::Patient => PATIENT_MENU,
        Role::Staff => STAFF_MENU,
    }
}

pub fn navigation_items_str(raw_role: &str) -> &'static [NavItem] {
    match raw_role.parse::<Role>() {
        Ok(role) => navigation_items(role),
        Err(_) => &[],
    }
}

// =============================================================================
// PANEL SIDEBARS
// =============================================================================

/// A dashboard shell with its own URL prefix and sidebar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Patient,
    Doctor,
    Clinic,
    SuperAdmin,
}

impl Panel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Clinic => "clinic",
            Self::SuperAdmin => "superadmin",
        }
    }

    /// Staff members work inside the clinic panel.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::SuperAdmin => Self::SuperAdmin,
            Role::Doctor => Self::Doctor,
            Role::Patient => Self::Patient,
            Role::Staff => Self::Clinic,
        }
    }
}

/// Icon keys resolved to glyphs by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Home,
    Calendar,
    NotesMedical,
    Lightbulb,
    CreditCard,
    User,
    Users,
    UserMd,
    Hospital,
    ChartLine,
    DollarSign,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarEntry {
    pub label: &'static str,
    /// Group headers with only sub-items have no path of their own.
    pub path: Option<&'static str>,
    pub icon: Icon,
    pub sub_items: &'static [NavItem],
}

const fn entry(label: &'static str, path: &'static str, icon: Icon) -> SidebarEntry {
    SidebarEntry { label, path: Some(path), icon, sub_items: &[] }
}

const PATIENT_SIDEBAR: &[SidebarEntry] = &[
    entry("Dashboard", "/patient", Icon::Home),
    SidebarEntry {
        label: "Appointments",
        path: Some("/patient/appointments"),
        icon: Icon::Calendar,
        sub_items: &[
            item("Book Appointments", "/patient/appointments"),
            item("Appointment History", "/patient/booked-appointments"),
        ],
    },
    entry("Medical Records", "/patient/medical-records", Icon::NotesMedical),
    entry("Health Tips", "/patient/health-tips", Icon::Lightbulb),
    entry("Payment History", "/patient/payments", Icon::CreditCard),
    entry("Profile", "/patient/profile", Icon::User),
];

const DOCTOR_SIDEBAR: &[SidebarEntry] = &[
    entry("Dashboard", "/doctor", Icon::Home),
    entry("Appointments", "/doctor/appointments", Icon::Calendar),
    entry("Patients", "/doctor/patients", Icon::Users),
];

const CLINIC_SIDEBAR: &[SidebarEntry] = &[
    entry("Dashboard", "/clinic", Icon::Home),
    SidebarEntry {
        label: "Appointments",
        path: Some("/clinic/appointments"),
        icon: Icon::Calendar,
        sub_items: &[
            item("Manage Slots", "/clinic/appointments"),
            item("Book for Patient", "/clinic/patient-booking"),
        ],
    },
    entry("Doctors", "/clinic/doctors", Icon::UserMd),
    entry("Patients", "/clinic/patients", Icon::Users),
    entry("Profile", "/clinic/profile", Icon::Hospital),
];

const SUPER_ADMIN_SIDEBAR: &[SidebarEntry] = &[
    entry("Dashboard", "/superadmin", Icon::Home),
    entry("Analytics", "/superadmin/analytics", Icon::ChartLine),
    SidebarEntry {
        label: "Revenue",
        path: None,
        icon: Icon::DollarSign,
        sub_items: &[
            item("Subscriptions", "/superadmin/subscriptions"),
            item("Platform Usage", "/superadmin/platform-usage"),
        ],
    },
    entry("Clinics", "/superadmin/clinics", Icon::Hospital),
    entry("Doctors", "/superadmin/doctors", Icon::UserMd),
];

pub fn sidebar(panel: Panel) -> &'static [SidebarEntry] {
    match panel {
        Panel::Patient => PATIENT_SIDEBAR,
        Panel::Doctor => DOCTOR_SIDEBAR,
        Panel::Clinic => CLINIC_SIDEBAR,
        Panel::SuperAdmin => SUPER_ADMIN_SIDEBAR,
    }
}

/// Sidebar entry to highlight for `path`.
///
/// Exact matches (entry or sub-item) win; otherwise the entry owning the
/// longest path prefix claims nested routes such as `/clinic/patients/42`.
/// Sub-item paths count for their parent entry.
pub fn active_item(panel: Panel, path: &str) -> Option<&'static SidebarEntry> {
    let candidates = || {
        sidebar(panel).iter().flat_map(|e| {
            e.path
                .into_iter()
                .chain(e.sub_items.iter().map(|sub| sub.path))
                .map(move |p| (e, p))
        })
    };
    if let Some((e, _)) = candidates().find(|(_, p)| *p == path) {
        return Some(e);
    }
    candidates()
        .filter(|(_, p)| path.strip_prefix(p).is_some_and(|rest| rest.starts_with('/')))
        .max_by_key(|(_, p)| p.len())
        .map(|(e, _)| e)
}

pub fn patient_detail_route(panel: Panel, patient_id: &str) -> String {
    format!("/{}/patients/{patient_id}", panel.as_str())
}
