use serde::{Deserialize, Serialize};

/// Canonical portal role.
///
/// Every role spelling the backend may emit maps onto exactly one of these
/// six variants; see [`Role::normalize`] for the fallback on unknown input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    StaffAccountant,
    StaffManager,
    Teacher,
    Student,
    Parent,
}

impl Role {
    /// All canonical roles.
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::StaffAccountant,
        Role::StaffManager,
        Role::Teacher,
        Role::Student,
        Role::Parent,
    ];

    /// Map an arbitrary role spelling onto its canonical variant.
    ///
    /// Matching ignores case and `-`/`_`/space separators, so `"Staff-Manager"`
    /// and `"STAFF_MANAGER"` both land on [`Role::StaffManager`]. Unrecognized
    /// input falls back to [`Role::Student`] rather than erroring; callers that
    /// need hard denial on unknown roles must check the raw claim themselves.
    pub fn normalize(raw: &str) -> Role {
        let key: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match key.as_str() {
            "ADMIN" | "ADMINISTRATOR" => Role::Admin,
            "ACCOUNTANT" | "ACCOUNTING" | "STAFFACCOUNTANT" => Role::StaffAccountant,
            "MANAGER" | "MANAGEMENT" | "STAFF" | "STAFFMANAGER" => Role::StaffManager,
            "TEACHER" | "INSTRUCTOR" => Role::Teacher,
            "STUDENT" | "LEARNER" | "USER" | "CUSTOMER" => Role::Student,
            "PARENT" | "GUARDIAN" => Role::Parent,
            _ => Role::Student,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::StaffAccountant => "staff_accountant",
            Role::StaffManager => "staff_manager",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }

    /// Path segment under the portal root (`/portal/<segment>`).
    pub fn portal_segment(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::StaffAccountant => "accounting",
            Role::StaffManager => "staff",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }

    /// Reverse of [`Role::portal_segment`].
    pub fn from_portal_segment(segment: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.portal_segment() == segment)
    }

    /// Default landing path for an authenticated user with this role.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/portal/admin",
            Role::StaffAccountant => "/portal/accounting",
            Role::StaffManager => "/portal/staff",
            Role::Teacher => "/portal/teacher",
            Role::Student => "/portal/student",
            Role::Parent => "/portal/parent",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
