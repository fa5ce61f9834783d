use eduhub_auth::Role;

/// Authenticated principal for the current request.
///
/// Inserted exactly once by the gateway middleware; handlers read it from
/// request extensions instead of re-deriving identity from cookies or
/// headers downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    subject: String,
    role: Role,
    email: Option<String>,
}

impl PrincipalContext {
    pub fn new(subject: String, role: Role, email: Option<String>) -> Self {
        Self { subject, role, email }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
