use staffgate_auth::Claims;

/// Authenticated caller context, attached to request extensions by the auth
/// middleware once the token has been verified.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    claims: Claims,
}

impl CurrentUser {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn username(&self) -> &str {
        &self.claims.username
    }

    pub fn department(&self) -> &str {
        &self.claims.department
    }

    pub fn permissions(&self) -> &[String] {
        &self.claims.permissions
    }

    pub fn is_admin(&self) -> bool {
        self.claims.is_admin
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}
