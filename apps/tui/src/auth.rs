/// Dashboard login. A literal comparison against the configured pair;
/// there is no session beyond the running process.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.username == username.trim() && self.password == password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_the_configured_pair() {
        let credentials = Credentials::new("admin", "admin123");
        assert!(credentials.authenticate("admin", "admin123"));
        assert!(credentials.authenticate(" admin ", "admin123"));
        assert!(!credentials.authenticate("admin", "admin 123"));
        assert!(!credentials.authenticate("teacher", "admin123"));
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "secret"));
        assert!(!rendered.contains("secret"));
    }
}
