//! Session expiry handling

/// Page the user is sent to after their session expires
pub const SIGNIN_PAGE: &str = "/signin.html";

/// Where to send the user once their session has expired on `path`.
///
/// Only dashboard and admin pages require a session; elsewhere the expiry is
/// silent.
pub fn signin_redirect(path: &str) -> Option<&'static str> {
    if path.contains("dashboard") || path.contains("admin") {
        Some(SIGNIN_PAGE)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_pages_redirect() {
        assert_eq!(signin_redirect("/admin.html"), Some(SIGNIN_PAGE));
        assert_eq!(signin_redirect("/student-dashboard"), Some(SIGNIN_PAGE));
        assert_eq!(signin_redirect("/stories/1"), None);
        assert_eq!(signin_redirect("/"), None);
    }
}
