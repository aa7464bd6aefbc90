//! Public profile of the signed-in user.

use serde::Serialize;

/// Identity fields returned next to the relation lists. Any may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub username: Option<String>,
    pub codeforces_handle: Option<String>,
    pub email: Option<String>,
}

impl UserProfile {
    /// Best name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.username
            .as_deref()
            .or(self.codeforces_handle.as_deref())
    }
}
