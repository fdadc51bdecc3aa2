use std::fmt;

/// Identity of a single run of the restoration job.
///
/// Tokens are compared by equality only. They carry no ordering and their text
/// is never parsed back; a superseded token simply stops matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunToken(String);

impl RunToken {
    /// Millisecond timestamp plus a random suffix.
    pub fn create() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{millis:x}-{}", &suffix[..12]))
    }

    /// Wraps an identifier received over the wire.
    pub fn from_wire(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn equals(a: &RunToken, b: &RunToken) -> bool {
        a == b
    }
}

impl fmt::Display for RunToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
