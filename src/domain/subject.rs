#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub struct Subject(String);

impl Subject {
    pub fn parse(id: String) -> Result<Subject, String> {
        match id.trim().is_empty() {
            false => Ok(Subject(id)),
            true => Err("Subject identifier must not be empty".to_string()),
        }
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
