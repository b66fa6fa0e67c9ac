use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProfileError>;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0} {1}")]
    Storage(String, String),
    #[error("Parsing error: {0}")]
    Parse(String),
    #[error("No file was selected.")]
    NoFileSelected,
    #[error("Please choose an image file.")]
    NotAnImage(String),
    #[error("File is too large, the maximum is 2MB.")]
    FileTooLarge(u64),
    #[error("Profile is not in edit mode")]
    NotEditing,
    #[error("Unknown member: {0}")]
    UnknownMember(String),
}

impl ProfileError {
    /// Errors caused by a rejected avatar file. The user can pick
    /// another file right away, nothing was changed.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoFileSelected | Self::NotAnImage(_) | Self::FileTooLarge(_)
        )
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
