use std::io;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine};
use profile_error::{ProfileError, Result};

use crate::member::MemberId;

/// Largest accepted avatar file, in bytes.
pub const MAX_AVATAR_BYTES: u64 = 2 * 1024 * 1024;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
enum AvatarSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file the user picked as a new profile photo.
///
/// `media_type` and `size` are what the file claims to be; the content is
/// only read once the selection has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarFile {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    source: AvatarSource,
}

impl AvatarFile {
    /// Describe a file on disk. The media type is derived from the
    /// extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            media_type: media_type_for(path),
            size: metadata.len(),
            source: AvatarSource::Path(path.to_path_buf()),
        })
    }

    /// Describe content that is already in memory.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size: bytes.len() as u64,
            source: AvatarSource::Bytes(bytes),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.media_type.starts_with("image/") {
            return Err(ProfileError::NotAnImage(self.media_type.clone()));
        }
        if self.size > MAX_AVATAR_BYTES {
            return Err(ProfileError::FileTooLarge(self.size));
        }
        Ok(())
    }
}

/// Media type declared by the file extension.
pub fn media_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MEDIA_TYPE)
        .to_owned()
}

/// Check a selection without touching any state.
pub fn validate_selection(file: Option<AvatarFile>) -> Result<AvatarFile> {
    let file = file.ok_or(ProfileError::NoFileSelected)?;
    file.validate()?;
    Ok(file)
}

/// An accepted selection waiting to be encoded for one member.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    member: MemberId,
    file: AvatarFile,
}

/// The encoded photo, ready to be applied to its member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAvatar {
    pub member: MemberId,
    pub data_uri: String,
}

impl AvatarUpload {
    pub(crate) fn new(member: MemberId, file: AvatarFile) -> Self {
        Self { member, file }
    }

    pub fn member(&self) -> MemberId {
        self.member
    }

    pub fn file(&self) -> &AvatarFile {
        &self.file
    }

    /// Read the whole file and encode it as a `data:` URI.
    pub async fn encode(self) -> Result<EncodedAvatar> {
        let bytes = match self.file.source {
            AvatarSource::Path(path) => tokio::fs::read(&path).await?,
            AvatarSource::Bytes(bytes) => bytes,
        };
        if bytes.is_empty() {
            return Err(ProfileError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is empty", self.file.name),
            )));
        }

        log::debug!(
            "Encoded avatar {} ({} bytes) for member {}",
            self.file.name,
            bytes.len(),
            self.member
        );

        Ok(EncodedAvatar {
            member: self.member,
            data_uri: to_data_uri(&self.file.media_type, &bytes),
        })
    }
}

pub fn to_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type,
        general_purpose::STANDARD.encode(bytes)
    )
}
