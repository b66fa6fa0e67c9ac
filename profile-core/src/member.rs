use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PLACEHOLDER_AVATAR_URL: &str = "https://ui-avatars.com/api/";

/// One profile record of the group.
///
/// This is exactly what gets persisted: a JSON object with `name`, `nim`
/// and `avatar` (`null` when the member has no photo).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub nim: String,
    pub avatar: Option<String>,
}

impl Member {
    pub fn new(name: impl Into<String>, nim: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nim: nim.into(),
            avatar: None,
        }
    }

    /// Image source to display for this member: the uploaded data URI, or
    /// a generated placeholder built from the member's name.
    pub fn avatar_src(&self) -> Cow<'_, str> {
        match &self.avatar {
            Some(avatar) => Cow::Borrowed(avatar.as_str()),
            None => Cow::Owned(placeholder_avatar_url(&self.name)),
        }
    }
}

pub fn placeholder_avatar_url(name: &str) -> String {
    format!(
        "{}?name={}&background=e0e7ff&color=4338ca",
        PLACEHOLDER_AVATAR_URL,
        urlencoding::encode(name)
    )
}

/// Stable handle of a member inside one loaded roster.
///
/// Ids are handed out when the roster is hydrated and are never persisted,
/// so a handle taken before a Cancel or Reset no longer resolves after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(Uuid);

impl MemberId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A member paired with its roster handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: MemberId,
    pub member: Member,
}

impl RosterEntry {
    pub(crate) fn new(member: Member) -> Self {
        Self {
            id: MemberId::new(),
            member,
        }
    }
}

/// Replacement of a single member field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Name(String),
    Nim(String),
    Avatar(Option<String>),
}

impl FieldEdit {
    pub(crate) fn apply(self, member: &mut Member) {
        match self {
            FieldEdit::Name(name) => member.name = name,
            FieldEdit::Nim(nim) => member.nim = nim,
            FieldEdit::Avatar(avatar) => member.avatar = avatar,
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            FieldEdit::Name(_) => "name",
            FieldEdit::Nim(_) => "nim",
            FieldEdit::Avatar(_) => "avatar",
        }
    }
}

/// Static information about the group, not persisted and not editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupInfo {
    pub group_name: &'static str,
    pub description: &'static str,
}

pub const GROUP_INFO: GroupInfo = GroupInfo {
    group_name: "Kelompok 20 PBB Shift 4",
    description: "Group practicum member information.",
};

/// The roster used when nothing has been saved yet, and after a reset.
pub fn default_roster() -> Vec<Member> {
    vec![
        Member::new("Muhammad Arif Maulana", "21120123140117"),
        Member::new("DImas Agus Saputra", "21120123130100"),
        Member::new("Justin Advani", "21120123140137"),
        Member::new("Althaf Muhammad Taftazani", "21120123120014"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_serializes_missing_avatar_as_null() {
        let json = serde_json::to_string(&Member::new("Ana", "123")).unwrap();
        assert_eq!(json, r#"{"name":"Ana","nim":"123","avatar":null}"#);
    }

    #[test]
    fn member_without_avatar_key_parses() {
        let member: Member =
            serde_json::from_str(r#"{"name":"Ana","nim":"123"}"#).unwrap();
        assert_eq!(member.avatar, None);
    }

    #[test]
    fn placeholder_is_used_without_avatar() {
        let mut member = Member::new("Justin Advani", "1");
        assert_eq!(
            member.avatar_src(),
            "https://ui-avatars.com/api/?name=Justin%20Advani&background=e0e7ff&color=4338ca"
        );

        member.avatar = Some("data:image/png;base64,AAAA".to_string());
        assert_eq!(member.avatar_src(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn field_edit_touches_one_field() {
        let mut member = Member::new("Ana", "123");
        FieldEdit::Nim("456".to_string()).apply(&mut member);
        assert_eq!(member, Member::new("Ana", "456"));
    }

    #[test]
    fn default_roster_has_four_members_without_photos() {
        let roster = default_roster();
        assert_eq!(roster.len(), 4);
        assert!(roster.iter().all(|m| m.avatar.is_none()));
    }
}
