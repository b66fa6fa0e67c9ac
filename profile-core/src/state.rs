use kv_storage::KeyValueStorage;
use profile_error::{ProfileError, Result};

use crate::avatar::{validate_selection, AvatarFile, AvatarUpload, EncodedAvatar};
use crate::member::{
    default_roster, FieldEdit, GroupInfo, Member, MemberId, RosterEntry,
    GROUP_INFO,
};
use crate::STORAGE_KEY;

pub const SAVED_NOTICE: &str = "Profile saved successfully!";
pub const RESET_NOTICE: &str = "All profiles have been reset to the initial data.";
pub const RESET_PROMPT: &str =
    "WARNING: this will reset ALL group data to the defaults. Continue?";
pub const REMOVE_PHOTO_PROMPT: &str =
    "Are you sure you want to remove this profile photo?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Viewing,
    Editing,
}

/// Asks the user before a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// An answer the UI already collected, e.g. from a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirmed,
    Declined,
}

impl Confirm for Decision {
    fn confirm(&mut self, _prompt: &str) -> bool {
        *self == Decision::Confirmed
    }
}

/// The group roster and its edit session, backed by `S`.
///
/// Outside an edit session the roster equals what the storage holds (or the
/// default roster when nothing was saved). Edits only touch memory until
/// [`save`](Self::save).
pub struct ProfileState<S> {
    storage: S,
    roster: Vec<RosterEntry>,
    mode: Mode,
}

impl<S: KeyValueStorage> ProfileState<S> {
    /// Hydrate from `storage`.
    ///
    /// A stored document that is not a valid member list is returned as
    /// [`ProfileError::Parse`]; nothing tries to repair it.
    pub fn load(storage: S) -> Result<Self> {
        let members = read_document(&storage)?;
        log::info!("Loaded group profile with {} members", members.len());

        Ok(Self {
            storage,
            roster: into_roster(members),
            mode: Mode::Viewing,
        })
    }

    pub fn group(&self) -> GroupInfo {
        GROUP_INFO
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    pub fn members(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.roster
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.member)
    }

    /// The roster as it would be persisted.
    pub fn document(&self) -> Vec<Member> {
        self.roster
            .iter()
            .map(|entry| entry.member.clone())
            .collect()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn begin_edit(&mut self) {
        self.mode = Mode::Editing;
    }

    /// Replace one field of one member. Only allowed while editing.
    pub fn edit(&mut self, id: MemberId, edit: FieldEdit) -> Result<()> {
        if !self.is_editing() {
            return Err(ProfileError::NotEditing);
        }
        let entry = self
            .roster
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| ProfileError::UnknownMember(id.to_string()))?;

        log::trace!("Editing {} of member {}", edit.field_name(), id);
        edit.apply(&mut entry.member);
        Ok(())
    }

    /// Persist the whole roster, overwriting what was stored, and leave
    /// edit mode.
    pub fn save(&mut self) -> Result<&'static str> {
        let document = serde_json::to_string(&self.document())?;
        self.storage.set(STORAGE_KEY, document)?;
        self.mode = Mode::Viewing;

        log::info!("Saved group profile with {} members", self.roster.len());
        Ok(SAVED_NOTICE)
    }

    /// Drop unsaved edits by re-reading storage, and leave edit mode.
    pub fn cancel(&mut self) -> Result<()> {
        let members = read_document(&self.storage)?;
        self.roster = into_roster(members);
        self.mode = Mode::Viewing;
        Ok(())
    }

    /// Restore the default roster and delete the stored document.
    ///
    /// Returns `None` when the user declined, in which case nothing
    /// changes. Pending edits are discarded either way the reset goes
    /// through.
    pub fn reset(
        &mut self,
        confirm: &mut impl Confirm,
    ) -> Result<Option<&'static str>> {
        if !confirm.confirm(RESET_PROMPT) {
            return Ok(None);
        }

        self.storage.remove(STORAGE_KEY)?;
        self.roster = into_roster(default_roster());
        self.mode = Mode::Viewing;

        log::info!("Group profile reset to defaults");
        Ok(Some(RESET_NOTICE))
    }

    /// Clear a member's photo after confirmation. Returns whether the
    /// photo was removed.
    pub fn remove_avatar(
        &mut self,
        id: MemberId,
        confirm: &mut impl Confirm,
    ) -> Result<bool> {
        if !self.is_editing() {
            return Err(ProfileError::NotEditing);
        }
        if self.member(id).is_none() {
            return Err(ProfileError::UnknownMember(id.to_string()));
        }
        if !confirm.confirm(REMOVE_PHOTO_PROMPT) {
            return Ok(false);
        }

        self.edit(id, FieldEdit::Avatar(None))?;
        Ok(true)
    }

    /// Validate a photo picked for `id`.
    ///
    /// On success the returned ticket can be encoded off the event loop and
    /// handed back through [`apply_avatar`](Self::apply_avatar). Nothing
    /// changes here, whatever the outcome.
    pub fn select_avatar(
        &self,
        id: MemberId,
        file: Option<AvatarFile>,
    ) -> Result<AvatarUpload> {
        if !self.is_editing() {
            return Err(ProfileError::NotEditing);
        }
        if self.member(id).is_none() {
            return Err(ProfileError::UnknownMember(id.to_string()));
        }

        let file = validate_selection(file)?;
        Ok(AvatarUpload::new(id, file))
    }

    /// Apply a finished encoding.
    ///
    /// Completions that outlived their edit session, or whose member is gone
    /// because the roster was re-hydrated, are dropped and `false` is
    /// returned.
    pub fn apply_avatar(&mut self, encoded: EncodedAvatar) -> Result<bool> {
        if !self.is_editing() {
            log::warn!(
                "Dropping avatar for {}: edit session already closed",
                encoded.member
            );
            return Ok(false);
        }
        if self.member(encoded.member).is_none() {
            log::warn!(
                "Dropping avatar for {}: member no longer in roster",
                encoded.member
            );
            return Ok(false);
        }

        self.edit(encoded.member, FieldEdit::Avatar(Some(encoded.data_uri)))?;
        Ok(true)
    }
}

fn read_document(storage: &impl KeyValueStorage) -> Result<Vec<Member>> {
    match storage.get(STORAGE_KEY)? {
        Some(raw) if !raw.is_empty() => Ok(serde_json::from_str(&raw)?),
        _ => Ok(default_roster()),
    }
}

fn into_roster(members: Vec<Member>) -> Vec<RosterEntry> {
    members.into_iter().map(RosterEntry::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::MAX_AVATAR_BYTES;
    use kv_storage::{FileStorage, MemoryStorage};
    use tempdir::TempDir;
    use test_log::test;

    const MIB: usize = 1024 * 1024;

    fn edited_roster() -> Vec<Member> {
        vec![
            Member::new("Ana", "1"),
            Member {
                name: "Budi".to_string(),
                nim: "2".to_string(),
                avatar: Some("data:image/png;base64,AAAA".to_string()),
            },
        ]
    }

    fn storage_with(members: &[Member]) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        storage
            .set(STORAGE_KEY, serde_json::to_string(members).unwrap())
            .unwrap();
        storage
    }

    fn editing(storage: MemoryStorage) -> ProfileState<MemoryStorage> {
        let mut state = ProfileState::load(storage).unwrap();
        state.begin_edit();
        state
    }

    fn nth_id(state: &ProfileState<MemoryStorage>, index: usize) -> MemberId {
        state.members()[index].id
    }

    #[test]
    fn empty_storage_hydrates_defaults() {
        let state = ProfileState::load(MemoryStorage::new()).unwrap();
        assert_eq!(state.document(), default_roster());
        assert_eq!(state.mode(), Mode::Viewing);
    }

    #[test]
    fn stored_document_is_adopted() {
        let state = ProfileState::load(storage_with(&edited_roster())).unwrap();
        assert_eq!(state.document(), edited_roster());
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, "[{\"name\":".to_string()).unwrap();

        let result = ProfileState::load(storage);
        assert!(matches!(result, Err(ProfileError::Parse(_))));
    }

    #[test]
    fn begin_edit_only_flips_mode() {
        let mut state = ProfileState::load(MemoryStorage::new()).unwrap();
        state.begin_edit();
        assert!(state.is_editing());
        assert_eq!(state.document(), default_roster());
        assert!(state.storage().is_empty());
    }

    #[test]
    fn edits_outside_edit_mode_are_rejected() {
        let mut state = ProfileState::load(MemoryStorage::new()).unwrap();
        let id = nth_id(&state, 0);

        let result = state.edit(id, FieldEdit::Name("X".into()));
        assert!(matches!(result, Err(ProfileError::NotEditing)));
        assert_eq!(state.document(), default_roster());
    }

    #[test]
    fn photo_changes_outside_edit_mode_are_rejected() {
        let mut state =
            ProfileState::load(storage_with(&edited_roster())).unwrap();
        let id = nth_id(&state, 1);

        let photo =
            AvatarFile::from_bytes("me.png", "image/png", vec![0x89; 16]);
        let result = state.select_avatar(id, Some(photo));
        assert!(matches!(result, Err(ProfileError::NotEditing)));

        let result = state.remove_avatar(id, &mut Decision::Confirmed);
        assert!(matches!(result, Err(ProfileError::NotEditing)));

        assert_eq!(state.mode(), Mode::Viewing);
        assert_eq!(state.document(), edited_roster());
    }

    #[test]
    fn edit_touches_only_the_target_field() {
        let mut state = editing(MemoryStorage::new());
        let before = state.document();
        let ids: Vec<MemberId> =
            state.members().iter().map(|entry| entry.id).collect();

        state
            .edit(ids[2], FieldEdit::Nim("999".to_string()))
            .unwrap();

        let after = state.document();
        for (index, (old, new)) in before.iter().zip(&after).enumerate() {
            if index == 2 {
                assert_eq!(new.nim, "999");
                assert_eq!(new.name, old.name);
                assert_eq!(new.avatar, old.avatar);
            } else {
                assert_eq!(new, old);
            }
        }
        let ids_after: Vec<MemberId> =
            state.members().iter().map(|entry| entry.id).collect();
        assert_eq!(ids, ids_after);
    }

    #[test]
    fn edit_of_unknown_member_is_rejected() {
        let mut state = editing(MemoryStorage::new());
        let stale = ProfileState::load(MemoryStorage::new()).unwrap();

        let result = state.edit(nth_id(&stale, 0), FieldEdit::Name("X".into()));
        assert!(matches!(result, Err(ProfileError::UnknownMember(_))));
    }

    #[test]
    fn save_persists_exact_roster() {
        let mut state = editing(MemoryStorage::new());
        let id = nth_id(&state, 1);
        state.edit(id, FieldEdit::Name("Dimas".into())).unwrap();

        assert_eq!(state.save().unwrap(), SAVED_NOTICE);
        assert_eq!(state.mode(), Mode::Viewing);

        let raw = state.storage().get(STORAGE_KEY).unwrap().unwrap();
        let stored: Vec<Member> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, state.document());

        state.save().unwrap();
        let raw_again = state.storage().get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(raw, raw_again);
    }

    #[test]
    fn cancel_restores_previous_roster() {
        let mut state = editing(storage_with(&edited_roster()));
        let first = nth_id(&state, 0);
        let second = nth_id(&state, 1);
        state.edit(first, FieldEdit::Name("Changed".into())).unwrap();
        state.edit(second, FieldEdit::Avatar(None)).unwrap();

        state.cancel().unwrap();
        assert_eq!(state.document(), edited_roster());
        assert_eq!(state.mode(), Mode::Viewing);
    }

    #[test]
    fn cancel_without_saved_document_restores_defaults() {
        let mut state = editing(MemoryStorage::new());
        let id = nth_id(&state, 3);
        state.edit(id, FieldEdit::Nim("0".into())).unwrap();

        state.cancel().unwrap();
        assert_eq!(state.document(), default_roster());
        assert!(state.storage().is_empty());
    }

    #[test]
    fn confirmed_reset_wipes_storage() {
        let mut state = editing(storage_with(&edited_roster()));
        let mut prompts = Vec::new();

        let notice = state
            .reset(&mut |prompt: &str| {
                prompts.push(prompt.to_string());
                true
            })
            .unwrap();

        assert_eq!(notice, Some(RESET_NOTICE));
        assert_eq!(prompts, vec![RESET_PROMPT.to_string()]);
        assert_eq!(state.document(), default_roster());
        assert_eq!(state.storage().get(STORAGE_KEY).unwrap(), None);
        assert_eq!(state.mode(), Mode::Viewing);
    }

    #[test]
    fn declined_reset_is_a_no_op() {
        let mut state = editing(storage_with(&edited_roster()));
        let id = nth_id(&state, 0);
        state.edit(id, FieldEdit::Name("Pending".into())).unwrap();

        let notice = state.reset(&mut Decision::Declined).unwrap();

        assert_eq!(notice, None);
        assert!(state.is_editing());
        assert_eq!(state.member(id).unwrap().name, "Pending");
        assert!(state.storage().get(STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn remove_avatar_requires_confirmation() {
        let mut state = editing(storage_with(&edited_roster()));
        let id = nth_id(&state, 1);

        assert!(!state.remove_avatar(id, &mut Decision::Declined).unwrap());
        assert!(state.member(id).unwrap().avatar.is_some());

        assert!(state.remove_avatar(id, &mut Decision::Confirmed).unwrap());
        assert_eq!(state.member(id).unwrap().avatar, None);
        assert_eq!(state.member(id).unwrap().name, "Budi");
    }

    #[test]
    fn oversized_and_non_image_files_are_rejected() {
        let state = editing(MemoryStorage::new());
        let id = nth_id(&state, 0);

        let too_big =
            AvatarFile::from_bytes("big.png", "image/png", vec![0; 3 * MIB]);
        let result = state.select_avatar(id, Some(too_big));
        assert!(matches!(result, Err(ProfileError::FileTooLarge(_))));

        let text =
            AvatarFile::from_bytes("notes.txt", "text/plain", vec![b'a'; 10]);
        let result = state.select_avatar(id, Some(text));
        assert!(matches!(result, Err(ProfileError::NotAnImage(_))));

        let result = state.select_avatar(id, None);
        assert!(matches!(result, Err(ProfileError::NoFileSelected)));

        assert_eq!(state.document(), default_roster());
    }

    #[test(tokio::test)]
    async fn accepted_photo_is_applied() {
        let mut state = editing(MemoryStorage::new());
        let id = nth_id(&state, 2);
        let mut png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        png.resize(MIB, 0);
        assert!((png.len() as u64) < MAX_AVATAR_BYTES);

        let upload = state
            .select_avatar(id, Some(AvatarFile::from_bytes("me.png", "image/png", png)))
            .unwrap();
        assert_eq!(upload.member(), id);

        let encoded = upload.encode().await.unwrap();
        assert!(state.apply_avatar(encoded).unwrap());

        let avatar = state.member(id).unwrap().avatar.clone().unwrap();
        assert!(avatar.starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(state.document()[0].avatar, None);
    }

    #[test(tokio::test)]
    async fn stale_photo_is_dropped_after_cancel() {
        let mut state = editing(MemoryStorage::new());
        let id = nth_id(&state, 0);
        let upload = state
            .select_avatar(
                id,
                Some(AvatarFile::from_bytes("me.png", "image/png", vec![1; 16])),
            )
            .unwrap();

        state.cancel().unwrap();
        state.begin_edit();

        let encoded = upload.encode().await.unwrap();
        assert!(!state.apply_avatar(encoded).unwrap());
        assert_eq!(state.document(), default_roster());
    }

    #[test(tokio::test)]
    async fn photo_finishing_after_save_is_dropped() {
        let mut state = editing(MemoryStorage::new());
        let id = nth_id(&state, 0);
        let upload = state
            .select_avatar(
                id,
                Some(AvatarFile::from_bytes("me.png", "image/png", vec![1; 16])),
            )
            .unwrap();
        state.save().unwrap();

        let encoded = upload.encode().await.unwrap();
        assert!(!state.apply_avatar(encoded).unwrap());
        assert_eq!(state.member(id).unwrap().avatar, None);
    }

    #[test]
    fn file_storage_round_trip() {
        let temp_dir = TempDir::new("profile").unwrap();
        let path = temp_dir.path().join("store.json");

        let storage = FileStorage::new("Profile".to_string(), &path);
        let mut state = ProfileState::load(storage).unwrap();
        state.begin_edit();
        let id = state.members()[0].id;
        state.edit(id, FieldEdit::Name("Arif".into())).unwrap();
        state.save().unwrap();

        let reloaded =
            ProfileState::load(FileStorage::new("Profile".to_string(), &path))
                .unwrap();
        assert_eq!(reloaded.document(), state.document());
        assert_eq!(reloaded.document()[0].name, "Arif");
    }
}
