//! Group profile page logic: the member roster with its
//! view/edit/save/cancel/reset cycle, avatar ingestion, and the
//! favorites presentation gate.
//!
//! ```no_run
//! use kv_storage::MemoryStorage;
//! use profile_core::{FieldEdit, ProfileState};
//!
//! let mut state = ProfileState::load(MemoryStorage::new()).unwrap();
//! state.begin_edit();
//! let id = state.members()[0].id;
//! state.edit(id, FieldEdit::Name("Arif".into())).unwrap();
//! state.save().unwrap();
//! ```
pub mod avatar;
pub mod favorites;
pub mod member;
pub mod state;

pub use avatar::{AvatarFile, AvatarUpload, EncodedAvatar, MAX_AVATAR_BYTES};
pub use favorites::{favorites_panel, FavoritesPanel, FavoritesSnapshot};
pub use member::{
    default_roster, FieldEdit, GroupInfo, Member, MemberId, RosterEntry,
    GROUP_INFO,
};
pub use state::{Confirm, Decision, Mode, ProfileState};

/// Storage key of the persisted member list.
pub const STORAGE_KEY: &str = "groupProfileInfo";
