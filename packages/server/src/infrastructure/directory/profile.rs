//! インメモリ ProfileLookup 実装

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{AvatarRef, DisplayName, Profile, ProfileError, ProfileLookup, UserId};

use super::{DirectoryLoadError, read_json_file};

/// プロフィールファイルの 1 エントリ
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

/// user_id → Profile のインメモリディレクトリ
#[derive(Debug, Default)]
pub struct InMemoryProfileDirectory {
    profiles: HashMap<UserId, Profile>,
}

impl InMemoryProfileDirectory {
    pub fn new(records: Vec<ProfileRecord>) -> Result<Self, DirectoryLoadError> {
        let mut profiles = HashMap::with_capacity(records.len());
        for record in records {
            let user_id = UserId::new(record.id)
                .map_err(|e| DirectoryLoadError::InvalidEntry(e.to_string()))?;
            profiles.insert(
                user_id,
                Profile {
                    display_name: DisplayName::new(record.name),
                    avatar: AvatarRef::new(record.avatar),
                },
            );
        }
        Ok(Self { profiles })
    }

    /// `[{"id": "...", "name": "...", "avatar": "..."}]` 形式の JSON ファイルから読み込む
    pub fn from_json_file(path: &Path) -> Result<Self, DirectoryLoadError> {
        Self::new(read_json_file(path)?)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }
}

#[async_trait]
impl ProfileLookup for InMemoryProfileDirectory {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileError> {
        Ok(self.profiles.get(user_id).cloned())
    }
}
