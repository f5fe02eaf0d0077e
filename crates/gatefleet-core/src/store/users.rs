// ── Central user database ──
//
// Keyed by card uid, kept in insertion order so pushes are stable.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::snapshot::UsersDocument;
use crate::error::CoreError;
use crate::model::{CentralUser, Settings};
use crate::requests::{CreateUserRequest, UpdateUserRequest, UpdateSettingsRequest};

#[derive(Debug, Default)]
pub struct UserStore {
    users: IndexMap<String, CentralUser>,
}

impl UserStore {
    pub fn from_document(doc: UsersDocument) -> Self {
        let mut users = IndexMap::with_capacity(doc.users.len());
        for user in doc.users {
            users.entry(user.uid.clone()).or_insert(user);
        }
        Self { users }
    }

    pub fn to_document(&self) -> UsersDocument {
        UsersDocument {
            users: self.list(),
        }
    }

    pub fn list(&self) -> Vec<CentralUser> {
        self.users.values().cloned().collect()
    }

    pub fn get(&self, uid: &str) -> Option<&CentralUser> {
        self.users.get(uid)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn add(
        &mut self,
        req: CreateUserRequest,
        default_credit: i64,
        now: DateTime<Utc>,
    ) -> Result<CentralUser, CoreError> {
        let uid = req.uid.trim();
        let name = req.name.trim();
        if uid.is_empty() || name.is_empty() {
            return Err(CoreError::validation("UID and name are required"));
        }
        if self.users.contains_key(uid) {
            return Err(CoreError::DuplicateUser {
                uid: uid.to_owned(),
            });
        }

        let user = CentralUser {
            uid: uid.to_owned(),
            name: name.to_owned(),
            credit: req.credit.unwrap_or(default_credit),
            user_type: req.user_type.unwrap_or_default(),
            inside: false,
            created_at: now,
            updated_at: None,
        };
        self.users.insert(user.uid.clone(), user.clone());
        Ok(user)
    }

    pub fn update(
        &mut self,
        req: UpdateUserRequest,
        now: DateTime<Utc>,
    ) -> Result<CentralUser, CoreError> {
        let uid = req.uid.trim();
        if uid.is_empty() {
            return Err(CoreError::validation("UID is required"));
        }
        let user = self.users.get_mut(uid).ok_or_else(|| CoreError::UserNotFound {
            uid: uid.to_owned(),
        })?;

        if let Some(name) = req.name.map(|n| n.trim().to_owned()) {
            if name.is_empty() {
                return Err(CoreError::validation("Name cannot be empty"));
            }
            user.name = name;
        }
        if let Some(credit) = req.credit {
            user.credit = credit;
        }
        if let Some(user_type) = req.user_type {
            user.user_type = user_type;
        }
        if let Some(inside) = req.inside {
            user.inside = inside;
        }
        user.updated_at = Some(now);
        Ok(user.clone())
    }

    pub fn remove(&mut self, uid: &str) -> Result<CentralUser, CoreError> {
        let uid = uid.trim();
        if uid.is_empty() {
            return Err(CoreError::validation("UID is required"));
        }
        self.users
            .shift_remove(uid)
            .ok_or_else(|| CoreError::UserNotFound {
                uid: uid.to_owned(),
            })
    }

    /// Add a signed delta to a user's credit. Zero is rejected.
    pub fn adjust_credit(
        &mut self,
        uid: &str,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<CentralUser, CoreError> {
        let uid = uid.trim();
        if uid.is_empty() || amount == 0 {
            return Err(CoreError::validation("UID and a non-zero amount are required"));
        }
        let user = self.users.get_mut(uid).ok_or_else(|| CoreError::UserNotFound {
            uid: uid.to_owned(),
        })?;
        user.credit = user.credit.saturating_add(amount);
        user.updated_at = Some(now);
        Ok(user.clone())
    }
}

/// Merge a partial settings update.
pub fn apply_settings(
    settings: &mut Settings,
    req: &UpdateSettingsRequest,
) -> Result<(), CoreError> {
    if req.cost_per_exit.is_some_and(|c| c < 0) {
        return Err(CoreError::validation("costPerExit cannot be negative"));
    }
    if let Some(cost) = req.cost_per_exit {
        settings.cost_per_exit = cost;
    }
    if let Some(credit) = req.default_credit {
        settings.default_credit = credit;
    }
    if let Some(admin) = req.admin_mode_enabled {
        settings.admin_mode_enabled = admin;
    }
    Ok(())
}
