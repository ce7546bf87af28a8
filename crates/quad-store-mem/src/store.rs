//! [`MemStore`] — the in-memory implementation of both collaborator traits.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use quad_core::{
  authority::{
    CompanyProfile, Connection, ProfileAuthority, ProfileStatus,
    SocialNetworkingInfo,
  },
  directory::DirectoryStore,
  person::PersonRecord,
  privacy::{PreferenceSettings, PrivacyLevel, PrivacySettings},
};
use uuid::Uuid;

use crate::{Error, Result, seed::Seed};

// ─── Tables ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Account {
  display_name: String,
  email:        Option<String>,
}

#[derive(Default)]
struct Inner {
  accounts:    HashMap<Uuid, Account>,
  aliases:     HashMap<String, Uuid>,
  persons:     HashMap<Uuid, PersonRecord>,
  privacy:     HashMap<Uuid, PrivacySettings>,
  preferences: HashMap<Uuid, PreferenceSettings>,
  statuses:    HashMap<Uuid, ProfileStatus>,
  social:      HashMap<Uuid, SocialNetworkingInfo>,
  companies:   HashMap<Uuid, Vec<CompanyProfile>>,
  /// Reciprocal connections, stored as ordered pairs.
  connections: HashSet<(Uuid, Uuid)>,
}

fn pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
  if a <= b { (a, b) } else { (b, a) }
}

/// Whether a privacy level admits this viewer.
fn level_allows(level: PrivacyLevel, friend: bool) -> bool {
  match level {
    PrivacyLevel::Everyone => true,
    PrivacyLevel::Connections => friend,
    PrivacyLevel::OnlyMe => false,
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Directory and profile-authority tables behind one lock.
///
/// Cloning is cheap — the tables are reference-counted.
#[derive(Clone, Default)]
pub struct MemStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build a store from parsed seed data.
  pub fn from_seed(seed: &Seed) -> Result<Self> {
    let store = Self::new();
    {
      let mut inner = store.write()?;
      for user in &seed.users {
        let uuid = Uuid::new_v4();
        inner.accounts.insert(uuid, Account {
          display_name: user.display_name.clone(),
          email:        user.email.clone(),
        });
        inner.aliases.insert(user.eid.clone(), uuid);
        if let Some(person) = &user.person {
          let mut person = person.clone();
          person.user_uuid = uuid;
          inner.persons.insert(uuid, person);
        }
        if let Some(privacy) = &user.privacy {
          inner.privacy.insert(uuid, privacy.clone());
        }
        if let Some(preferences) = &user.preferences {
          inner.preferences.insert(uuid, preferences.clone());
        }
        if let Some(status) = &user.status {
          inner.statuses.insert(uuid, status.clone());
        }
        if let Some(social) = &user.social {
          inner.social.insert(uuid, social.clone());
        }
        if !user.company_profiles.is_empty() {
          inner.companies.insert(uuid, user.company_profiles.clone());
        }
      }
      for [a, b] in &seed.connections {
        let a = *inner
          .aliases
          .get(a)
          .ok_or_else(|| Error::UnknownSeedUser(a.clone()))?;
        let b = *inner
          .aliases
          .get(b)
          .ok_or_else(|| Error::UnknownSeedUser(b.clone()))?;
        inner.connections.insert(pair(a, b));
      }
    }
    Ok(store)
  }

  fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
    self.inner.read().map_err(|_| Error::Poisoned)
  }

  fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
    self.inner.write().map_err(|_| Error::Poisoned)
  }

  // ── Mutators (seeding and tests) ──────────────────────────────────────

  /// Register a directory account and return its generated uuid.
  pub fn add_user(
    &self,
    eid: &str,
    display_name: &str,
    email: Option<&str>,
  ) -> Result<Uuid> {
    let uuid = Uuid::new_v4();
    self.add_user_with_id(uuid, eid, display_name, email)?;
    Ok(uuid)
  }

  /// Register a directory account under a caller-supplied uuid.
  pub fn add_user_with_id(
    &self,
    uuid: Uuid,
    eid: &str,
    display_name: &str,
    email: Option<&str>,
  ) -> Result<()> {
    let mut inner = self.write()?;
    inner.accounts.insert(uuid, Account {
      display_name: display_name.to_string(),
      email:        email.map(str::to_string),
    });
    inner.aliases.insert(eid.to_string(), uuid);
    Ok(())
  }

  pub fn put_person(&self, record: PersonRecord) -> Result<()> {
    self.write()?.persons.insert(record.user_uuid, record);
    Ok(())
  }

  pub fn put_privacy(&self, user_uuid: Uuid, privacy: PrivacySettings) -> Result<()> {
    self.write()?.privacy.insert(user_uuid, privacy);
    Ok(())
  }

  pub fn put_preferences(
    &self,
    user_uuid: Uuid,
    preferences: PreferenceSettings,
  ) -> Result<()> {
    self.write()?.preferences.insert(user_uuid, preferences);
    Ok(())
  }

  pub fn put_status(&self, user_uuid: Uuid, status: ProfileStatus) -> Result<()> {
    self.write()?.statuses.insert(user_uuid, status);
    Ok(())
  }

  pub fn put_social(&self, user_uuid: Uuid, social: SocialNetworkingInfo) -> Result<()> {
    self.write()?.social.insert(user_uuid, social);
    Ok(())
  }

  pub fn put_company_profiles(
    &self,
    user_uuid: Uuid,
    profiles: Vec<CompanyProfile>,
  ) -> Result<()> {
    self.write()?.companies.insert(user_uuid, profiles);
    Ok(())
  }

  /// Record a reciprocal connection between two users.
  pub fn connect(&self, a: Uuid, b: Uuid) -> Result<()> {
    self.write()?.connections.insert(pair(a, b));
    Ok(())
  }
}

// ─── DirectoryStore ──────────────────────────────────────────────────────────

impl DirectoryStore for MemStore {
  type Error = Error;

  async fn resolve_user(&self, user_id: &str) -> Result<Option<Uuid>> {
    let inner = self.read()?;
    if let Ok(uuid) = user_id.parse::<Uuid>()
      && inner.accounts.contains_key(&uuid)
    {
      return Ok(Some(uuid));
    }
    Ok(inner.aliases.get(user_id).copied())
  }

  async fn user_exists(&self, user_uuid: Uuid) -> Result<bool> {
    Ok(self.read()?.accounts.contains_key(&user_uuid))
  }

  async fn display_name(&self, user_uuid: Uuid) -> Result<Option<String>> {
    Ok(
      self
        .read()?
        .accounts
        .get(&user_uuid)
        .map(|a| a.display_name.clone()),
    )
  }

  async fn email(&self, user_uuid: Uuid) -> Result<Option<String>> {
    Ok(
      self
        .read()?
        .accounts
        .get(&user_uuid)
        .and_then(|a| a.email.clone()),
    )
  }

  async fn person(&self, user_uuid: Uuid) -> Result<Option<PersonRecord>> {
    Ok(self.read()?.persons.get(&user_uuid).cloned())
  }

  async fn create_person(&self, user_uuid: Uuid) -> Result<Option<PersonRecord>> {
    let mut inner = self.write()?;
    // No account, no record — the caller escalates this.
    if !inner.accounts.contains_key(&user_uuid) {
      return Ok(None);
    }
    let record = inner
      .persons
      .entry(user_uuid)
      .or_insert_with(|| PersonRecord::new(user_uuid))
      .clone();
    Ok(Some(record))
  }

  async fn update_person(&self, record: &PersonRecord) -> Result<bool> {
    let mut inner = self.write()?;
    if !inner.accounts.contains_key(&record.user_uuid) {
      return Ok(false);
    }
    inner.persons.insert(record.user_uuid, record.clone());
    Ok(true)
  }
}

// ─── ProfileAuthority ────────────────────────────────────────────────────────

impl ProfileAuthority for MemStore {
  type Error = Error;

  async fn privacy_settings(&self, user_uuid: Uuid) -> Result<PrivacySettings> {
    Ok(self.read()?.privacy.get(&user_uuid).cloned().unwrap_or_default())
  }

  async fn preference_settings(&self, user_uuid: Uuid) -> Result<PreferenceSettings> {
    Ok(
      self
        .read()?
        .preferences
        .get(&user_uuid)
        .cloned()
        .unwrap_or_default(),
    )
  }

  async fn is_connected(&self, user_uuid: Uuid, other_uuid: Uuid) -> Result<bool> {
    Ok(self.read()?.connections.contains(&pair(user_uuid, other_uuid)))
  }

  async fn basic_info_visible(
    &self,
    target: Uuid,
    privacy: &PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> Result<bool> {
    Ok(target == viewer || level_allows(privacy.basic_info, friend))
  }

  async fn contact_info_visible(
    &self,
    target: Uuid,
    privacy: &PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> Result<bool> {
    Ok(target == viewer || level_allows(privacy.contact_info, friend))
  }

  async fn staff_info_visible(
    &self,
    target: Uuid,
    privacy: &PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> Result<bool> {
    Ok(target == viewer || level_allows(privacy.staff_info, friend))
  }

  async fn student_info_visible(
    &self,
    target: Uuid,
    privacy: &PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> Result<bool> {
    Ok(target == viewer || level_allows(privacy.student_info, friend))
  }

  async fn personal_info_visible(
    &self,
    target: Uuid,
    privacy: &PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> Result<bool> {
    Ok(target == viewer || level_allows(privacy.personal_info, friend))
  }

  async fn business_info_visible(
    &self,
    target: Uuid,
    privacy: &PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> Result<bool> {
    Ok(target == viewer || level_allows(privacy.business_info, friend))
  }

  async fn status_visible(
    &self,
    target: Uuid,
    privacy: &PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> Result<bool> {
    Ok(target == viewer || level_allows(privacy.my_status, friend))
  }

  async fn friends_list_visible(
    &self,
    target: Uuid,
    privacy: &PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> Result<bool> {
    Ok(target == viewer || level_allows(privacy.my_friends, friend))
  }

  async fn status(&self, user_uuid: Uuid) -> Result<Option<ProfileStatus>> {
    Ok(self.read()?.statuses.get(&user_uuid).cloned())
  }

  async fn social_networking(
    &self,
    user_uuid: Uuid,
  ) -> Result<Option<SocialNetworkingInfo>> {
    Ok(self.read()?.social.get(&user_uuid).cloned())
  }

  async fn connections(&self, user_uuid: Uuid) -> Result<Vec<Connection>> {
    let inner = self.read()?;
    let mut list: Vec<Connection> = inner
      .connections
      .iter()
      .filter_map(|&(a, b)| {
        if a == user_uuid {
          Some(b)
        } else if b == user_uuid {
          Some(a)
        } else {
          None
        }
      })
      .filter_map(|other| {
        inner.accounts.get(&other).map(|account| Connection {
          user_uuid:    other,
          display_name: account.display_name.clone(),
        })
      })
      .collect();
    list.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    Ok(list)
  }

  async fn company_profiles(&self, user_uuid: Uuid) -> Result<Vec<CompanyProfile>> {
    Ok(self.read()?.companies.get(&user_uuid).cloned().unwrap_or_default())
  }
}
