//! [`ProfileService`] — the visibility-gated profile assembler.
//!
//! Every view operation runs the same single-pass routine: authenticate the
//! viewer, resolve the target identifier, then populate one field group per
//! category whose gate is open. A static [`ViewSpec`] per operation lists
//! the categories the view may carry plus its image policy and extras, so
//! the four view flavours share one routine instead of four near-copies.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use quad_core::{
  Error, Result,
  authority::{Connection, ProfileAuthority},
  directory::DirectoryStore,
  person::PersonRecord,
  privacy::PrivacySettings,
  view::{
    PROP_BIRTH_YEAR_VISIBLE, PROP_EMAIL_CONFIRM_ENABLED,
    PROP_EMAIL_REQUEST_ENABLED, ProfileView,
  },
};
use tracing::{debug, warn};
use uuid::Uuid;

// ─── Categories ──────────────────────────────────────────────────────────────

/// A gated field group. Each category pairs one authority predicate with the
/// view fields it controls; the groups are disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
  Basic,
  Contact,
  Staff,
  Student,
  /// Also carries the social-networking handles when the view allows them.
  Personal,
  Business,
  Status,
}

// ─── View specs ──────────────────────────────────────────────────────────────

/// Which computed image URLs a view carries.
#[derive(Debug, Clone, Copy)]
enum Images {
  Both,
  ThumbOnly,
  FullOnly,
  None,
}

/// The shape of one view operation.
struct ViewSpec {
  label:      &'static str,
  categories: &'static [Category],
  /// An open personal gate also populates the social-networking handles.
  social:     bool,
  images:     Images,
  /// Attach the derived privacy/preference properties (non-self views only).
  properties: bool,
  /// Unconditionally clear the fields the legacy profile never carried.
  truncate:   bool,
  /// Whether the view reads the person record at all.
  reads_record: bool,
  /// Image policy when the target has no stored record.
  images_on_missing: bool,
}

static FULL: ViewSpec = ViewSpec {
  label:      "full",
  categories: &[
    Category::Basic,
    Category::Contact,
    Category::Staff,
    Category::Student,
    Category::Personal,
    Category::Business,
    Category::Status,
  ],
  social:     true,
  images:     Images::Both,
  properties: true,
  truncate:   false,
  reads_record: true,
  images_on_missing: true,
};

static MINIMAL: ViewSpec = ViewSpec {
  label:      "minimal",
  categories: &[Category::Status],
  social:     false,
  images:     Images::ThumbOnly,
  properties: false,
  truncate:   false,
  reads_record: false,
  images_on_missing: false,
};

static ACADEMIC: ViewSpec = ViewSpec {
  label:      "academic",
  categories: &[Category::Staff, Category::Student],
  social:     false,
  images:     Images::FullOnly,
  properties: false,
  truncate:   false,
  reads_record: true,
  images_on_missing: false,
};

static LEGACY: ViewSpec = ViewSpec {
  label:      "legacy",
  categories: &[
    Category::Basic,
    Category::Contact,
    Category::Staff,
    Category::Student,
    Category::Personal,
  ],
  social:     false,
  images:     Images::None,
  properties: false,
  truncate:   true,
  reads_record: true,
  images_on_missing: false,
};

// ─── Service ─────────────────────────────────────────────────────────────────

/// Request-scoped profile operations over a directory store and a profile
/// authority.
///
/// Cloning is cheap — both collaborators are reference-counted.
#[derive(Clone)]
pub struct ProfileService<D, A> {
  directory: Arc<D>,
  authority: Arc<A>,
  base_url:  String,
}

impl<D, A> ProfileService<D, A>
where
  D: DirectoryStore,
  A: ProfileAuthority,
{
  pub fn new(directory: Arc<D>, authority: Arc<A>, base_url: impl Into<String>) -> Self {
    Self { directory, authority, base_url: base_url.into() }
  }

  // ── View operations ───────────────────────────────────────────────────

  /// The complete gated view: every category, both image URLs, and the
  /// derived properties. A missing record yields a minimal view (display
  /// name plus default image URLs) with no gating — there is nothing
  /// sensitive to show.
  pub async fn full_view(
    &self,
    viewer: Option<Uuid>,
    user_id: &str,
  ) -> Result<Option<ProfileView>> {
    self.assemble(viewer, user_id, &FULL).await
  }

  /// Canonical id, display name, thumbnail URL, and the status fields if
  /// the status gate is open. Never reads the person record.
  pub async fn minimal_view(
    &self,
    viewer: Option<Uuid>,
    user_id: &str,
  ) -> Result<Option<ProfileView>> {
    self.assemble(viewer, user_id, &MINIMAL).await
  }

  /// Staff and student categories plus the full-size image URL.
  pub async fn academic_view(
    &self,
    viewer: Option<Uuid>,
    user_id: &str,
  ) -> Result<Option<ProfileView>> {
    self.assemble(viewer, user_id, &ACADEMIC).await
  }

  /// The gated view narrowed to the older profile schema: no images, and
  /// date-of-birth, course, subjects and the favourite fields are always
  /// cleared afterwards regardless of gate outcomes.
  pub async fn legacy_view(
    &self,
    viewer: Option<Uuid>,
    user_id: &str,
  ) -> Result<Option<ProfileView>> {
    self.assemble(viewer, user_id, &LEGACY).await
  }

  /// The target's connection list, or an empty list when the friends-list
  /// gate is closed for this viewer. `None` if the target is unresolvable.
  pub async fn connections(
    &self,
    viewer: Option<Uuid>,
    user_id: &str,
  ) -> Result<Option<Vec<Connection>>> {
    let viewer = viewer.ok_or(Error::Unauthenticated)?;
    let Some(target) = self.resolve(user_id).await? else {
      return Ok(None);
    };

    let open = if viewer == target {
      true
    } else {
      let privacy = self
        .authority
        .privacy_settings(target)
        .await
        .map_err(Error::authority)?;
      let friend = self
        .authority
        .is_connected(target, viewer)
        .await
        .map_err(Error::authority)?;
      self
        .authority
        .friends_list_visible(target, &privacy, viewer, friend)
        .await
        .map_err(Error::authority)?
    };

    if !open {
      debug!(%target, %viewer, "connection list not visible to viewer");
      return Ok(Some(Vec::new()));
    }
    let connections = self
      .authority
      .connections(target)
      .await
      .map_err(Error::authority)?;
    Ok(Some(connections))
  }

  // ── Existence probes ──────────────────────────────────────────────────

  /// Whether a directory account exists for the identifier. Resolution
  /// failure reports `false`, never an error. Requires no viewer.
  pub async fn user_exists(&self, user_id: &str) -> Result<bool> {
    match self.resolve(user_id).await? {
      Some(uuid) => self.directory.user_exists(uuid).await.map_err(Error::directory),
      None => Ok(false),
    }
  }

  /// Whether a stored person record exists for the identifier.
  pub async fn profile_exists(&self, user_id: &str) -> Result<bool> {
    match self.resolve(user_id).await? {
      Some(uuid) => {
        let record = self.directory.person(uuid).await.map_err(Error::directory)?;
        Ok(record.is_some())
      }
      None => Ok(false),
    }
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist the view's editable fields back onto the owner's person
  /// record, creating one if absent. Only the owner may save; persistence
  /// failure is `Ok(false)`.
  pub async fn save(&self, viewer: Option<Uuid>, view: &ProfileView) -> Result<bool> {
    let viewer = viewer.ok_or(Error::Unauthenticated)?;
    if view.user_uuid != Some(viewer) {
      return Err(Error::NotProfileOwner(viewer));
    }
    self.persist(viewer, view).await
  }

  /// Create a fresh minimal record for the identified user. Refuses
  /// (`Ok(false)`) when a record already exists; only the user themselves
  /// may create one.
  pub async fn create_for(&self, viewer: Option<Uuid>, user_id: &str) -> Result<bool> {
    let viewer = viewer.ok_or(Error::Unauthenticated)?;
    let Some(target) = self.resolve(user_id).await? else {
      return Ok(false);
    };
    if target != viewer {
      return Err(Error::NotProfileOwner(viewer));
    }
    let existing = self.directory.person(target).await.map_err(Error::directory)?;
    if existing.is_some() {
      warn!(%target, "person record already exists, refusing to create another");
      return Ok(false);
    }
    let view = self.prototype(target).await?;
    self.persist(target, &view).await
  }

  /// Create from a caller-supplied view. Refuses (`Ok(false)`) when the
  /// view carries no target uuid or a record already exists; otherwise
  /// delegates to [`save`](Self::save).
  pub async fn create_from(&self, viewer: Option<Uuid>, view: &ProfileView) -> Result<bool> {
    let Some(target) = view.user_uuid else {
      return Ok(false);
    };
    let existing = self.directory.person(target).await.map_err(Error::directory)?;
    if existing.is_some() {
      warn!(%target, "person record already exists, refusing to create another");
      return Ok(false);
    }
    self.save(viewer, view).await
  }

  // ── Assembly ──────────────────────────────────────────────────────────

  async fn assemble(
    &self,
    viewer: Option<Uuid>,
    user_id: &str,
    spec: &ViewSpec,
  ) -> Result<Option<ProfileView>> {
    let viewer = viewer.ok_or(Error::Unauthenticated)?;
    let Some(target) = self.resolve(user_id).await? else {
      return Ok(None);
    };

    let record = if spec.reads_record {
      self.directory.person(target).await.map_err(Error::directory)?
    } else {
      None
    };

    let mut view = self.prototype(target).await?;

    // No stored record: nothing sensitive to gate. The full view still
    // carries the (default) image URLs; the others return the bare
    // prototype.
    if spec.reads_record && record.is_none() {
      debug!(%target, view = spec.label, "no person record, returning prototype");
      if spec.images_on_missing {
        self.attach_images(&mut view, target, spec.images);
      }
      return Ok(Some(view));
    }

    let self_view = viewer == target;
    let (privacy, friend) = if self_view {
      // Self-view bypasses every gate; the authority is never consulted.
      (PrivacySettings::default(), false)
    } else {
      let privacy = self
        .authority
        .privacy_settings(target)
        .await
        .map_err(Error::authority)?;
      let friend = self
        .authority
        .is_connected(target, viewer)
        .await
        .map_err(Error::authority)?;
      (privacy, friend)
    };

    for category in spec.categories {
      let open = self_view
        || self.gate_open(*category, target, &privacy, viewer, friend).await?;
      if open {
        self
          .populate(&mut view, *category, target, record.as_ref(), spec.social)
          .await?;
      } else {
        debug!(%target, %viewer, ?category, "category not visible to viewer");
      }
    }

    self.attach_images(&mut view, target, spec.images);

    if spec.properties && !self_view {
      let preferences = self
        .authority
        .preference_settings(target)
        .await
        .map_err(Error::authority)?;
      view.set_property(PROP_BIRTH_YEAR_VISIBLE, privacy.show_birth_year);
      view.set_property(PROP_EMAIL_CONFIRM_ENABLED, preferences.confirm_email_enabled);
      view.set_property(PROP_EMAIL_REQUEST_ENABLED, preferences.request_email_enabled);
    }

    if spec.truncate {
      // Fields the legacy profile schema never carried.
      view.date_of_birth = None;
      view.course = None;
      view.subjects = None;
      view.favourite_books = None;
      view.favourite_tv_shows = None;
      view.favourite_movies = None;
      view.favourite_quotes = None;
    }

    Ok(Some(view))
  }

  /// Resolve a user-supplied identifier; a miss is logged and soft.
  async fn resolve(&self, user_id: &str) -> Result<Option<Uuid>> {
    let resolved = self
      .directory
      .resolve_user(user_id)
      .await
      .map_err(Error::directory)?;
    if resolved.is_none() {
      warn!(user_id, "could not resolve user identifier");
    }
    Ok(resolved)
  }

  /// The minimum a view can be: canonical id plus display name.
  async fn prototype(&self, target: Uuid) -> Result<ProfileView> {
    let mut view = ProfileView::default();
    view.user_uuid = Some(target);
    view.display_name = self
      .directory
      .display_name(target)
      .await
      .map_err(Error::directory)?;
    Ok(view)
  }

  async fn gate_open(
    &self,
    category: Category,
    target: Uuid,
    privacy: &PrivacySettings,
    viewer: Uuid,
    friend: bool,
  ) -> Result<bool> {
    let a = &self.authority;
    let open = match category {
      Category::Basic => a.basic_info_visible(target, privacy, viewer, friend).await,
      Category::Contact => a.contact_info_visible(target, privacy, viewer, friend).await,
      Category::Staff => a.staff_info_visible(target, privacy, viewer, friend).await,
      Category::Student => a.student_info_visible(target, privacy, viewer, friend).await,
      Category::Personal => a.personal_info_visible(target, privacy, viewer, friend).await,
      Category::Business => a.business_info_visible(target, privacy, viewer, friend).await,
      Category::Status => a.status_visible(target, privacy, viewer, friend).await,
    };
    open.map_err(Error::authority)
  }

  /// Copy one category's field group onto the view.
  async fn populate(
    &self,
    view: &mut ProfileView,
    category: Category,
    target: Uuid,
    record: Option<&PersonRecord>,
    social: bool,
  ) -> Result<()> {
    match category {
      Category::Basic => {
        if let Some(r) = record {
          view.nickname = r.nickname.clone();
          view.date_of_birth = r.date_of_birth;
        }
      }

      Category::Contact => {
        if let Some(r) = record {
          view.email = self.directory.email(target).await.map_err(Error::directory)?;
          view.homepage = r.homepage.clone();
          view.work_phone = r.work_phone.clone();
          view.home_phone = r.home_phone.clone();
          view.mobile_phone = r.mobile_phone.clone();
          view.facsimile = r.facsimile.clone();
        }
      }

      Category::Staff => {
        if let Some(r) = record {
          view.department = r.department.clone();
          view.position = r.position.clone();
          view.school = r.school.clone();
          view.room = r.room.clone();
          view.staff_profile = r.staff_profile.clone();
          view.academic_profile_url = r.academic_profile_url.clone();
          view.university_profile_url = r.university_profile_url.clone();
          view.publications = r.publications.clone();
        }
      }

      Category::Student => {
        if let Some(r) = record {
          view.course = r.course.clone();
          view.subjects = r.subjects.clone();
        }
      }

      Category::Personal => {
        if let Some(r) = record {
          view.favourite_books = r.favourite_books.clone();
          view.favourite_tv_shows = r.favourite_tv_shows.clone();
          view.favourite_movies = r.favourite_movies.clone();
          view.favourite_quotes = r.favourite_quotes.clone();
          view.other_information = r.other_information.clone();
        }
        if social {
          let info = self
            .authority
            .social_networking(target)
            .await
            .map_err(Error::authority)?;
          if let Some(info) = info {
            view.facebook_username = info.facebook_username;
            view.linkedin_username = info.linkedin_username;
            view.myspace_username = info.myspace_username;
            view.skype_username = info.skype_username;
            view.twitter_username = info.twitter_username;
          }
        }
      }

      Category::Business => {
        if let Some(r) = record {
          view.business_biography = r.business_biography.clone();
        }
        view.company_profiles = self
          .authority
          .company_profiles(target)
          .await
          .map_err(Error::authority)?;
      }

      Category::Status => {
        let status = self.authority.status(target).await.map_err(Error::authority)?;
        if let Some(status) = status {
          view.status_date_formatted =
            Some(format_status_date(status.date_added, Utc::now()));
          view.status_message = Some(status.message);
          view.status_date = Some(status.date_added);
        }
      }
    }
    Ok(())
  }

  fn attach_images(&self, view: &mut ProfileView, target: Uuid, images: Images) {
    match images {
      Images::Both => {
        view.image_url = Some(self.image_url(target));
        view.image_thumb_url = Some(self.image_thumb_url(target));
      }
      Images::ThumbOnly => {
        view.image_thumb_url = Some(self.image_thumb_url(target));
      }
      Images::FullOnly => {
        view.image_url = Some(self.image_url(target));
      }
      Images::None => {}
    }
  }

  // The image endpoints do their own access checks and fall back to a
  // default picture, so the URLs attach to any view without gating.

  fn image_url(&self, target: Uuid) -> String {
    format!("{}/direct/profile/{}/image/", self.base_url, target)
  }

  fn image_thumb_url(&self, target: Uuid) -> String {
    format!("{}/direct/profile/{}/image/thumb/", self.base_url, target)
  }

  /// Fetch-or-create the owner's record, merge the view onto it, persist.
  async fn persist(&self, owner: Uuid, view: &ProfileView) -> Result<bool> {
    let existing = self.directory.person(owner).await.map_err(Error::directory)?;
    let mut record = match existing {
      Some(r) => r,
      None => self
        .directory
        .create_person(owner)
        .await
        .map_err(Error::directory)?
        .ok_or(Error::RecordCreation(owner))?,
    };
    merge_view_into_record(view, &mut record);
    self.directory.update_person(&record).await.map_err(Error::directory)
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Map the view's editable fields back onto the person record. Display name,
/// email, images, status and business extras are owned elsewhere and are not
/// written here.
fn merge_view_into_record(view: &ProfileView, record: &mut PersonRecord) {
  record.nickname = view.nickname.clone();
  record.date_of_birth = view.date_of_birth;

  record.homepage = view.homepage.clone();
  record.work_phone = view.work_phone.clone();
  record.home_phone = view.home_phone.clone();
  record.mobile_phone = view.mobile_phone.clone();
  record.facsimile = view.facsimile.clone();

  record.department = view.department.clone();
  record.position = view.position.clone();
  record.school = view.school.clone();
  record.room = view.room.clone();

  record.course = view.course.clone();
  record.subjects = view.subjects.clone();

  record.favourite_books = view.favourite_books.clone();
  record.favourite_tv_shows = view.favourite_tv_shows.clone();
  record.favourite_movies = view.favourite_movies.clone();
  record.favourite_quotes = view.favourite_quotes.clone();
  record.other_information = view.other_information.clone();
}

/// Humanize a status timestamp relative to `now`.
fn format_status_date(posted: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let date = posted.date_naive();
  let today = now.date_naive();
  if date == today {
    format!("Today @ {}", posted.format("%-I:%M %p"))
  } else if today.pred_opt() == Some(date) {
    format!("Yesterday @ {}", posted.format("%-I:%M %p"))
  } else {
    posted.format("%-d %B %Y").to_string()
  }
}

#[cfg(test)]
mod format_tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn same_day_formats_as_today() {
    let now = Utc.with_ymd_and_hms(2026, 3, 12, 18, 0, 0).unwrap();
    let posted = Utc.with_ymd_and_hms(2026, 3, 12, 14, 5, 0).unwrap();
    assert_eq!(format_status_date(posted, now), "Today @ 2:05 PM");
  }

  #[test]
  fn previous_day_formats_as_yesterday() {
    let now = Utc.with_ymd_and_hms(2026, 3, 12, 1, 0, 0).unwrap();
    let posted = Utc.with_ymd_and_hms(2026, 3, 11, 23, 30, 0).unwrap();
    assert_eq!(format_status_date(posted, now), "Yesterday @ 11:30 PM");
  }

  #[test]
  fn older_dates_format_as_plain_date() {
    let now = Utc.with_ymd_and_hms(2026, 3, 12, 12, 0, 0).unwrap();
    let posted = Utc.with_ymd_and_hms(2025, 12, 3, 9, 0, 0).unwrap();
    assert_eq!(format_status_date(posted, now), "3 December 2025");
  }
}
