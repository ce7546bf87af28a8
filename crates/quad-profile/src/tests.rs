//! Assembler tests against the in-memory backend.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use quad_core::{
  Error,
  authority::{CompanyProfile, ProfileStatus, SocialNetworkingInfo},
  directory::DirectoryStore as _,
  person::PersonRecord,
  privacy::{PrivacyLevel, PrivacySettings},
  view::{
    PROP_BIRTH_YEAR_VISIBLE, PROP_EMAIL_CONFIRM_ENABLED,
    PROP_EMAIL_REQUEST_ENABLED, ProfileView,
  },
};
use quad_store_mem::MemStore;
use uuid::Uuid;

use crate::ProfileService;

const BASE_URL: &str = "http://campus.example.edu";

fn service() -> (ProfileService<MemStore, MemStore>, Arc<MemStore>) {
  let store = Arc::new(MemStore::new());
  let service = ProfileService::new(store.clone(), store.clone(), BASE_URL);
  (service, store)
}

/// A record with every field populated, for mirror/null assertions.
fn full_record(user_uuid: Uuid) -> PersonRecord {
  PersonRecord {
    user_uuid,
    nickname: Some("Al".to_string()),
    date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 4),
    homepage: Some("http://alice.example.edu".to_string()),
    work_phone: Some("01524 590000".to_string()),
    home_phone: Some("01524 590001".to_string()),
    mobile_phone: Some("07700 900000".to_string()),
    facsimile: Some("01524 590002".to_string()),
    department: Some("Computing".to_string()),
    position: Some("Lecturer".to_string()),
    school: Some("Science and Technology".to_string()),
    room: Some("C12".to_string()),
    staff_profile: Some("Researches distributed systems.".to_string()),
    academic_profile_url: Some("http://academic.example.edu/al".to_string()),
    university_profile_url: Some("http://uni.example.edu/al".to_string()),
    publications: Some("Several".to_string()),
    course: Some("PhD Computing".to_string()),
    subjects: Some("Networks, Storage".to_string()),
    favourite_books: Some("Dune".to_string()),
    favourite_tv_shows: Some("The Wire".to_string()),
    favourite_movies: Some("Brazil".to_string()),
    favourite_quotes: Some("Be curious".to_string()),
    other_information: Some("Keeps bees".to_string()),
    business_biography: Some("Founded a beekeeping co-op.".to_string()),
  }
}

/// Seed a user with a fully-populated record plus authority-owned extras.
fn seed_full_user(store: &MemStore, eid: &str, name: &str) -> Uuid {
  let uuid = store.add_user(eid, name, Some("owner@campus.example.edu")).unwrap();
  store.put_person(full_record(uuid)).unwrap();
  store
    .put_status(uuid, ProfileStatus {
      message:    "marking exams".to_string(),
      date_added: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
    })
    .unwrap();
  store
    .put_social(uuid, SocialNetworkingInfo {
      twitter_username: Some("@al".to_string()),
      skype_username: Some("al.smith".to_string()),
      ..SocialNetworkingInfo::default()
    })
    .unwrap();
  store
    .put_company_profiles(uuid, vec![CompanyProfile {
      company_name: Some("Bee Co-op".to_string()),
      description:  Some("Honey".to_string()),
      web_address:  None,
    }])
    .unwrap();
  uuid
}

fn all_closed() -> PrivacySettings {
  PrivacySettings {
    basic_info:    PrivacyLevel::OnlyMe,
    contact_info:  PrivacyLevel::OnlyMe,
    staff_info:    PrivacyLevel::OnlyMe,
    student_info:  PrivacyLevel::OnlyMe,
    personal_info: PrivacyLevel::OnlyMe,
    business_info: PrivacyLevel::OnlyMe,
    my_status:     PrivacyLevel::OnlyMe,
    my_friends:    PrivacyLevel::OnlyMe,
    show_birth_year: false,
  }
}

// ─── Authentication ──────────────────────────────────────────────────────────

#[tokio::test]
async fn viewer_scoped_reads_require_authentication() {
  let (service, store) = service();
  store.add_user("asmith", "Alice Smith", None).unwrap();

  assert!(matches!(
    service.full_view(None, "asmith").await,
    Err(Error::Unauthenticated)
  ));
  assert!(matches!(
    service.minimal_view(None, "asmith").await,
    Err(Error::Unauthenticated)
  ));
  assert!(matches!(
    service.academic_view(None, "asmith").await,
    Err(Error::Unauthenticated)
  ));
  assert!(matches!(
    service.legacy_view(None, "asmith").await,
    Err(Error::Unauthenticated)
  ));
  assert!(matches!(
    service.connections(None, "asmith").await,
    Err(Error::Unauthenticated)
  ));
}

#[tokio::test]
async fn existence_probe_needs_no_viewer() {
  let (service, store) = service();
  store.add_user("asmith", "Alice Smith", None).unwrap();

  assert!(service.user_exists("asmith").await.unwrap());
  assert!(!service.user_exists("ghost").await.unwrap());
}

// ─── Resolution ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_alias_is_a_soft_miss() {
  let (service, store) = service();
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();

  assert!(service.full_view(Some(viewer), "ghost").await.unwrap().is_none());
  assert!(service.connections(Some(viewer), "ghost").await.unwrap().is_none());
}

// ─── Self-view ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn self_view_bypasses_every_gate() {
  let (service, store) = service();
  let owner = seed_full_user(&store, "asmith", "Alice Smith");
  // Everything locked down; the owner still sees it all.
  store.put_privacy(owner, all_closed()).unwrap();

  let view = service
    .full_view(Some(owner), "asmith")
    .await
    .unwrap()
    .expect("own profile");

  assert_eq!(view.user_uuid, Some(owner));
  assert_eq!(view.display_name.as_deref(), Some("Alice Smith"));
  assert_eq!(view.nickname.as_deref(), Some("Al"));
  assert_eq!(view.email.as_deref(), Some("owner@campus.example.edu"));
  assert_eq!(view.department.as_deref(), Some("Computing"));
  assert_eq!(view.course.as_deref(), Some("PhD Computing"));
  assert_eq!(view.favourite_books.as_deref(), Some("Dune"));
  assert_eq!(view.twitter_username.as_deref(), Some("@al"));
  assert_eq!(view.business_biography.as_deref(), Some("Founded a beekeeping co-op."));
  assert_eq!(view.company_profiles.len(), 1);
  assert_eq!(view.status_message.as_deref(), Some("marking exams"));
  assert!(view.status_date_formatted.is_some());
  assert!(view.image_url.is_some());
  assert!(view.image_thumb_url.is_some());
  // Derived properties are only for other viewers.
  assert!(view.properties.is_empty());
}

// ─── Gates ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn open_gates_mirror_the_record_exactly() {
  let (service, store) = service();
  let target = seed_full_user(&store, "asmith", "Alice Smith");
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();

  let view = service
    .full_view(Some(viewer), "asmith")
    .await
    .unwrap()
    .expect("profile");

  let record = full_record(target);
  assert_eq!(view.nickname, record.nickname);
  assert_eq!(view.date_of_birth, record.date_of_birth);
  assert_eq!(view.homepage, record.homepage);
  assert_eq!(view.work_phone, record.work_phone);
  assert_eq!(view.staff_profile, record.staff_profile);
  assert_eq!(view.subjects, record.subjects);
  assert_eq!(view.favourite_quotes, record.favourite_quotes);
  assert_eq!(view.other_information, record.other_information);
  assert_eq!(view.business_biography, record.business_biography);
  // Email is an account attribute, not a record field.
  assert_eq!(view.email.as_deref(), Some("owner@campus.example.edu"));
}

#[tokio::test]
async fn closed_gates_null_their_field_group_and_nothing_else() {
  let (service, store) = service();
  let target = seed_full_user(&store, "asmith", "Alice Smith");
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();
  store
    .put_privacy(target, PrivacySettings {
      contact_info: PrivacyLevel::OnlyMe,
      student_info: PrivacyLevel::OnlyMe,
      ..PrivacySettings::default()
    })
    .unwrap();

  let view = service
    .full_view(Some(viewer), "asmith")
    .await
    .unwrap()
    .expect("profile");

  // Closed groups are absent…
  assert!(view.email.is_none());
  assert!(view.homepage.is_none());
  assert!(view.work_phone.is_none());
  assert!(view.home_phone.is_none());
  assert!(view.mobile_phone.is_none());
  assert!(view.facsimile.is_none());
  assert!(view.course.is_none());
  assert!(view.subjects.is_none());
  // …while their neighbours are untouched.
  assert_eq!(view.nickname.as_deref(), Some("Al"));
  assert_eq!(view.department.as_deref(), Some("Computing"));
  assert_eq!(view.favourite_books.as_deref(), Some("Dune"));
}

#[tokio::test]
async fn connections_level_gates_open_for_friends_only() {
  let (service, store) = service();
  let target = seed_full_user(&store, "asmith", "Alice Smith");
  let friend = store.add_user("bjones", "Bob Jones", None).unwrap();
  let stranger = store.add_user("cdoe", "Carol Doe", None).unwrap();
  store.connect(target, friend).unwrap();
  store
    .put_privacy(target, PrivacySettings {
      personal_info: PrivacyLevel::Connections,
      ..PrivacySettings::default()
    })
    .unwrap();

  let for_friend = service
    .full_view(Some(friend), "asmith")
    .await
    .unwrap()
    .expect("profile");
  assert_eq!(for_friend.favourite_books.as_deref(), Some("Dune"));
  assert_eq!(for_friend.twitter_username.as_deref(), Some("@al"));

  let for_stranger = service
    .full_view(Some(stranger), "asmith")
    .await
    .unwrap()
    .expect("profile");
  assert!(for_stranger.favourite_books.is_none());
  // The personal gate also withholds the social handles.
  assert!(for_stranger.twitter_username.is_none());
  assert!(for_stranger.skype_username.is_none());
}

#[tokio::test]
async fn closed_business_gate_withholds_biography_and_companies() {
  let (service, store) = service();
  let target = seed_full_user(&store, "asmith", "Alice Smith");
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();
  store
    .put_privacy(target, PrivacySettings {
      business_info: PrivacyLevel::OnlyMe,
      ..PrivacySettings::default()
    })
    .unwrap();

  let view = service
    .full_view(Some(viewer), "asmith")
    .await
    .unwrap()
    .expect("profile");
  assert!(view.business_biography.is_none());
  assert!(view.company_profiles.is_empty());
}

// ─── The all-closed-except-status scenario ───────────────────────────────────

#[tokio::test]
async fn all_gates_closed_except_status_leaves_only_the_skeleton() {
  let (service, store) = service();
  let target = seed_full_user(&store, "u2", "User Two");
  let viewer = store.add_user("u1", "User One", None).unwrap();
  let mut privacy = all_closed();
  privacy.my_status = PrivacyLevel::Everyone;
  store.put_privacy(target, privacy).unwrap();

  let view = service
    .full_view(Some(viewer), "u2")
    .await
    .unwrap()
    .expect("profile");

  // Populated: identity, computed urls, status.
  assert_eq!(view.user_uuid, Some(target));
  assert_eq!(view.display_name.as_deref(), Some("User Two"));
  assert_eq!(
    view.image_url.as_deref(),
    Some(format!("{BASE_URL}/direct/profile/{target}/image/").as_str())
  );
  assert_eq!(
    view.image_thumb_url.as_deref(),
    Some(format!("{BASE_URL}/direct/profile/{target}/image/thumb/").as_str())
  );
  assert_eq!(view.status_message.as_deref(), Some("marking exams"));
  assert!(view.status_date.is_some());
  assert!(view.status_date_formatted.is_some());

  // Everything else is null.
  assert!(view.nickname.is_none());
  assert!(view.date_of_birth.is_none());
  assert!(view.email.is_none());
  assert!(view.homepage.is_none());
  assert!(view.work_phone.is_none());
  assert!(view.home_phone.is_none());
  assert!(view.mobile_phone.is_none());
  assert!(view.facsimile.is_none());
  assert!(view.department.is_none());
  assert!(view.position.is_none());
  assert!(view.school.is_none());
  assert!(view.room.is_none());
  assert!(view.staff_profile.is_none());
  assert!(view.academic_profile_url.is_none());
  assert!(view.university_profile_url.is_none());
  assert!(view.publications.is_none());
  assert!(view.course.is_none());
  assert!(view.subjects.is_none());
  assert!(view.favourite_books.is_none());
  assert!(view.favourite_tv_shows.is_none());
  assert!(view.favourite_movies.is_none());
  assert!(view.favourite_quotes.is_none());
  assert!(view.other_information.is_none());
  assert!(view.facebook_username.is_none());
  assert!(view.linkedin_username.is_none());
  assert!(view.myspace_username.is_none());
  assert!(view.skype_username.is_none());
  assert!(view.twitter_username.is_none());
  assert!(view.business_biography.is_none());
  assert!(view.company_profiles.is_empty());
}

// ─── Derived properties ──────────────────────────────────────────────────────

#[tokio::test]
async fn full_view_carries_derived_properties_for_other_viewers() {
  let (service, store) = service();
  let target = seed_full_user(&store, "asmith", "Alice Smith");
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();
  store
    .put_privacy(target, PrivacySettings { show_birth_year: false, ..PrivacySettings::default() })
    .unwrap();

  let view = service
    .full_view(Some(viewer), "asmith")
    .await
    .unwrap()
    .expect("profile");

  assert_eq!(view.property(PROP_BIRTH_YEAR_VISIBLE), Some("false"));
  assert_eq!(view.property(PROP_EMAIL_CONFIRM_ENABLED), Some("true"));
  assert_eq!(view.property(PROP_EMAIL_REQUEST_ENABLED), Some("true"));
}

// ─── Missing records ─────────────────────────────────────────────────────────

#[tokio::test]
async fn full_view_of_recordless_user_is_minimal_with_images() {
  let (service, store) = service();
  let target = store.add_user("new", "New User", Some("new@campus.example.edu")).unwrap();
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();

  let view = service
    .full_view(Some(viewer), "new")
    .await
    .unwrap()
    .expect("prototype");

  assert_eq!(view.user_uuid, Some(target));
  assert_eq!(view.display_name.as_deref(), Some("New User"));
  assert!(view.image_url.is_some());
  assert!(view.image_thumb_url.is_some());
  // No record means nothing else, not even the account email.
  assert!(view.email.is_none());
  assert!(view.status_message.is_none());
}

#[tokio::test]
async fn academic_view_of_recordless_user_is_a_bare_prototype() {
  let (service, store) = service();
  store.add_user("new", "New User", None).unwrap();
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();

  let view = service
    .academic_view(Some(viewer), "new")
    .await
    .unwrap()
    .expect("prototype");
  assert_eq!(view.display_name.as_deref(), Some("New User"));
  assert!(view.image_url.is_none());
  assert!(view.image_thumb_url.is_none());
}

// ─── View shapes ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn minimal_view_is_identity_thumbnail_and_status() {
  let (service, store) = service();
  let target = seed_full_user(&store, "asmith", "Alice Smith");
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();

  let view = service
    .minimal_view(Some(viewer), "asmith")
    .await
    .unwrap()
    .expect("profile");

  assert_eq!(view.user_uuid, Some(target));
  assert_eq!(view.display_name.as_deref(), Some("Alice Smith"));
  assert!(view.image_thumb_url.is_some());
  assert!(view.image_url.is_none());
  assert_eq!(view.status_message.as_deref(), Some("marking exams"));
  // Record-backed fields never appear, whatever the record holds.
  assert!(view.nickname.is_none());
  assert!(view.email.is_none());
  assert!(view.department.is_none());
}

#[tokio::test]
async fn minimal_view_respects_the_status_gate() {
  let (service, store) = service();
  let target = seed_full_user(&store, "asmith", "Alice Smith");
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();
  store
    .put_privacy(target, PrivacySettings {
      my_status: PrivacyLevel::OnlyMe,
      ..PrivacySettings::default()
    })
    .unwrap();

  let view = service
    .minimal_view(Some(viewer), "asmith")
    .await
    .unwrap()
    .expect("profile");
  assert!(view.status_message.is_none());
  assert!(view.status_date.is_none());
}

#[tokio::test]
async fn academic_view_is_staff_student_and_full_image() {
  let (service, store) = service();
  seed_full_user(&store, "asmith", "Alice Smith");
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();

  let view = service
    .academic_view(Some(viewer), "asmith")
    .await
    .unwrap()
    .expect("profile");

  assert_eq!(view.department.as_deref(), Some("Computing"));
  assert_eq!(view.publications.as_deref(), Some("Several"));
  assert_eq!(view.course.as_deref(), Some("PhD Computing"));
  assert!(view.image_url.is_some());
  assert!(view.image_thumb_url.is_none());
  // No status, personal, contact or basic content.
  assert!(view.status_message.is_none());
  assert!(view.favourite_books.is_none());
  assert!(view.email.is_none());
  assert!(view.nickname.is_none());
}

#[tokio::test]
async fn legacy_view_always_clears_the_truncated_fields() {
  let (service, store) = service();
  let target = seed_full_user(&store, "asmith", "Alice Smith");
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();

  for who in [viewer, target] {
    let view = service
      .legacy_view(Some(who), "asmith")
      .await
      .unwrap()
      .expect("profile");

    // The legacy schema never carried these, gates notwithstanding.
    assert!(view.date_of_birth.is_none());
    assert!(view.course.is_none());
    assert!(view.subjects.is_none());
    assert!(view.favourite_books.is_none());
    assert!(view.favourite_tv_shows.is_none());
    assert!(view.favourite_movies.is_none());
    assert!(view.favourite_quotes.is_none());

    // What it did carry is intact.
    assert_eq!(view.nickname.as_deref(), Some("Al"));
    assert_eq!(view.email.as_deref(), Some("owner@campus.example.edu"));
    assert_eq!(view.staff_profile.as_deref(), Some("Researches distributed systems."));
    assert_eq!(view.other_information.as_deref(), Some("Keeps bees"));

    // And it has no images or status.
    assert!(view.image_url.is_none());
    assert!(view.image_thumb_url.is_none());
    assert!(view.status_message.is_none());
  }
}

// ─── Connections ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn connection_list_is_empty_when_the_gate_is_closed() {
  let (service, store) = service();
  let target = seed_full_user(&store, "asmith", "Alice Smith");
  let friend = store.add_user("bjones", "Bob Jones", None).unwrap();
  let stranger = store.add_user("cdoe", "Carol Doe", None).unwrap();
  store.connect(target, friend).unwrap();
  store
    .put_privacy(target, PrivacySettings {
      my_friends: PrivacyLevel::Connections,
      ..PrivacySettings::default()
    })
    .unwrap();

  let for_friend = service
    .connections(Some(friend), "asmith")
    .await
    .unwrap()
    .expect("list");
  assert_eq!(for_friend.len(), 1);
  assert_eq!(for_friend[0].display_name, "Bob Jones");

  let for_stranger = service
    .connections(Some(stranger), "asmith")
    .await
    .unwrap()
    .expect("list");
  assert!(for_stranger.is_empty());
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_rejects_other_viewers() {
  let (service, store) = service();
  let target = seed_full_user(&store, "asmith", "Alice Smith");
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();

  let view = ProfileView { user_uuid: Some(target), ..ProfileView::default() };
  assert!(matches!(
    service.save(Some(viewer), &view).await,
    Err(Error::NotProfileOwner(v)) if v == viewer
  ));
  assert!(matches!(
    service.save(None, &view).await,
    Err(Error::Unauthenticated)
  ));
}

#[tokio::test]
async fn save_merges_editable_fields_onto_the_record() {
  let (service, store) = service();
  let owner = seed_full_user(&store, "asmith", "Alice Smith");

  let mut view = service
    .full_view(Some(owner), "asmith")
    .await
    .unwrap()
    .expect("own profile");
  view.nickname = Some("Ali".to_string());
  view.room = None;

  assert!(service.save(Some(owner), &view).await.unwrap());

  let record = store.person(owner).await.unwrap().expect("record");
  assert_eq!(record.nickname.as_deref(), Some("Ali"));
  assert!(record.room.is_none());
  // Fields owned elsewhere are untouched by a save.
  assert_eq!(record.business_biography.as_deref(), Some("Founded a beekeeping co-op."));
}

#[tokio::test]
async fn save_creates_a_record_when_none_exists() {
  let (service, store) = service();
  let owner = store.add_user("new", "New User", None).unwrap();

  let view = ProfileView {
    user_uuid: Some(owner),
    nickname:  Some("Newbie".to_string()),
    ..ProfileView::default()
  };
  assert!(service.save(Some(owner), &view).await.unwrap());

  let record = store.person(owner).await.unwrap().expect("record");
  assert_eq!(record.nickname.as_deref(), Some("Newbie"));
}

#[tokio::test]
async fn save_escalates_when_no_record_can_be_created() {
  let (service, _store) = service();
  // A uuid the directory has never heard of: the backend refuses to
  // instantiate a record for it.
  let ghost = Uuid::new_v4();
  let view = ProfileView { user_uuid: Some(ghost), ..ProfileView::default() };

  assert!(matches!(
    service.save(Some(ghost), &view).await,
    Err(Error::RecordCreation(u)) if u == ghost
  ));
}

#[tokio::test]
async fn create_by_id_succeeds_once_then_refuses() {
  let (service, store) = service();
  let owner = store.add_user("new", "New User", None).unwrap();

  assert!(service.create_for(Some(owner), "new").await.unwrap());
  assert!(!service.create_for(Some(owner), "new").await.unwrap());
  assert!(service.profile_exists("new").await.unwrap());
}

#[tokio::test]
async fn create_by_id_is_self_service_only() {
  let (service, store) = service();
  store.add_user("new", "New User", None).unwrap();
  let viewer = store.add_user("viewer", "A Viewer", None).unwrap();

  assert!(matches!(
    service.create_for(Some(viewer), "new").await,
    Err(Error::NotProfileOwner(v)) if v == viewer
  ));
  // Unresolvable targets are a soft refusal, not an error.
  assert!(!service.create_for(Some(viewer), "ghost").await.unwrap());
}

#[tokio::test]
async fn create_from_view_guards_uuid_and_duplicates() {
  let (service, store) = service();
  let owner = store.add_user("new", "New User", None).unwrap();

  // No uuid in the view: refused outright.
  assert!(
    !service
      .create_from(Some(owner), &ProfileView::default())
      .await
      .unwrap()
  );

  let view = ProfileView {
    user_uuid: Some(owner),
    nickname:  Some("Newbie".to_string()),
    ..ProfileView::default()
  };
  assert!(service.create_from(Some(owner), &view).await.unwrap());
  // A second create against the now-existing record is refused.
  assert!(!service.create_from(Some(owner), &view).await.unwrap());
}
