//! HTML fragment renderer for profile views.
//!
//! A pure function of an already-filtered [`ProfileView`] — no gating
//! happens here; rendering trusts the assembler. Block order and
//! conditional presence are load-bearing: the formatted profile widget
//! styles blocks positionally, so they must come out in exactly this
//! sequence, and blank or whitespace-only values are skipped entirely.

use quad_core::view::ProfileView;

/// Stylesheet linked at the end of every rendered fragment.
pub const PROFILE_STYLESHEET: &str = "/quad-profile/css/profile-entity.css";

// ─── Escaping ────────────────────────────────────────────────────────────────

/// Escape a value for use in HTML text or attribute position.
fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

/// `Some(value)` only when the field is present and not whitespace-only.
fn non_blank(field: &Option<String>) -> Option<&str> {
  field.as_deref().filter(|s| !s.trim().is_empty())
}

// ─── Labels ──────────────────────────────────────────────────────────────────

/// Human-readable label for a field block.
fn field_label(field: &str) -> &'static str {
  match field {
    "userUuid" => "User ID",
    "nickname" => "Nickname",
    "email" => "Email",
    "homepage" => "Homepage",
    "homephone" => "Home phone",
    "workphone" => "Work phone",
    "mobilephone" => "Mobile phone",
    "facsimile" => "Fax",
    "position" => "Position",
    "department" => "Department",
    "school" => "School",
    "room" => "Room",
    "course" => "Degree course",
    "subjects" => "Subjects",
    "favouriteBooks" => "Favourite books",
    "favouriteTvShows" => "Favourite TV shows",
    "favouriteMovies" => "Favourite movies",
    "favouriteQuotes" => "Favourite quotes",
    "otherInformation" => "Other information",
    _ => "",
  }
}

// ─── Block emitters ──────────────────────────────────────────────────────────

fn push_labeled(out: &mut String, field: &str, value: &str) {
  out.push_str("<div class=\"quad-profile-");
  out.push_str(field);
  out.push_str("\"><span class=\"quad-profile-label\">");
  out.push_str(field_label(field));
  out.push_str("</span>");
  out.push_str(&escape_html(value));
  out.push_str("</div>");
}

fn push_unlabeled(out: &mut String, field: &str, value: &str) {
  out.push_str("<div class=\"quad-profile-");
  out.push_str(field);
  out.push_str("\">");
  out.push_str(&escape_html(value));
  out.push_str("</div>");
}

fn push_labeled_opt(out: &mut String, field: &str, value: &Option<String>) {
  if let Some(v) = non_blank(value) {
    push_labeled(out, field, v);
  }
}

// ─── Renderer ────────────────────────────────────────────────────────────────

/// Render a filtered view as an HTML fragment.
pub fn render(view: &ProfileView) -> String {
  let mut out = String::new();
  out.push_str("<div class=\"quad-profile\">");

  // Full image wins; the thumbnail is only used when no full image exists.
  let mut use_thumbnail = true;
  if let Some(url) = non_blank(&view.image_url) {
    out.push_str("<div class=\"quad-profile-image\"><img src=\"");
    out.push_str(&escape_html(url));
    out.push_str("\" /></div>");
    use_thumbnail = false;
  }
  if use_thumbnail
    && let Some(url) = non_blank(&view.image_thumb_url)
  {
    out.push_str("<div class=\"quad-profile-image-thumb\"><img src=\"");
    out.push_str(&escape_html(url));
    out.push_str("\" /></div>");
  }

  // Thumbnail and full-width layouts take different content widths.
  if use_thumbnail {
    out.push_str("<div class=\"quad-profile-content-thumb\">");
  } else {
    out.push_str("<div class=\"quad-profile-content\">");
  }

  if let Some(uuid) = view.user_uuid {
    push_labeled(&mut out, "userUuid", &uuid.to_string());
  }
  if let Some(name) = non_blank(&view.display_name) {
    push_unlabeled(&mut out, "displayName", name);
  }

  // Status
  if let Some(message) = non_blank(&view.status_message) {
    push_unlabeled(&mut out, "statusMessage", message);
  }
  if let Some(date) = non_blank(&view.status_date_formatted) {
    push_unlabeled(&mut out, "statusDate", date);
  }

  // Basic info
  push_labeled_opt(&mut out, "nickname", &view.nickname);

  // Contact info
  push_labeled_opt(&mut out, "email", &view.email);
  push_labeled_opt(&mut out, "homepage", &view.homepage);
  push_labeled_opt(&mut out, "homephone", &view.home_phone);
  push_labeled_opt(&mut out, "workphone", &view.work_phone);
  push_labeled_opt(&mut out, "mobilephone", &view.mobile_phone);
  push_labeled_opt(&mut out, "facsimile", &view.facsimile);

  // Academic info
  push_labeled_opt(&mut out, "position", &view.position);
  push_labeled_opt(&mut out, "department", &view.department);
  push_labeled_opt(&mut out, "school", &view.school);
  push_labeled_opt(&mut out, "room", &view.room);
  push_labeled_opt(&mut out, "course", &view.course);
  push_labeled_opt(&mut out, "subjects", &view.subjects);

  // Personal info
  push_labeled_opt(&mut out, "favouriteBooks", &view.favourite_books);
  push_labeled_opt(&mut out, "favouriteTvShows", &view.favourite_tv_shows);
  push_labeled_opt(&mut out, "favouriteMovies", &view.favourite_movies);
  push_labeled_opt(&mut out, "favouriteQuotes", &view.favourite_quotes);
  push_labeled_opt(&mut out, "otherInformation", &view.other_information);

  out.push_str("</div>");
  out.push_str("</div>");

  out.push_str("<link href=\"");
  out.push_str(PROFILE_STYLESHEET);
  out.push_str("\" type=\"text/css\" rel=\"stylesheet\" media=\"all\" />");

  out
}

// ─── Tests ───────────────────────────────────────────────────────────────────
