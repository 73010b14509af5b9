//! Finding the video ID in whatever the user pasted.

/// Substrings that precede a video ID, in the order they are tried.
const ID_MARKERS: [&str; 3] = ["v=", "youtu.be/", "/embed/"];

/// Characters that end an ID embedded in a URL.
const ID_TERMINATORS: [char; 3] = ['?', '&', '#'];

/// Extracts the 11-character YouTube video ID from a URL or a bare ID.
///
/// Accepts `watch?v=` URLs, `youtu.be/` short links, `/embed/` URLs, and IDs pasted on their own.
/// Surrounding whitespace is ignored. Returns `None` if no valid ID can be found.
///
/// ```
/// use tablet_youtube_live::extract_video_id;
///
/// assert_eq!(
///     extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=5").as_deref(),
///     Some("dQw4w9WgXcQ")
/// );
/// assert_eq!(extract_video_id("not a url"), None);
/// ```
pub fn extract_video_id(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    if is_video_id(trimmed) {
        return Some(trimmed.to_string());
    }

    ID_MARKERS
        .iter()
        .find_map(|marker| id_after_marker(trimmed, marker))
        .map(str::to_string)
}

/// Whether `candidate` has the shape of a video ID: 11 characters from `[A-Za-z0-9_-]`.
pub fn is_video_id(candidate: &str) -> bool {
    candidate.len() == 11
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// The valid ID following the first occurrence of `marker`, if there is one.
fn id_after_marker<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    let (_, rest) = url.split_once(marker)?;
    let candidate = rest.split(ID_TERMINATORS).next().unwrap_or(rest);
    is_video_id(candidate).then_some(candidate)
}
