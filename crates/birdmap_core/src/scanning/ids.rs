//! External identifier extraction from file names.

use crate::models::ExternalId;

/// Identifier for a video file stem.
///
/// Uses the last `(` and the last `)` so descriptive text containing its
/// own parentheses does not confuse the extraction. When the last `)` comes
/// before the last `(` the identifier is empty.
///
/// ```
/// use birdmap_core::scanning::extract_video_id;
///
/// assert_eq!(extract_video_id("Foo (bar) (42)").as_str(), "42");
/// assert_eq!(extract_video_id("plainname").as_str(), "plainname");
/// ```
pub fn extract_video_id(stem: &str) -> ExternalId {
    match (stem.rfind('('), stem.rfind(')')) {
        (Some(open), Some(close)) => {
            let start = open + 1;
            ExternalId::new(stem.get(start..close).unwrap_or_default())
        }
        _ => ExternalId::new(stem),
    }
}

/// Identifier for an image file stem (the stem itself).
pub fn extract_image_id(stem: &str) -> ExternalId {
    ExternalId::new(stem)
}
