use crate::models::Volume;

/// Static fallback when a volume carries no usable cover art.
pub const PLACEHOLDER_COVER: &str = "/issue-cover.png";

/// Maps a (volume, issue number) pair to a displayable cover-image URL.
///
/// Issue 2 shows the volume's second-issue cover when one is set; every
/// other issue, and issue 2 without a dedicated cover, falls back to the
/// volume cover, then to the placeholder. Empty strings count as unset.
/// Always returns a usable path.
pub fn resolve_cover_image(volume: Option<&Volume>, issue_number: Option<i32>) -> String {
    let Some(volume) = volume else {
        return PLACEHOLDER_COVER.to_string();
    };

    if issue_number == Some(2) {
        if let Some(cover) = non_empty(volume.cover_image_issue2.as_deref()) {
            return cover.to_string();
        }
    }

    match non_empty(volume.cover_image.as_deref()) {
        Some(cover) => cover.to_string(),
        None => PLACEHOLDER_COVER.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn volume(cover: Option<&str>, issue2: Option<&str>) -> Volume {
        Volume {
            id: "vol-1".to_string(),
            volume_number: 1,
            year: 2024,
            description: None,
            publish_date: Utc::now(),
            cover_image: cover.map(str::to_string),
            cover_image_issue2: issue2.map(str::to_string),
        }
    }

    #[test]
    fn issue_two_prefers_dedicated_cover() {
        let v = volume(Some("/covers/v1.png"), Some("/covers/v1-i2.png"));
        assert_eq!(resolve_cover_image(Some(&v), Some(2)), "/covers/v1-i2.png");
    }

    #[test]
    fn issue_two_falls_back_when_dedicated_cover_missing() {
        let v = volume(Some("/covers/v1.png"), None);
        assert_eq!(resolve_cover_image(Some(&v), Some(2)), "/covers/v1.png");
    }

    #[test]
    fn other_issues_never_see_the_issue_two_cover() {
        let v = volume(Some("/covers/v1.png"), Some("/covers/v1-i2.png"));
        assert_eq!(resolve_cover_image(Some(&v), Some(1)), "/covers/v1.png");
        assert_eq!(resolve_cover_image(Some(&v), Some(3)), "/covers/v1.png");
        assert_eq!(resolve_cover_image(Some(&v), None), "/covers/v1.png");
    }

    #[test]
    fn missing_volume_or_covers_yield_placeholder() {
        assert_eq!(resolve_cover_image(None, Some(2)), PLACEHOLDER_COVER);
        let v = volume(None, None);
        assert_eq!(resolve_cover_image(Some(&v), Some(1)), PLACEHOLDER_COVER);
        let blank = volume(Some("   "), None);
        assert_eq!(resolve_cover_image(Some(&blank), Some(1)), PLACEHOLDER_COVER);
    }
}
