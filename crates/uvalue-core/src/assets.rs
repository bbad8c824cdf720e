//! Locations of material imagery served by the backend

/// Which picture of a material is wanted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Description,
    Graphic,
}

impl AssetKind {
    fn dir(&self) -> &'static str {
        match self {
            AssetKind::Description => "description",
            AssetKind::Graphic => "graphic",
        }
    }
}

/// Resolve a catalog image reference against the backend origin
///
/// Absolute `http(s)://` references are returned unchanged.
pub fn asset_url(backend_base: &str, kind: AssetKind, filename: &str) -> Option<String> {
    let filename = filename.trim();
    if filename.is_empty() {
        return None;
    }

    let lower = filename.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(filename.to_string());
    }

    Some(format!(
        "{}/static/materials/{}/{}",
        backend_base.trim_end_matches('/'),
        kind.dir(),
        filename.trim_start_matches('/')
    ))
}

pub fn description_image_url(backend_base: &str, filename: &str) -> Option<String> {
    asset_url(backend_base, AssetKind::Description, filename)
}

pub fn graphic_image_url(backend_base: &str, filename: &str) -> Option<String> {
    asset_url(backend_base, AssetKind::Graphic, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_names_resolve_under_static() {
        assert_eq!(
            graphic_image_url("http://127.0.0.1:8000/", "brick.png").as_deref(),
            Some("http://127.0.0.1:8000/static/materials/graphic/brick.png")
        );
        assert_eq!(
            description_image_url("https://api.example.org", "gypsum.jpg").as_deref(),
            Some("https://api.example.org/static/materials/description/gypsum.jpg")
        );
    }

    #[test]
    fn test_absolute_urls_pass_through() {
        assert_eq!(
            graphic_image_url("http://localhost", "HTTPS://cdn.example.org/a.png").as_deref(),
            Some("HTTPS://cdn.example.org/a.png")
        );
    }

    #[test]
    fn test_empty_name_has_no_url() {
        assert_eq!(graphic_image_url("http://localhost", "  "), None);
    }
}
