//! Delivery URL construction and parsing.

/// Resource type of uploaded reports.
pub const RAW_RESOURCE: &str = "raw";

/// Optional delivery transformations (images only).
#[derive(Debug, Clone, Default)]
pub struct Transform<'a> {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<&'a str>,
    pub format: Option<&'a str>,
    /// Defaults to `raw`.
    pub resource_type: Option<&'a str>,
}

impl Transform<'_> {
    /// Transformation segment without slashes, `None` when nothing is set.
    fn segment(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.width.map(|w| format!("w_{w}")),
            self.height.map(|h| format!("h_{h}")),
            self.quality.map(|q| format!("q_{q}")),
            self.format.map(|f| format!("f_{f}")),
        ]
        .into_iter()
        .flatten()
        .collect();

        (!parts.is_empty()).then(|| parts.join(","))
    }
}

/// Folder name for a department: lowercase, whitespace runs become `_`.
#[must_use]
pub fn clean_department(department: &str) -> String {
    department
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// File name without its last extension, restricted to `[A-Za-z0-9_-]`.
#[must_use]
pub fn clean_file_stem(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() && !ext.contains('/') => stem,
        _ => file_name,
    };
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `https://res.cloudinary.com/<cloud>/<resource>/upload[/<transform>]/<public_id>`.
#[must_use]
pub fn delivery_url(cloud_name: &str, public_id: &str, transform: &Transform<'_>) -> String {
    let resource = transform.resource_type.unwrap_or(RAW_RESOURCE);
    let transform = transform
        .segment()
        .map(|s| format!("/{s}"))
        .unwrap_or_default();
    format!("https://res.cloudinary.com/{cloud_name}/{resource}/upload{transform}/{public_id}")
}

/// URL that makes the browser download the file under `file_name`.
#[must_use]
pub fn download_url(cloud_name: &str, public_id: &str, file_name: &str) -> String {
    format!(
        "https://res.cloudinary.com/{cloud_name}/{RAW_RESOURCE}/upload/fl_attachment:{}/{public_id}",
        urlencoding::encode(file_name)
    )
}

/// Parts of a delivery URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMediaUrl {
    /// Last path segment without its extension.
    pub public_id: String,
    /// Segments between `upload` and the last one, version segment excluded.
    pub folder: String,
    pub file_name: String,
}

impl ParsedMediaUrl {
    /// Folder and id joined, as used by the upload API.
    #[must_use]
    pub fn full_public_id(&self) -> String {
        if self.folder.is_empty() {
            self.public_id.clone()
        } else {
            format!("{}/{}", self.folder, self.public_id)
        }
    }
}

/// Split a delivery URL into folder and public id.
///
/// Returns `None` when the URL has no `upload` segment.
#[must_use]
pub fn parse_delivery_url(url: &str) -> Option<ParsedMediaUrl> {
    let url = url.split(['?', '#']).next()?;
    let segments: Vec<&str> = url.split('/').collect();
    let upload = segments.iter().position(|s| *s == "upload")?;
    let (&file_name, between) = segments.get(upload + 1..)?.split_last()?;

    let folder = between
        .iter()
        .copied()
        .filter(|s| !is_version_segment(s))
        .collect::<Vec<_>>()
        .join("/");
    let public_id = file_name.split('.').next().unwrap_or(file_name);

    Some(ParsedMediaUrl {
        public_id: public_id.to_owned(),
        folder,
        file_name: file_name.to_owned(),
    })
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
