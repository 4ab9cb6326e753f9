//! Remote source coordinates.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Deserializer, Serialize};

/// Where a remote gallery lives: a folder inside a hosted repository.
///
/// Coordinates double as the cache and single-flight key, so two values that
/// name the same folder must compare equal.
///
/// # Examples
///
/// ```
/// use galleria_core::SourceCoordinates;
///
/// let coords = SourceCoordinates::builder()
///     .owner("octo")
///     .repo("gallery")
///     .build()
///     .unwrap();
///
/// assert_eq!(coords.folder(), "images");
/// assert_eq!(
///     coords.raw_url("https://raw.githubusercontent.com", "cat.jpg"),
///     "https://raw.githubusercontent.com/octo/gallery/main/images/cat.jpg"
/// );
/// assert_eq!(coords.pages_url("cat.jpg"), "https://octo.github.io/gallery/images/cat.jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SourceCoordinates {
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
    /// Branch holding the images
    #[builder(default = "\"main\".to_string()")]
    #[serde(default = "default_branch")]
    branch: String,
    /// Folder inside the repository, without surrounding slashes
    #[builder(setter(custom), default = "\"images\".to_string()")]
    #[serde(default = "default_folder", deserialize_with = "deserialize_folder")]
    folder: String,
    /// Static-pages mirror root; derived from the owner when absent
    #[builder(default)]
    #[serde(default)]
    pages_root: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_folder() -> String {
    "images".to_string()
}

fn normalize_folder(folder: &str) -> String {
    folder.trim_matches('/').to_string()
}

fn deserialize_folder<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|folder| normalize_folder(&folder))
}

impl SourceCoordinatesBuilder {
    /// Folder inside the repository; leading and trailing slashes are dropped.
    pub fn folder<VALUE: Into<String>>(&mut self, value: VALUE) -> &mut Self {
        self.folder = Some(normalize_folder(&value.into()));
        self
    }

    fn validate(&self) -> Result<(), String> {
        for (field, value) in [("owner", &self.owner), ("repo", &self.repo)] {
            match value {
                None => return Err(format!("Missing required field: {}", field)),
                Some(v) if v.trim().is_empty() || v.contains('/') => {
                    return Err(format!(
                        "{} must be a single non-empty path segment",
                        field
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl SourceCoordinates {
    /// Creates a new builder for `SourceCoordinates`.
    pub fn builder() -> SourceCoordinatesBuilder {
        SourceCoordinatesBuilder::default()
    }

    /// Folder path with surrounding slashes removed (may be empty for the repository root).
    pub fn folder_path(&self) -> &str {
        &self.folder
    }

    /// Repository path of a file inside the folder.
    pub fn file_path(&self, name: &str) -> String {
        match self.folder_path() {
            "" => name.to_string(),
            folder => format!("{}/{}", folder, name),
        }
    }

    /// Contents-listing URL for the folder.
    pub fn listing_url(&self, api_base: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.folder_path()
        )
    }

    /// Raw-content URL for an arbitrary repository path.
    pub fn raw_path_url(&self, raw_base: &str, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            raw_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch,
            path.trim_start_matches('/')
        )
    }

    /// Raw-content URL for a file inside the folder.
    pub fn raw_url(&self, raw_base: &str, name: &str) -> String {
        self.raw_path_url(raw_base, &self.file_path(name))
    }

    /// Root of the static-pages mirror, always ending in `/`.
    pub fn pages_base(&self) -> String {
        let root = self.pages_root.clone().unwrap_or_else(|| {
            format!(
                "https://{}.github.io/{}/",
                self.owner.to_lowercase(),
                self.repo
            )
        });
        if root.ends_with('/') {
            root
        } else {
            format!("{}/", root)
        }
    }

    /// Static-pages URL for a file inside the folder.
    pub fn pages_url(&self, name: &str) -> String {
        format!("{}{}", self.pages_base(), self.file_path(name))
    }

    /// Repository web host "raw" redirect URL for a file inside the folder.
    pub fn blob_raw_url(&self, web_base: &str, name: &str) -> String {
        format!(
            "{}/{}/{}/raw/{}/{}",
            web_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch,
            self.file_path(name)
        )
    }
}

impl std::fmt::Display for SourceCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}@{}:{}",
            self.owner,
            self.repo,
            self.branch,
            self.folder_path()
        )
    }
}
