//! Public URLs of uploaded media.

/// Builds links below the bucket's bound domain.
#[derive(Debug, Clone)]
pub struct MediaUrls {
    domain: String,
    pic_base_path: String,
    version_base_path: String,
}

impl MediaUrls {
    pub fn new(
        domain: impl Into<String>,
        pic_base_path: impl Into<String>,
        version_base_path: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into().trim_end_matches('/').to_string(),
            pic_base_path: pic_base_path.into().trim_matches('/').to_string(),
            version_base_path: version_base_path.into().trim_matches('/').to_string(),
        }
    }

    /// Object key of a banner image.
    pub fn pic_key(&self, img_id: &str) -> String {
        join_key(&self.pic_base_path, &format!("{}.jpg", img_id))
    }

    /// Object key of a version file.
    pub fn file_key(&self, file: &str) -> String {
        join_key(&self.version_base_path, file)
    }

    /// Image URL; empty when the banner has no image.
    pub fn pic_url(&self, img_id: &str) -> String {
        if img_id.is_empty() {
            return String::new();
        }
        self.url(&self.pic_key(img_id))
    }

    /// Version file URL; empty when no file is attached.
    pub fn file_url(&self, file: &str) -> String {
        if file.is_empty() {
            return String::new();
        }
        self.url(&self.file_key(file))
    }

    fn url(&self, key: &str) -> String {
        format!("https://{}/{}", self.domain, key)
    }
}

fn join_key(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", base, name)
    }
}
