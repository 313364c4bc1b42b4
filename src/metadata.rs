//! Container-level metadata collected during the parse:
//! iTunes-style `udta` tags, `meta`/`keys` keyed entries,
//! cover art descriptors, and the `©xyz` location string.

/// Metadata stores populated from `udta` and `meta` subtrees.
#[derive(Debug, Default)]
pub struct Metadata {
    /// iTunes-style tag key/value pairs from
    /// `udta/meta/ilst`, keyed by tag FourCC.
    pub(crate) udta_tags: Vec<Tag>,
    /// Key strings from the `keys` box, 1-indexed
    /// by the FourCC of the matching `ilst` child.
    pub(crate) meta_keys: Vec<String>,
    /// Values parallel to `meta_keys`. Unset when no
    /// `data` box referenced the key.
    pub(crate) meta_values: Vec<Option<String>>,
    /// Cover art from the `covr` tag under `udta`.
    pub(crate) udta_cover: Option<CoverArt>,
    /// Cover art from the `"covr"` key in the `meta` store.
    pub(crate) meta_cover: Option<CoverArt>,
    /// Location from the `©xyz` box under `udta`.
    pub(crate) location: Option<Location>,
}

impl Metadata {
    /// iTunes-style tag key/value pairs from `udta`.
    pub fn udta_tags(&self) -> &[Tag] {
        &self.udta_tags
    }

    /// Returns the first `udta` tag value with specified key,
    /// e.g. `"©nam"` for the title.
    pub fn udta_value(&self, key: &str) -> Option<&str> {
        self.udta_tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// Key strings from the `meta/keys` box.
    pub fn meta_keys(&self) -> &[String] {
        &self.meta_keys
    }

    /// Key/value pairs from the `meta` store
    /// for keys that received a value.
    pub fn meta_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.meta_keys
            .iter()
            .zip(self.meta_values.iter())
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    /// Returns the `meta` store value with specified key.
    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta_keys
            .iter()
            .position(|k| k == key)
            .and_then(|i| self.meta_values[i].as_deref())
    }

    /// Cover art recorded from the `covr` tag under `udta`.
    pub fn udta_cover(&self) -> Option<&CoverArt> {
        self.udta_cover.as_ref()
    }

    /// Cover art recorded from the `"covr"` key in the `meta` store.
    pub fn meta_cover(&self) -> Option<&CoverArt> {
        self.meta_cover.as_ref()
    }

    /// Cover art descriptor, preferring the `udta` slot.
    pub fn cover(&self) -> Option<&CoverArt> {
        self.udta_cover.as_ref().or(self.meta_cover.as_ref())
    }

    /// Location from the `©xyz` box under `udta`.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

/// A single key/value metadata tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub(crate) key: String,
    pub(crate) value: String,
}

impl Tag {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Cover art descriptor. The image bytes themselves stay in
/// the file and can be read back via the demux session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverArt {
    /// Absolute file offset of the image bytes.
    pub(crate) offset: u64,
    /// Image size in bytes.
    pub(crate) size: u32,
    pub(crate) kind: CoverType,
}

impl CoverArt {
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn kind(&self) -> CoverType {
        self.kind
    }
}

/// Cover art image format, from the `data` box class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverType {
    Jpeg,
    Png,
    Bmp,
}

/// Location string from the `©xyz` box under `udta`,
/// e.g. `"+12.3+45.6/"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Tag key, i.e. `"©xyz"`.
    pub(crate) key: String,
    /// Packed ISO-639 language code.
    pub(crate) language_code: u16,
    /// UTF-8 location string.
    pub(crate) value: String,
}

impl Location {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn language_code(&self) -> u16 {
        self.language_code
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
