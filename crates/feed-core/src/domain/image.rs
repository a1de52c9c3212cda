/// Image formats accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Match a mime type. `image/jpg` is accepted alongside `image/jpeg`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpg" | "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}
