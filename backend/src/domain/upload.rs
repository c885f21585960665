//! Upload validation.
//!
//! An [`ImageUpload`] only exists once the raw bytes have passed the size cap
//! and decoded as a supported raster format, so the inference port can take
//! it by type and never see malformed input.

use std::fmt;

/// Maximum accepted upload size in bytes.
pub const MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024;

/// Validation errors returned by [`ImageUpload::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageUploadError {
    /// The upload carried no bytes.
    Empty,
    /// The upload exceeded the size cap.
    TooLarge {
        /// The enforced limit in bytes.
        limit: usize,
    },
    /// The bytes did not decode as a supported raster image.
    Undecodable,
}

impl fmt::Display for ImageUploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "image upload must not be empty"),
            Self::TooLarge { limit } => {
                write!(f, "image upload exceeds the {limit} byte limit")
            }
            Self::Undecodable => write!(f, "image upload is not a decodable raster image"),
        }
    }
}

impl std::error::Error for ImageUploadError {}

/// A decodable image upload together with its original filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    bytes: Vec<u8>,
    filename: String,
}

impl ImageUpload {
    /// Validate raw upload bytes against [`MAX_IMAGE_BYTES`].
    pub fn try_new(
        bytes: Vec<u8>,
        filename: impl Into<String>,
    ) -> Result<Self, ImageUploadError> {
        Self::try_with_limit(bytes, filename, MAX_IMAGE_BYTES)
    }

    fn try_with_limit(
        bytes: Vec<u8>,
        filename: impl Into<String>,
        limit: usize,
    ) -> Result<Self, ImageUploadError> {
        if bytes.is_empty() {
            return Err(ImageUploadError::Empty);
        }
        if bytes.len() > limit {
            return Err(ImageUploadError::TooLarge { limit });
        }
        // Full decode rather than a magic-byte sniff: truncated files carry
        // valid headers.
        image::load_from_memory(&bytes).map_err(|_| ImageUploadError::Undecodable)?;
        Ok(Self {
            bytes,
            filename: filename.into(),
        })
    }

    /// The validated image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The original upload name, informational only.
    pub fn filename(&self) -> &str {
        self.filename.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rstest::rstest;

    fn png_bytes() -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        image::RgbImage::new(2, 2)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encoding a tiny PNG succeeds");
        out.into_inner()
    }

    #[test]
    fn accepts_a_decodable_png() {
        let upload =
            ImageUpload::try_new(png_bytes(), "dinner.png").expect("valid image should pass");
        assert_eq!(upload.filename(), "dinner.png");
        assert!(!upload.bytes().is_empty());
    }

    #[test]
    fn rejects_empty_uploads() {
        assert_eq!(
            ImageUpload::try_new(Vec::new(), "x.png"),
            Err(ImageUploadError::Empty)
        );
    }

    #[test]
    fn rejects_oversized_uploads() {
        let err = ImageUpload::try_with_limit(png_bytes(), "x.png", 4).expect_err("over the cap");
        assert_eq!(err, ImageUploadError::TooLarge { limit: 4 });
    }

    #[rstest]
    #[case(vec![0x00])]
    #[case(b"not an image at all".to_vec())]
    fn rejects_undecodable_bytes(#[case] bytes: Vec<u8>) {
        assert_eq!(
            ImageUpload::try_new(bytes, "x.png"),
            Err(ImageUploadError::Undecodable)
        );
    }

    #[test]
    fn rejects_truncated_image_data() {
        let mut bytes = png_bytes();
        bytes.truncate(bytes.len() / 2);
        assert_eq!(
            ImageUpload::try_new(bytes, "x.png"),
            Err(ImageUploadError::Undecodable)
        );
    }
}
