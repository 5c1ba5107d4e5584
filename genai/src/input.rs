//! Caller input for metadata generation.

use crate::error::GenAiError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Mime type assumed when an image arrives without a `data:` prefix.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

const SUPPORTED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// Free-form ticket text and/or a ticket screenshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketInput {
    /// Text as typed by the user
    pub text: Option<String>,
    /// Base64 image, optionally as a `data:` URI
    pub image: Option<String>,
}

impl TicketInput {
    /// Text-only input.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image: None,
        }
    }

    /// Image-only input.
    #[must_use]
    pub fn image(image: impl Into<String>) -> Self {
        Self {
            text: None,
            image: Some(image.into()),
        }
    }

    /// Builder: attach an image.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Text with surrounding whitespace removed, `None` when blank.
    #[must_use]
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Decode the image, if one was supplied and is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::InvalidImage`] for malformed data.
    pub fn inline_image(&self) -> Result<Option<InlineImage>, GenAiError> {
        self.image
            .as_deref()
            .filter(|i| !i.trim().is_empty())
            .map(InlineImage::parse)
            .transpose()
    }
}

/// Image payload ready for transmission: bare base64 plus mime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// e.g. `image/jpeg`
    pub mime_type: String,
    /// Base64 data with any `data:...;base64,` prefix removed
    pub data: String,
}

impl InlineImage {
    /// Parse bare base64 or a `data:<mime>;base64,<payload>` URI.
    ///
    /// `image/jpg` is normalised to `image/jpeg`.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::InvalidImage`] when the prefix is not a base64
    /// image URI, the mime type is unsupported, or the payload is not base64.
    pub fn parse(input: &str) -> Result<Self, GenAiError> {
        let input = input.trim();

        let (mime_type, payload) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| invalid("data URI has no payload"))?;
                let mime = header
                    .strip_suffix(";base64")
                    .ok_or_else(|| invalid("data URI is not base64 encoded"))?;
                (normalize_mime(mime)?, payload)
            }
            None => (DEFAULT_IMAGE_MIME.to_string(), input),
        };

        let data: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if data.is_empty() {
            return Err(invalid("image payload is empty"));
        }
        BASE64
            .decode(data.as_bytes())
            .map_err(|e| invalid(&format!("payload is not base64: {e}")))?;

        Ok(Self { mime_type, data })
    }
}

fn normalize_mime(mime: &str) -> Result<String, GenAiError> {
    let mime = mime.trim().to_ascii_lowercase();
    let mime = if mime == "image/jpg" {
        "image/jpeg".to_string()
    } else {
        mime
    };

    if SUPPORTED_MIME_TYPES.contains(&mime.as_str()) {
        Ok(mime)
    } else {
        Err(invalid(&format!("unsupported image type `{mime}`")))
    }
}

fn invalid(reason: &str) -> GenAiError {
    GenAiError::InvalidImage(reason.to_string())
}
