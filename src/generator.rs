use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::ResponseCache;
use crate::compression::{CompressionOptions, ImageCodec};
use crate::damage::{AngleType, DamageType};
use crate::error::{GenerateError, Result};
use crate::gemini::ImageModel;
use crate::image_uri::{png_image_uri, split_image_uri};
use crate::prompt::build_damage_prompt;

/// Per-request switches. Both default to on.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub use_cache: bool,
    pub compress: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            compress: true,
        }
    }
}

/// The single entry point of a generation cycle: cache-first lookup,
/// compression, prompt construction, one external call, response parsing,
/// cache population.
///
/// Cache lookups and writes are always keyed by the original, uncompressed
/// image, so an identical request hits even when the compress flag differs.
/// At most one external call is made per invocation; nothing is retried
/// internally.
pub struct DamageSimulator {
    model: Arc<dyn ImageModel>,
    codec: Arc<dyn ImageCodec>,
    cache: Arc<ResponseCache>,
    compression: CompressionOptions,
}

impl DamageSimulator {
    pub fn new(
        model: Arc<dyn ImageModel>,
        codec: Arc<dyn ImageCodec>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self {
            model,
            codec,
            cache,
            compression: CompressionOptions::default(),
        }
    }

    /// Generates a damaged rendition of `image`, returned as a PNG image-URI.
    pub async fn generate(
        &self,
        image: &str,
        damage: DamageType,
        instruction: &str,
        angle: Option<AngleType>,
        options: GenerateOptions,
    ) -> Result<String> {
        self.run(
            image,
            damage,
            instruction,
            angle,
            options.use_cache,
            options.use_cache,
            options.compress,
        )
        .await
    }

    /// The explicit retry path: ignores any cached entry for this request,
    /// performs a fresh generation, and overwrites the entry with the new
    /// result and timestamp.
    pub async fn regenerate(
        &self,
        image: &str,
        damage: DamageType,
        instruction: &str,
        angle: Option<AngleType>,
        compress: bool,
    ) -> Result<String> {
        self.run(image, damage, instruction, angle, false, true, compress)
            .await
    }

    async fn run(
        &self,
        image: &str,
        damage: DamageType,
        instruction: &str,
        angle: Option<AngleType>,
        read_cache: bool,
        write_cache: bool,
        compress: bool,
    ) -> Result<String> {
        if read_cache {
            if let Some(hit) = self.cache.get(image, damage, instruction, angle) {
                info!(damage = damage.tag(), "serving cached generation");
                return Ok(hit.image);
            }
        }

        let send_image: Cow<'_, str> = if compress {
            match self.codec.compress(image, &self.compression) {
                Ok(compressed) => {
                    debug!(
                        original = image.len(),
                        compressed = compressed.len(),
                        "compressed source image"
                    );
                    Cow::Owned(compressed)
                }
                Err(err) => {
                    warn!(%err, "image compression failed, sending original");
                    Cow::Borrowed(image)
                }
            }
        } else {
            Cow::Borrowed(image)
        };

        let payload = split_image_uri(&send_image);
        let prompt = build_damage_prompt(damage, instruction, angle);
        let parts = self
            .model
            .edit_image(&payload.data, &payload.mime_type, &prompt)
            .await?;

        if parts.is_empty() {
            return Err(GenerateError::NoContentGenerated);
        }
        let Some(generated) = parts.into_iter().find_map(|part| part.inline_image) else {
            return Err(GenerateError::ModelRefused(
                "It might have refused the request due to safety policies.".to_string(),
            ));
        };

        let result = png_image_uri(&generated.data);
        if write_cache {
            self.cache
                .set(image, damage, instruction, angle, &result, &prompt);
        }
        Ok(result)
    }
}
