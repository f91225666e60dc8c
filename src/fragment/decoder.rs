//! Per-fragment decode pipeline.
//!
//! [`FragmentDecoder`] applies decryption and then decompression according to
//! each record's own flags. Either step may be skipped; a fragment stored raw
//! passes through unchanged.

use super::{
    AssetMap,
    DecodeError,
    DecodedFragment,
    FragmentMetadata,
    RawFragment,
    RawSkeleton,
    error::DecodeStep,
};
use crate::{
    capability::{Capabilities, CompressionDictionary, DecryptionKey},
    metrics,
};

/// Decodes raw records with the capabilities resolved for this run.
#[derive(Clone, Copy, Debug)]
pub struct FragmentDecoder<'a> {
    capabilities: &'a Capabilities,
    key: Option<&'a DecryptionKey>,
    dictionary: Option<&'a CompressionDictionary>,
}

impl<'a> FragmentDecoder<'a> {
    /// Create a decoder. The key and dictionary are optional because a
    /// document may contain no encrypted or no compressed fragments.
    #[must_use]
    pub const fn new(
        capabilities: &'a Capabilities,
        key: Option<&'a DecryptionKey>,
        dictionary: Option<&'a CompressionDictionary>,
    ) -> Self {
        Self {
            capabilities,
            key,
            dictionary,
        }
    }

    /// Decode a fragment and register its assets in `assets`.
    ///
    /// Assets are only registered once the payload decoded successfully.
    /// Asset names without a payload are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] naming the fragment when a required key or
    /// dictionary is missing or a capability fails.
    pub fn decode(&self, raw: &RawFragment, assets: &mut AssetMap) -> Result<DecodedFragment, DecodeError> {
        let decoded = self.decode_payload(&raw.metadata, &raw.payload)?;
        for (name, payload) in &raw.assets {
            if let Some(payload) = payload {
                assets.insert(name, payload);
            }
        }
        metrics::inc_fragments_decoded();
        Ok(DecodedFragment::new(raw.id(), decoded))
    }

    /// Decode a layout skeleton.
    ///
    /// # Errors
    ///
    /// Same conditions as [`FragmentDecoder::decode`].
    pub fn decode_skeleton(&self, raw: &RawSkeleton) -> Result<String, DecodeError> {
        self.decode_payload(&raw.metadata, &raw.payload)
    }

    fn decode_payload(&self, metadata: &FragmentMetadata, payload: &str) -> Result<String, DecodeError> {
        let id = metadata.id;
        let mut data = payload.to_owned();
        if metadata.encrypted {
            let key = self.key.ok_or(DecodeError::MissingKey { id })?;
            data = self
                .capabilities
                .decryptor()
                .decrypt(&data, key)
                .map_err(|fault| DecodeError::Capability {
                    id,
                    step: DecodeStep::Decrypt,
                    fault,
                })?;
        }
        if metadata.compressed {
            let dictionary = self.dictionary.ok_or(DecodeError::MissingDictionary { id })?;
            data = self
                .capabilities
                .decompressor()
                .decompress(&data, dictionary)
                .map_err(|fault| DecodeError::Capability {
                    id,
                    step: DecodeStep::Decompress,
                    fault,
                })?;
        }
        Ok(data)
    }
}
