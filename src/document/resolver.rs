//! Rewrites asset placeholders and in-document navigation links.

use std::sync::LazyLock;

use regex::Regex;

use super::ResolveError;
use crate::{
    config::ReassemblyConfig,
    fragment::{AssetMap, DecodedFragment, FragmentId},
};

static ASSET_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(asset_placeholder);

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
fn asset_placeholder() -> Regex { Regex::new(r#"dataUrl="([^"]*)""#).expect("valid asset pattern") }

/// Applies the asset and navigation rewrites to decoded fragment text.
///
/// Both rewrites leave text without placeholders untouched, so resolving
/// already-resolved text returns it unchanged.
#[derive(Clone, Debug)]
pub struct ReferenceResolver {
    navigation: Regex,
}

impl ReferenceResolver {
    /// Build a resolver recognising `config.navigation_function` links.
    #[must_use]
    #[expect(clippy::expect_used, reason = "the function name is escaped before compiling")]
    pub fn new(config: &ReassemblyConfig) -> Self {
        let pattern = format!(
            r##"href="#" onclick="{}\([0-9]+,([0-9]+)\); return false;""##,
            regex::escape(&config.navigation_function)
        );
        Self {
            navigation: Regex::new(&pattern).expect("escaped navigation pattern is valid"),
        }
    }

    /// Rewrite `text` belonging to fragment `fragment`.
    ///
    /// `dataUrl="NAME"` becomes `src="PAYLOAD"` and a navigation call
    /// targeting position `N` becomes `href="#N"`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnresolvedAsset`] for the first placeholder
    /// whose name is not in `assets`.
    pub fn resolve(
        &self,
        fragment: FragmentId,
        text: &str,
        assets: &AssetMap,
    ) -> Result<String, ResolveError> {
        let mut rewritten = String::with_capacity(text.len());
        let mut last = 0;
        for captures in ASSET_PLACEHOLDER.captures_iter(text) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let payload =
                assets
                    .get(name.as_str())
                    .ok_or_else(|| ResolveError::UnresolvedAsset {
                        fragment,
                        asset: name.as_str().to_owned(),
                    })?;
            rewritten.push_str(&text[last..whole.start()]);
            rewritten.push_str("src=\"");
            rewritten.push_str(payload);
            rewritten.push('"');
            last = whole.end();
        }
        rewritten.push_str(&text[last..]);
        Ok(self
            .navigation
            .replace_all(&rewritten, r##"href="#${1}""##)
            .into_owned())
    }

    /// Resolve `fragment` in place, reusing a previous result.
    ///
    /// # Errors
    ///
    /// See [`ReferenceResolver::resolve`].
    pub fn resolve_fragment<'f>(
        &self,
        fragment: &'f mut DecodedFragment,
        assets: &AssetMap,
    ) -> Result<&'f str, ResolveError> {
        let id = fragment.id();
        fragment.resolve_with(|decoded| self.resolve(id, decoded, assets))
    }
}
