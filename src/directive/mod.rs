//! Directive descriptor: typed configuration of an inclusion directive.
//!
//! Directive elements carry their configuration as loosely-typed markup
//! attributes (`src`, `mode`, `cache`, `recursion`, `maxdepth`). This
//! module reads them into a validated [`DirectiveConfig`] up front so that
//! every downstream component consumes only the typed form.
//!
//! Normalization is total: every malformed input maps deterministically to
//! a safe default, never to an error.
//!
//! | Attribute | Values | Default when absent | Default when empty |
//! |---|---|---|---|
//! | `src` | any URI | `None` (directive is removed) | `None` |
//! | `mode` | `cors` \| `no-cors` \| `same-origin` | `no-cors` | `no-cors` |
//! | `cache` | `default` \| `no-store` \| `reload` \| `no-cache` \| `force-cache` \| `only-if-cached` | `no-cache` | `default` |
//! | `recursion` | presence flag | `false` | n/a |
//! | `maxdepth` | non-negative integer | unlimited | unlimited |
//!
//! Value matching is case-insensitive. `maxdepth="0"` normalizes to
//! unlimited; zero is not a usable literal bound.

use crate::constants::UNLIMITED_DEPTH;
use crate::dom::{Document, NodeId};

const ATTR_SRC: &str = "src";
const ATTR_MODE: &str = "mode";
const ATTR_CACHE: &str = "cache";
const ATTR_RECURSION: &str = "recursion";
const ATTR_MAXDEPTH: &str = "maxdepth";

/// Request mode forwarded to the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestMode {
    Cors,
    #[default]
    NoCors,
    SameOrigin,
}

impl RequestMode {
    /// Parse an attribute value; anything unrecognized is `NoCors`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.eq_ignore_ascii_case("cors") => Self::Cors,
            Some(value) if value.eq_ignore_ascii_case("no-cors") => Self::NoCors,
            Some(value) if value.eq_ignore_ascii_case("same-origin") => Self::SameOrigin,
            _ => Self::NoCors,
        }
    }

    /// Canonical wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cors => "cors",
            Self::NoCors => "no-cors",
            Self::SameOrigin => "same-origin",
        }
    }
}

/// Cache mode forwarded to the transport's cache-control handling.
///
/// The `Default` trait maps to `NoCache`, matching an absent attribute;
/// the `Default` *variant* is the wire value `cache="default"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    Default,
    NoStore,
    Reload,
    NoCache,
    ForceCache,
    OnlyIfCached,
}

impl Default for CacheMode {
    fn default() -> Self {
        Self::NoCache
    }
}

impl CacheMode {
    /// Parse an attribute value.
    ///
    /// The absent/empty asymmetry is part of the wire contract: a missing
    /// attribute means `no-cache`, while a present-but-empty one means
    /// `default`. Unrecognized values also fall back to `default`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(value) = raw else {
            return Self::NoCache;
        };
        if value.eq_ignore_ascii_case("no-store") {
            Self::NoStore
        } else if value.eq_ignore_ascii_case("reload") {
            Self::Reload
        } else if value.eq_ignore_ascii_case("no-cache") {
            Self::NoCache
        } else if value.eq_ignore_ascii_case("force-cache") {
            Self::ForceCache
        } else if value.eq_ignore_ascii_case("only-if-cached") {
            Self::OnlyIfCached
        } else {
            Self::Default
        }
    }

    /// Canonical wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::NoStore => "no-store",
            Self::Reload => "reload",
            Self::NoCache => "no-cache",
            Self::ForceCache => "force-cache",
            Self::OnlyIfCached => "only-if-cached",
        }
    }
}

/// Normalized configuration of a single directive element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveConfig {
    /// Trimmed source URI; `None` when the attribute is absent or empty
    /// after trimming, in which case the directive is deleted without a
    /// fetch.
    pub src: Option<String>,
    /// Network request mode.
    pub mode: RequestMode,
    /// Cache directive for the transport.
    pub cache: CacheMode,
    /// Whether directives nested in the fetched fragment are resolved.
    pub recursion: bool,
    /// Recursion budget contributed by this directive;
    /// [`UNLIMITED_DEPTH`] when unbounded.
    pub maxdepth: i32,
}

impl DirectiveConfig {
    /// Read and normalize the configuration of a directive element.
    ///
    /// Pure with respect to the tree: the node is not mutated.
    #[must_use]
    pub fn from_node(doc: &Document, node: NodeId) -> Self {
        let src = doc
            .attr(node, ATTR_SRC)
            .map(str::trim)
            .filter(|trimmed| !trimmed.is_empty())
            .map(str::to_string);
        Self {
            src,
            mode: RequestMode::parse(doc.attr(node, ATTR_MODE)),
            cache: CacheMode::parse(doc.attr(node, ATTR_CACHE)),
            recursion: doc.has_attr(node, ATTR_RECURSION),
            maxdepth: parse_maxdepth(doc.attr(node, ATTR_MAXDEPTH)),
        }
    }

    /// Write the normalized `mode`, `cache`, and `maxdepth` values back to
    /// a directive element, for hosts that echo normalized attributes.
    pub fn write_normalized(&self, doc: &mut Document, node: NodeId) {
        doc.set_attr(node, ATTR_MODE, self.mode.as_str());
        doc.set_attr(node, ATTR_CACHE, self.cache.as_str());
        doc.set_attr(node, ATTR_MAXDEPTH, &self.maxdepth.to_string());
        doc.toggle_attr(node, ATTR_RECURSION, self.recursion);
    }
}

/// Normalize a raw `maxdepth` attribute value.
///
/// The value is read as a leading-integer prefix (so `"3"` and `"3x"` both
/// read as 3, matching host integer coercion). Non-numeric, negative, and
/// zero all normalize to [`UNLIMITED_DEPTH`].
#[must_use]
pub fn parse_maxdepth(raw: Option<&str>) -> i32 {
    let Some(value) = leading_integer(raw.unwrap_or("")) else {
        return UNLIMITED_DEPTH;
    };
    if value <= 0 {
        UNLIMITED_DEPTH
    } else {
        i32::try_from(value).unwrap_or(i32::MAX)
    }
}

/// Parse an optionally-signed decimal integer prefix, ignoring leading
/// whitespace and any trailing garbage. Returns `None` when no digits are
/// present.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits_start) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    let digits: &str = &trimmed[digits_start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate instead of failing on absurdly long digit runs.
    let magnitude: i64 = digits[..end].parse().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    fn config_for(markup: &str) -> DirectiveConfig {
        let doc = parse_document(markup);
        let node = doc.elements_by_tag(doc.root(), "include")[0];
        DirectiveConfig::from_node(&doc, node)
    }

    #[test]
    fn src_is_trimmed_and_empty_maps_to_none() {
        assert_eq!(
            config_for(r#"<include src="  a.html  ">"#).src,
            Some("a.html".to_string())
        );
        assert_eq!(config_for(r#"<include src="   ">"#).src, None);
        assert_eq!(config_for("<include>").src, None);
    }

    #[test]
    fn mode_defaults_to_no_cors() {
        assert_eq!(config_for("<include>").mode, RequestMode::NoCors);
        assert_eq!(config_for(r#"<include mode="">"#).mode, RequestMode::NoCors);
        assert_eq!(
            config_for(r#"<include mode="bogus">"#).mode,
            RequestMode::NoCors
        );
        assert_eq!(
            config_for(r#"<include mode="CORS">"#).mode,
            RequestMode::Cors
        );
        assert_eq!(
            config_for(r#"<include mode="Same-Origin">"#).mode,
            RequestMode::SameOrigin
        );
    }

    #[test]
    fn cache_absent_and_empty_differ() {
        assert_eq!(config_for("<include>").cache, CacheMode::NoCache);
        assert_eq!(config_for(r#"<include cache="">"#).cache, CacheMode::Default);
        assert_eq!(
            config_for(r#"<include cache="bogus">"#).cache,
            CacheMode::Default
        );
        assert_eq!(
            config_for(r#"<include cache="ONLY-IF-CACHED">"#).cache,
            CacheMode::OnlyIfCached
        );
        assert_eq!(
            config_for(r#"<include cache="force-cache">"#).cache,
            CacheMode::ForceCache
        );
    }

    #[test]
    fn recursion_is_a_presence_flag() {
        assert!(!config_for("<include>").recursion);
        assert!(config_for("<include recursion>").recursion);
        assert!(config_for(r#"<include recursion="">"#).recursion);
    }

    #[test]
    fn maxdepth_normalization_table() {
        assert_eq!(parse_maxdepth(None), UNLIMITED_DEPTH);
        assert_eq!(parse_maxdepth(Some("")), UNLIMITED_DEPTH);
        assert_eq!(parse_maxdepth(Some("abc")), UNLIMITED_DEPTH);
        assert_eq!(parse_maxdepth(Some("-3")), UNLIMITED_DEPTH);
        assert_eq!(parse_maxdepth(Some("0")), UNLIMITED_DEPTH);
        assert_eq!(parse_maxdepth(Some("1")), 1);
        assert_eq!(parse_maxdepth(Some("  7  ")), 7);
        assert_eq!(parse_maxdepth(Some("3x")), 3);
        assert_eq!(parse_maxdepth(Some("+2")), 2);
        assert_eq!(parse_maxdepth(Some("99999999999999999999")), i32::MAX);
    }

    #[test]
    fn zero_maxdepth_equals_absent_maxdepth() {
        let absent = config_for(r#"<include src="a.html">"#);
        let zero = config_for(r#"<include src="a.html" maxdepth="0">"#);
        assert_eq!(absent.maxdepth, zero.maxdepth);
    }

    #[test]
    fn write_normalized_echoes_canonical_values() {
        let mut doc = parse_document(r#"<include src="a.html" mode="BOGUS" maxdepth="0">"#);
        let node = doc.elements_by_tag(doc.root(), "include")[0];
        let config = DirectiveConfig::from_node(&doc, node);
        config.write_normalized(&mut doc, node);
        assert_eq!(doc.attr(node, "mode"), Some("no-cors"));
        assert_eq!(doc.attr(node, "cache"), Some("no-cache"));
        assert_eq!(doc.attr(node, "maxdepth"), Some("-1"));
        assert!(!doc.has_attr(node, "recursion"));
    }
}
