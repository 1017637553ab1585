//! Association links derived from geoCore `options`.

use records_protocol::Link;
use serde_json::Value;
use tracing::{debug, warn};

use crate::locale::{Locale, Translator};

const DEFAULT_REL: &str = "item";

/// Build links from a record's `options` list.
///
/// Each option contributes `url` as href, the translated `name` as title and
/// `protocol` as type, with rel `item` and the caller's locale as hreflang.
/// A translated description of the form `rel;type;hreflang` overrides the
/// last three. Options left without a url or type are dropped.
pub fn derive_associations(
    options: Option<&Value>,
    locale: Option<&Locale>,
    translator: &dyn Translator,
) -> Vec<Link> {
    let decoded;
    let options = match options {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(v) => {
                decoded = v;
                &decoded
            }
            Err(e) => {
                warn!(error = %e, "failed to parse options");
                return Vec::new();
            }
        },
        Some(v) => v,
    };

    let Some(options) = options.as_array() else {
        warn!("options is not a list");
        return Vec::new();
    };

    options
        .iter()
        .filter_map(|option| option_link(option, locale, translator))
        .collect()
}

fn option_link(option: &Value, locale: Option<&Locale>, translator: &dyn Translator) -> Option<Link> {
    let url = non_empty(option.get("url").and_then(Value::as_str));
    let title = option
        .get("name")
        .and_then(|name| translator.translate(name, locale));

    let mut rel = DEFAULT_REL.to_string();
    let mut type_ = non_empty(option.get("protocol").and_then(Value::as_str)).map(String::from);
    let mut hreflang = locale.map(|l| translator.locale_tag(l));

    let description = option
        .get("description")
        .and_then(|desc| translator.translate(desc, locale));
    if let Some(description) = description.filter(|d| d.matches(';').count() == 2) {
        let mut parts = description.splitn(3, ';').map(String::from);
        rel = parts.next().unwrap_or_default();
        type_ = parts.next().filter(|t| !t.is_empty());
        hreflang = parts.next();
    }

    let (Some(url), Some(type_)) = (url, type_) else {
        debug!(option = %option, "dropped option without url or type");
        return None;
    };

    let mut link = Link::new(url, rel).with_type(type_);
    link.title = title;
    link.hreflang = hreflang;
    Some(link)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
