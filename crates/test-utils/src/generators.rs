//! Generators for synthetic geoCore records and response bodies.

use serde_json::{json, Map, Value};

/// How embedded JSON fields are encoded in a generated body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Plain JSON arrays.
    Clean,
    /// JSON text with doubled quotes, backslash-escaped.
    Posix,
    /// JSON text with doubled, bare quotes.
    Windows,
}

/// Builder for one geoCore record.
///
/// # Example
///
/// ```
/// use test_utils::RecordBuilder;
///
/// let record = RecordBuilder::new("a3f0c1de-5b7e-4f1a-9d2c-6e8b0a4f7c31")
///     .title("Lakes")
///     .square(-80.0, 40.0, 10.0)
///     .build();
/// assert_eq!(record["title"], "Lakes");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    fields: Map<String, Value>,
}

impl RecordBuilder {
    pub fn new(id: &str) -> Self {
        Self::default().field("id", id)
    }

    /// Record without an `id` field.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Set any field.
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn title(self, title: &str) -> Self {
        self.field("title", title)
    }

    pub fn created(self, date: &str) -> Self {
        self.field("created", date)
    }

    pub fn published(self, date: &str) -> Self {
        self.field("published", date)
    }

    pub fn keywords(self, keywords: &str) -> Self {
        self.field("keywords", keywords)
    }

    pub fn total(self, total: u64) -> Self {
        self.field("total", total.to_string())
    }

    /// A closed square ring with its lower left corner at `(x, y)`.
    pub fn square(self, x: f64, y: f64, size: f64) -> Self {
        let ring = json!([[x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y]]);
        self.field("coordinates", json!([ring]))
    }

    pub fn temporal_extent(self, begin: &str, end: &str) -> Self {
        self.field("temporalExtent", format!("{{begin={}, end={}}}", begin, end))
    }

    /// Append an option (link source).
    pub fn option(mut self, url: &str, protocol: &str, description: &str) -> Self {
        let option = json!({
            "url": url,
            "protocol": protocol,
            "name": {"en": format!("{} (en)", protocol), "fr": format!("{} (fr)", protocol)},
            "description": {"en": description, "fr": description},
        });
        if let Some(Value::Array(options)) = self.fields.get_mut("options") {
            options.push(option);
            return self;
        }
        self.field("options", json!([option]))
    }

    pub fn thumbnail(self, url: &str) -> Self {
        self.field("graphicOverview", json!([{"overviewfilename": url}]))
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Serialize records into a geoCore search answer.
///
/// With [`Encoding::Posix`] or [`Encoding::Windows`] the `options` of each
/// record are embedded as JSON text the way the matching deployments do.
pub fn geocore_body(items: &[Value], encoding: Encoding) -> String {
    let mut bare_spans = Vec::new();
    let items: Vec<Value> = items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            if let Some(options) = item.get_mut("options") {
                let doubled = options.to_string().replace('"', "\"\"");
                match encoding {
                    Encoding::Clean => {}
                    Encoding::Posix => *options = Value::String(format!("\"\"{}\"\"", doubled)),
                    Encoding::Windows => {
                        let placeholder = format!("__bare_span_{}__", bare_spans.len());
                        bare_spans.push((placeholder.clone(), format!("\"\"\"{}\"\"\"", doubled)));
                        *options = Value::String(placeholder);
                    }
                }
            }
            item
        })
        .collect();

    let mut body = json!({ "Items": items }).to_string();
    for (placeholder, span) in bare_spans {
        body = body.replace(&format!("\"{}\"", placeholder), &span);
    }
    body
}

/// A search answer with `count` valid records, each reporting `total`.
pub fn record_page(count: usize, total: u64) -> Vec<Value> {
    (0..count)
        .map(|i| {
            RecordBuilder::new(&format!("00000000-0000-4000-8000-{:012}", i))
                .title(&format!("Record {}", i))
                .created("2021-06-01")
                .square(-100.0 + i as f64, 45.0, 1.0)
                .total(total)
                .build()
        })
        .collect()
}
