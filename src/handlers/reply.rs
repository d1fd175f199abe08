use serde_json::Value;

/// One way of reading a display string out of a webhook reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyExtractor {
    /// String at `payload[name]`
    Field(String),
    /// String at `payload[parent][field]`
    Nested { parent: String, field: String },
    /// The payload is itself a JSON string
    Raw,
}

impl ReplyExtractor {
    pub fn extract(&self, payload: &Value) -> Option<String> {
        let candidate = match self {
            Self::Field(name) => payload.get(name),
            Self::Nested { parent, field } => payload.get(parent).and_then(|p| p.get(field)),
            Self::Raw => Some(payload),
        };
        candidate
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    }
}

/// Ordered extractor list; the first match wins.
#[derive(Debug, Clone)]
pub struct ReplyExtractors {
    extractors: Vec<ReplyExtractor>,
}

impl ReplyExtractors {
    /// Every field at top level, then every field under `nested_key`, then the raw payload.
    pub fn new<S: AsRef<str>>(fields: &[S], nested_key: &str) -> Self {
        let top = fields
            .iter()
            .map(|f| ReplyExtractor::Field(f.as_ref().to_string()));
        let nested = fields.iter().map(|f| ReplyExtractor::Nested {
            parent: nested_key.to_string(),
            field: f.as_ref().to_string(),
        });
        let extractors = top
            .chain(nested)
            .chain(std::iter::once(ReplyExtractor::Raw))
            .collect();
        Self { extractors }
    }

    /// Workflow engines often wrap the item in a one-element array; the first
    /// element is searched in that case.
    pub fn extract(&self, payload: &Value) -> Option<String> {
        let payload = match payload {
            Value::Array(items) => items.first()?,
            other => other,
        };
        self.extractors.iter().find_map(|e| e.extract(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REPLY_FIELDS;
    use serde_json::json;

    fn extractors() -> ReplyExtractors {
        ReplyExtractors::new(DEFAULT_REPLY_FIELDS, "body")
    }

    #[test]
    fn list_is_top_level_then_nested_then_raw() {
        let ex = ReplyExtractors::new(&["output", "text"], "body");
        assert_eq!(
            ex.extractors,
            vec![
                ReplyExtractor::Field("output".to_string()),
                ReplyExtractor::Field("text".to_string()),
                ReplyExtractor::Nested {
                    parent: "body".to_string(),
                    field: "output".to_string()
                },
                ReplyExtractor::Nested {
                    parent: "body".to_string(),
                    field: "text".to_string()
                },
                ReplyExtractor::Raw,
            ]
        );
    }

    #[test]
    fn reads_top_level_output() {
        assert_eq!(
            extractors().extract(&json!({"output": "hello"})).as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn earlier_field_wins() {
        let payload = json!({"text": "last", "reply": "middle", "output": "first"});
        assert_eq!(extractors().extract(&payload).as_deref(), Some("first"));
    }

    #[test]
    fn top_level_beats_nested() {
        let payload = json!({"text": "top", "body": {"output": "nested"}});
        assert_eq!(extractors().extract(&payload).as_deref(), Some("top"));
    }

    #[test]
    fn falls_back_to_nested_body() {
        assert_eq!(
            extractors()
                .extract(&json!({"body": {"response": "hi"}}))
                .as_deref(),
            Some("hi")
        );
    }

    #[test]
    fn uses_raw_string_payload() {
        assert_eq!(
            extractors().extract(&json!("plain reply")).as_deref(),
            Some("plain reply")
        );
    }

    #[test]
    fn searches_first_element_of_array_payload() {
        assert_eq!(
            extractors()
                .extract(&json!([{"output": "from array"}, {"output": "ignored"}]))
                .as_deref(),
            Some("from array")
        );
        assert_eq!(extractors().extract(&json!([])), None);
    }

    #[test]
    fn skips_blank_and_non_string_values() {
        let payload = json!({"output": "  ", "response": 42, "reply": null, "message": "ok"});
        assert_eq!(extractors().extract(&payload).as_deref(), Some("ok"));
    }

    #[test]
    fn unrecognized_shape_yields_none() {
        assert_eq!(extractors().extract(&json!({"foo": "bar"})), None);
        assert_eq!(extractors().extract(&json!({"body": "not an object"})), None);
        assert_eq!(extractors().extract(&json!(17)), None);
    }

    #[test]
    fn custom_field_list_is_honoured() {
        let ex = ReplyExtractors::new(&["answer"], "data");
        assert_eq!(
            ex.extract(&json!({"data": {"answer": "42"}, "output": "unused"}))
                .as_deref(),
            Some("42")
        );
    }
}
