use serde::Serialize;

/// Decoded upstream body, cached and returned as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Any JSON document that is not a plain integer.
    Structured(serde_json::Value),

    /// A single integer, whether the upstream sent it as JSON or bare text.
    Number(i64),

    /// Body that is neither JSON nor an integer (e.g. a bare block hash).
    Text(String),
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Structured(_) => "structured",
            Payload::Number(_) => "number",
            Payload::Text(_) => "text",
        }
    }
}

/// Decode a raw upstream body: JSON, then integer, then raw text.
///
/// Never fails. Upstreams disagree on how they format scalars, so a JSON
/// integer is collapsed to `Number` to match the bare-text form. An integer
/// literal too large for `i64`/`u64` is kept as text rather than rounded.
pub fn decode(raw: &str) -> Payload {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
        match value.as_i64() {
            Some(n) => return Payload::Number(n),
            None if value.is_f64() && is_integer_literal(raw.trim()) => {}
            None => return Payload::Structured(value),
        }
    }

    if let Ok(n) = raw.trim().parse::<i64>() {
        return Payload::Number(n);
    }

    Payload::Text(raw.to_string())
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_and_json_integer_agree() {
        assert_eq!(decode("700000"), Payload::Number(700000));
        assert_eq!(decode("700000\n"), Payload::Number(700000));
        assert_eq!(decode(" 700000 "), Payload::Number(700000));
        assert_eq!(decode("700000"), decode("700000\n"));
    }

    #[test]
    fn test_structured_document() {
        let body = r#"{"txid":"abcd","fee":141,"status":{"confirmed":true}}"#;
        assert_eq!(
            decode(body),
            Payload::Structured(json!({"txid": "abcd", "fee": 141, "status": {"confirmed": true}}))
        );

        assert_eq!(decode("[]"), Payload::Structured(json!([])));
        // floats are not integers
        assert_eq!(decode("1.5"), Payload::Structured(json!(1.5)));
    }

    #[test]
    fn test_oversized_integer_is_not_rounded() {
        let body = "99999999999999999999";
        assert_eq!(decode(body), Payload::Text(body.to_string()));
        assert_eq!(
            decode("-99999999999999999999\n"),
            Payload::Text("-99999999999999999999\n".to_string())
        );

        // fits u64 exactly, so it stays a JSON number
        assert_eq!(
            decode("18446744073709551615"),
            Payload::Structured(json!(18446744073709551615u64))
        );
        assert_eq!(decode("1e20"), Payload::Structured(json!(1e20)));
    }

    #[test]
    fn test_bare_hash_falls_back_to_text() {
        let hash = "00000000000000000007878ec04bb2b2e12317804810f4c26033585b3f81ffaa";
        assert_eq!(decode(hash), Payload::Text(hash.to_string()));
    }

    #[test]
    fn test_text_is_returned_unmodified() {
        let body = "  not json, not a number \n";
        assert_eq!(decode(body), Payload::Text(body.to_string()));
        assert_eq!(decode(""), Payload::Text(String::new()));
    }

    #[test]
    fn test_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Payload::Number(42)).unwrap(), "42");
        assert_eq!(
            serde_json::to_string(&Payload::Text("abc".into())).unwrap(),
            "\"abc\""
        );
        assert_eq!(
            serde_json::to_string(&Payload::Structured(json!({"a": 1}))).unwrap(),
            r#"{"a":1}"#
        );
    }
}
