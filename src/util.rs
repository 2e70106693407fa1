use url::form_urlencoded;

const MAX_BODY_PREVIEW: usize = 200;

/// Percent-encodes a free-text query value. Spaces become `%20` rather than
/// the form-style `+`; a literal `+` is already escaped as `%2B`.
pub fn encode_query_value(input: &str) -> String {
  form_urlencoded::byte_serialize(input.trim().as_bytes())
    .collect::<String>()
    .replace('+', "%20")
}

pub fn truncate_body(body: &str) -> String {
  let body = body.trim();
  match body.char_indices().nth(MAX_BODY_PREVIEW) {
    Some((cut, _)) => format!("{}...", &body[.. cut]),
    None => body.to_string(),
  }
}

pub fn full_name(first_name: &str, last_name: Option<&str>) -> String {
  match last_name.map(str::trim).filter(|last| !last.is_empty()) {
    Some(last) => format!("{} {}", first_name.trim(), last),
    None => first_name.trim().to_string(),
  }
}
