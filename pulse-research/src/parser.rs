//! Parsing and validation of model responses against the response schema

use itertools::Itertools;
use serde_json::{Map, Value};

use pulse_core::{PulseError, PulseResult, Sentiment, SentimentProfile};

use crate::schema::RESPONSE_SCHEMA;

/// Parse a raw model response into a [`SentimentProfile`]
///
/// Every schema field must be present and of the declared type. All missing
/// fields are reported together in one [`PulseError::Parse`]; otherwise the
/// first mistyped field is. There is no partial result.
pub fn parse_sentiment_profile(content: &str) -> PulseResult<SentimentProfile> {
    let json_str = extract_json(content)?;

    let value: Value = serde_json::from_str(&json_str)
        .map_err(|e| PulseError::parse(format!("Failed to parse sentiment profile: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| PulseError::parse("Sentiment profile is not a JSON object"))?;

    let missing: Vec<&str> = RESPONSE_SCHEMA
        .iter()
        .filter(|f| !object.contains_key(f.name))
        .map(|f| f.name)
        .collect();
    if !missing.is_empty() {
        return Err(PulseError::parse(format!(
            "Missing fields in sentiment profile: {}",
            missing.join(", ")
        )));
    }

    let sentiment_label = string_field(object, "sentiment")?;
    let sentiment = Sentiment::from_label(&sentiment_label).ok_or_else(|| {
        PulseError::parse(format!(
            "Field 'sentiment' must be Positive, Negative or Neutral, got '{}'",
            sentiment_label
        ))
    })?;

    Ok(SentimentProfile {
        company_name: string_field(object, "company_name")?,
        stock_code: string_field(object, "stock_code")?,
        newsdesc: string_field(object, "newsdesc")?,
        sentiment,
        people_names: list_field(object, "people_names")?,
        places_names: list_field(object, "places_names")?,
        other_companies_referred: list_field(object, "other_companies_referred")?,
        related_industries: list_field(object, "related_industries")?,
        market_implications: string_field(object, "market_implications")?,
        confidence_score: float_field(object, "confidence_score")?,
    })
}

/// Pull the JSON object out of a response, fenced or bare
pub fn extract_json(content: &str) -> PulseResult<String> {
    // Try to find JSON in code blocks first
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim().to_string());
        }
    }

    // Try to find raw JSON
    if let Some(start) = content.find('{') {
        if let Some(end) = content.rfind('}') {
            if end > start {
                return Ok(content[start..=end].to_string());
            }
        }
    }

    Err(PulseError::parse("No JSON found in response"))
}

fn string_field(object: &Map<String, Value>, name: &str) -> PulseResult<String> {
    match object.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(type_error(name, "string", other)),
        None => Err(PulseError::parse(format!("Missing field '{}'", name))),
    }
}

/// List fields are sets: duplicates are dropped, first occurrence wins
fn list_field(object: &Map<String, Value>, name: &str) -> PulseResult<Vec<String>> {
    let items = match object.get(name) {
        Some(Value::Array(items)) => items,
        Some(other) => return Err(type_error(name, "list", other)),
        None => return Err(PulseError::parse(format!("Missing field '{}'", name))),
    };

    let values = items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(type_error(name, "list of strings", other)),
        })
        .collect::<PulseResult<Vec<_>>>()?;

    Ok(values.into_iter().unique().collect())
}

fn float_field(object: &Map<String, Value>, name: &str) -> PulseResult<f64> {
    match object.get(name) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| PulseError::parse(format!("Field '{}' is not a finite number", name))),
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            PulseError::parse(format!("Field '{}' must be a float, got '{}'", name, s))
        }),
        Some(other) => Err(type_error(name, "float", other)),
        None => Err(PulseError::parse(format!("Missing field '{}'", name))),
    }
}

fn type_error(name: &str, expected: &str, found: &Value) -> PulseError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    };
    PulseError::parse(format!(
        "Field '{}' must be a {}, got {}",
        name, expected, found
    ))
}
