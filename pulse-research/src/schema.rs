//! Response schema the model is asked to follow

/// Primitive type of a response field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    List,
    Float,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::List => "list",
            FieldKind::Float => "float",
        }
    }
}

/// One required field of the sentiment profile
#[derive(Debug, Clone, Copy)]
pub struct ResponseField {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, description: &'static str, kind: FieldKind) -> ResponseField {
    ResponseField {
        name,
        description,
        kind,
    }
}

/// The ten fields every model response must carry
pub const RESPONSE_SCHEMA: [ResponseField; 10] = [
    field("company_name", "Name of the company", FieldKind::String),
    field("stock_code", "Stock code of the company", FieldKind::String),
    field("newsdesc", "Summary of the news", FieldKind::String),
    field(
        "sentiment",
        "Sentiment of the news (Positive/Negative/Neutral)",
        FieldKind::String,
    ),
    field("people_names", "List of people mentioned", FieldKind::List),
    field("places_names", "List of places mentioned", FieldKind::List),
    field(
        "other_companies_referred",
        "List of other companies mentioned",
        FieldKind::List,
    ),
    field("related_industries", "List of related industries", FieldKind::List),
    field(
        "market_implications",
        "Market implications of the news",
        FieldKind::String,
    ),
    field(
        "confidence_score",
        "Confidence score of the sentiment",
        FieldKind::Float,
    ),
];

/// Machine-readable formatting instructions appended to the prompt
pub fn format_instructions() -> String {
    let fields = RESPONSE_SCHEMA
        .iter()
        .map(|f| format!("\t\"{}\": {}  // {}", f.name, f.kind.as_str(), f.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "The output should be a markdown code snippet formatted in the following schema, \
         including the leading and trailing \"```json\" and \"```\":\n\n```json\n{{\n{}\n}}\n```",
        fields
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_field_names_are_unique() {
        let mut names: Vec<_> = RESPONSE_SCHEMA.iter().map(|f| f.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RESPONSE_SCHEMA.len());
    }

    #[test]
    fn test_format_instructions_lists_every_field() {
        let instructions = format_instructions();
        assert!(instructions.starts_with("The output should be a markdown code snippet"));
        assert!(instructions.contains("\t\"people_names\": list  // List of people mentioned"));
        assert!(instructions.contains("\t\"confidence_score\": float  // Confidence score of the sentiment"));
        for field in RESPONSE_SCHEMA.iter() {
            assert!(instructions.contains(&format!("\"{}\"", field.name)));
        }
        assert!(instructions.ends_with("}\n```"));
    }
}
