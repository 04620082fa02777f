use super::DocumentFormat;
use crate::error::{KbError, Result};
use crate::schema::raw::RawDataset;

/// JSON dataset documents
pub struct JsonFormat;

impl DocumentFormat for JsonFormat {
    fn can_parse(&self, extension: &str) -> bool {
        extension == "json"
    }

    fn parse(&self, content: &str, path: &str) -> Result<RawDataset> {
        serde_json::from_str(content)
            .map_err(|e| KbError::Parse(format!("JSON parse error in {}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_format_can_parse() {
        let format = JsonFormat;
        assert!(format.can_parse("json"));
        assert!(!format.can_parse("yaml"));
    }

    #[test]
    fn test_json_sample_dataset() {
        let content = include_str!("../../data/sample_relations.json");
        let dataset = JsonFormat.parse(content, "sample_relations.json").unwrap();
        assert_eq!(dataset.sections.len(), 4);
        assert!(dataset.title.is_some());
        let graph = dataset.sections[1].graph_data.as_ref().unwrap();
        assert_eq!(graph.links[2].dashed, Some(true));
    }

    #[test]
    fn test_json_not_a_document() {
        let err = JsonFormat.parse(r#""just a string""#, "bad.json").unwrap_err();
        assert!(matches!(err, KbError::Parse(_)));
        assert!(err.to_string().contains("bad.json"));

        let err = JsonFormat.parse(r#"{"sections": [}"#, "broken.json").unwrap_err();
        assert!(matches!(err, KbError::Parse(_)));
    }

    #[test]
    fn test_json_wrong_value_type_is_not_fatal() {
        let content = r#"[
            {"id": "a", "title": "A", "content": []},
            {"id": "b", "title": "B", "content": [],
             "relationshipDimensions": [{"name": "Trade", "value": "80", "description": ""}]}
        ]"#;
        let dataset = JsonFormat.parse(content, "p.json").unwrap();
        assert_eq!(dataset.sections.len(), 2);
        assert_eq!(dataset.mismatches.len(), 1);
        assert_eq!(
            dataset.mismatches[0].locator.to_string(),
            "sections[1](b).relationshipDimensions[0].value"
        );
    }

    #[test]
    fn test_json_syntax_error_keeps_position() {
        let err = JsonFormat.parse("[\n  {\"id\": }\n]", "broken.json").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }
}
