use serde::{Deserialize, Deserializer, Serialize};

/// A single uninterpreted parameter of a raw block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    Identifier(String),
    /// the decoded content of a string, without quotes
    String(String),
    /// the text of a number, exactly as written
    Number(String),
    Verbatim(String),
}

/// One element of uninterpreted content: a parameter or a nested block.
///
/// Parameters and blocks share one list, so that their relative order is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawItem {
    Value(RawValue),
    Block(RawBlock),
}

/// RawBlock keeps a keyword that is not known at the position where it was found.
///
/// The content is stored without any interpretation, so that the keyword survives
/// a round trip through the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    pub tag: String,
    /// true if the keyword was written as `/begin TAG ... /end TAG`.
    /// Blocks nested inside a raw block are always written in the block form.
    #[serde(default, skip_serializing_if = "super::is_false")]
    pub is_block: bool,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "nested_blocks"
    )]
    pub content: Vec<RawItem>,
}

// nested_blocks()
// Nested raw blocks are always written with /begin and /end, so they are read that way too.
pub(super) fn nested_blocks<'de, D>(deserializer: D) -> Result<Vec<RawItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut content = Vec::<RawItem>::deserialize(deserializer)?;
    for item in &mut content {
        if let RawItem::Block(block) = item {
            block.is_block = true;
        }
    }
    Ok(content)
}

impl RawBlock {
    #[must_use]
    pub fn new(tag: &str, is_block: bool) -> Self {
        Self {
            tag: tag.to_string(),
            is_block,
            content: Vec::new(),
        }
    }

    /// the parameters of the block, without the nested blocks
    pub fn params(&self) -> impl Iterator<Item = &RawValue> {
        self.content.iter().filter_map(|item| match item {
            RawItem::Value(value) => Some(value),
            RawItem::Block(_) => None,
        })
    }

    /// the nested blocks, without the parameters
    pub fn blocks(&self) -> impl Iterator<Item = &RawBlock> {
        self.content.iter().filter_map(|item| match item {
            RawItem::Block(block) => Some(block),
            RawItem::Value(_) => None,
        })
    }
}

impl From<RawValue> for RawItem {
    fn from(value: RawValue) -> Self {
        RawItem::Value(value)
    }
}

impl From<RawBlock> for RawItem {
    fn from(block: RawBlock) -> Self {
        RawItem::Block(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_form() {
        let mut raw = RawBlock::new("VENDOR_SPECIFIC", true);
        raw.content.push(RawValue::Identifier("abc".to_string()).into());
        raw.content.push(RawBlock::new("INNER", true).into());
        raw.content.push(RawValue::Number("0x10".to_string()).into());

        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(
            json,
            r#"{"tag":"VENDOR_SPECIFIC","is_block":true,"content":[{"type":"identifier","value":"abc"},{"tag":"INNER","is_block":true},{"type":"number","value":"0x10"}]}"#
        );
        let restored: RawBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, raw);
        // the block still lies between the two parameters
        assert!(matches!(&restored.content[1], RawItem::Block(inner) if inner.tag == "INNER"));
    }

    #[test]
    fn nested_keyword_from_json() {
        let json = r#"{"tag":"VENDOR","is_block":true,"content":[{"tag":"INNER","content":[{"type":"number","value":"1"}]}]}"#;
        let raw: RawBlock = serde_json::from_str(json).unwrap();
        let RawItem::Block(inner) = &raw.content[0] else {
            panic!("expected a nested block");
        };
        assert!(inner.is_block);

        // the outer keyword keeps its form
        let flag: RawBlock = serde_json::from_str(r#"{"tag":"FLAG"}"#).unwrap();
        assert!(!flag.is_block);
    }

    #[test]
    fn params_and_blocks() {
        let mut raw = RawBlock::new("VENDOR", true);
        raw.content.push(RawBlock::new("A", true).into());
        raw.content.push(RawValue::String("text".to_string()).into());
        raw.content.push(RawBlock::new("B", true).into());

        let params: Vec<&RawValue> = raw.params().collect();
        assert_eq!(params, vec![&RawValue::String("text".to_string())]);
        let tags: Vec<&str> = raw.blocks().map(|block| block.tag.as_str()).collect();
        assert_eq!(tags, vec!["A", "B"]);
    }
}
