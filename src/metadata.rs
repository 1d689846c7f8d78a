//! Token metadata records
//!
//! Every record in a run points at the same image; only the name changes.

use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub const NAME_PREFIX: &str = "Autogas NFT #";
pub const DESCRIPTION: &str =
    "This is an AutogasNft selling at 100$ purchase more than 100 and you'll be giving discount";
pub const IPFS_SCHEME: &str = "ipfs://";

const SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "required": ["name", "description", "image", "properties", "attributes"],
  "properties": {
    "name": { "type": "string", "minLength": 1 },
    "description": { "type": "string" },
    "image": { "type": "string", "pattern": "^ipfs://.+" },
    "properties": {
      "type": "object",
      "required": ["type", "tier"],
      "properties": {
        "type": { "type": "string" },
        "tier": { "type": "string" }
      }
    },
    "attributes": {
      "type": "array",
      "minItems": 1,
      "items": {
        "type": "object",
        "required": ["trait_type", "value"],
        "properties": {
          "trait_type": { "type": "string" },
          "value": { "type": ["string", "number"] }
        }
      }
    }
  }
}"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub properties: Properties,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(rename = "type")]
    pub kind: String,
    pub tier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

/// Trait values are either text or a JSON number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Number(serde_json::Number),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        AttributeValue::Number(value.into())
    }
}

/// `ipfs://<cid>`
pub fn image_uri(cid: &str) -> String {
    format!("{}{}", IPFS_SCHEME, cid)
}

/// Base URI a contract resolves token metadata against: `ipfs://<cid>/`
pub fn base_uri(cid: &str) -> String {
    format!("{}{}/", IPFS_SCHEME, cid)
}

/// Build the metadata record for one token
pub fn build(image_cid: &str, token_id: u32) -> NftMetadata {
    NftMetadata {
        name: format!("{}{}", NAME_PREFIX, token_id),
        description: DESCRIPTION.to_string(),
        image: image_uri(image_cid),
        properties: Properties {
            kind: "Autogas".to_string(),
            tier: "Standard".to_string(),
        },
        attributes: vec![Attribute {
            trait_type: "Category".to_string(),
            value: "Utility".into(),
        }],
    }
}

/// Serialize a record the way it is written to disk (two-space indent)
pub fn to_pretty_json(metadata: &NftMetadata) -> Result<String> {
    Ok(serde_json::to_string_pretty(metadata)?)
}

/// Compiled schema for metadata records
pub struct SchemaValidator {
    schema: JSONSchema,
}

impl SchemaValidator {
    pub fn new() -> Result<Self> {
        let schema: Value = serde_json::from_str(SCHEMA)?;
        let schema = JSONSchema::compile(&schema)
            .map_err(|e| Error::InvalidMetadata(format!("schema does not compile: {}", e)))?;
        Ok(Self { schema })
    }

    pub fn validate(&self, metadata: &NftMetadata) -> Result<()> {
        let instance = serde_json::to_value(metadata)?;
        let outcome = match self.schema.validate(&instance) {
            Ok(()) => Ok(()),
            Err(errors) => Err(errors
                .map(|e| format!("{} at {}", e, e.instance_path))
                .collect::<Vec<_>>()
                .join("; ")),
        };
        outcome.map_err(|msg| Error::InvalidMetadata(format!("{}: {}", metadata.name, msg)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_fields() {
        let md = build("QmImage", 7);
        assert_eq!(md.name, "Autogas NFT #7");
        assert_eq!(md.image, "ipfs://QmImage");
        assert_eq!(md.description, DESCRIPTION);
        assert_eq!(md.properties.kind, "Autogas");
        assert_eq!(md.properties.tier, "Standard");
        assert_eq!(md.attributes.len(), 1);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = build("bafyabc", 42);
        let b = build("bafyabc", 42);
        assert_eq!(a, b);

        let text = to_pretty_json(&a).unwrap();
        let parsed: NftMetadata = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, b);
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(build("cid1", 1)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Autogas NFT #1",
                "description": DESCRIPTION,
                "image": "ipfs://cid1",
                "properties": { "type": "Autogas", "tier": "Standard" },
                "attributes": [ { "trait_type": "Category", "value": "Utility" } ]
            })
        );
    }

    #[test]
    fn test_pretty_json_field_order() {
        let text = to_pretty_json(&build("cid1", 1)).unwrap();
        let name = text.find("\"name\"").unwrap();
        let image = text.find("\"image\"").unwrap();
        let attributes = text.find("\"attributes\"").unwrap();
        assert!(name < image && image < attributes);
        assert!(text.starts_with("{\n  \"name\""));
    }

    #[test]
    fn test_numeric_attribute_value() {
        let attr: Attribute =
            serde_json::from_value(json!({ "trait_type": "Level", "value": 3 })).unwrap();
        assert_eq!(attr.value, AttributeValue::from(3u64));
    }

    #[test]
    fn test_base_uri() {
        assert_eq!(base_uri("metaCID456"), "ipfs://metaCID456/");
    }

    #[test]
    fn test_validator_accepts_built_record() {
        let validator = SchemaValidator::new().unwrap();
        validator.validate(&build("cid", 1)).unwrap();
    }

    #[test]
    fn test_validator_rejects_bad_image() {
        let validator = SchemaValidator::new().unwrap();
        let mut md = build("cid", 1);
        md.image = "https://example.com/a.jpg".to_string();
        let err = validator.validate(&md).unwrap_err();
        assert!(matches!(err, Error::InvalidMetadata(_)));

        let mut md = build("cid", 2);
        md.attributes.clear();
        assert!(validator.validate(&md).is_err());
    }
}
