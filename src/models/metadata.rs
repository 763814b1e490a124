use crate::error::{Result, SoilError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One column of a soil file: its name and a human readable description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub description: String,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Column layouts per schema (`COS_HYD`, `SOIL_LAYERS`), immutable once loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoilMetadata {
    schemas: HashMap<String, Vec<ColumnSpec>>,
}

impl SoilMetadata {
    pub fn new(schemas: HashMap<String, Vec<ColumnSpec>>) -> Self {
        let schemas = schemas
            .into_iter()
            .map(|(name, columns)| (name.to_uppercase(), columns))
            .collect();
        Self { schemas }
    }

    /// Build from the raw `name -> [[column, description], ...]` layout of the metadata file
    pub fn from_pairs(raw: HashMap<String, Vec<Vec<String>>>) -> Result<Self> {
        let mut schemas = HashMap::with_capacity(raw.len());

        for (schema, pairs) in raw {
            let mut columns = Vec::with_capacity(pairs.len());
            for (idx, pair) in pairs.into_iter().enumerate() {
                let [name, description]: [String; 2] = pair.try_into().map_err(|p: Vec<String>| {
                    SoilError::Config(format!(
                        "Entry {} of schema {} must be a [column, description] pair, got {} items",
                        idx,
                        schema,
                        p.len()
                    ))
                })?;
                columns.push(ColumnSpec::new(name, description));
            }
            schemas.insert(schema, columns);
        }

        Ok(Self::new(schemas))
    }

    pub fn schema(&self, name: &str) -> Result<&[ColumnSpec]> {
        self.schemas
            .get(&name.to_uppercase())
            .map(|columns| columns.as_slice())
            .ok_or_else(|| SoilError::Config(format!("Unknown soil metadata schema: {}", name)))
    }

    pub fn column_names(&self, schema: &str) -> Result<Vec<String>> {
        Ok(self.schema(schema)?.iter().map(|c| c.name.clone()).collect())
    }

    pub fn descriptions(&self, schema: &str) -> Result<HashMap<String, String>> {
        Ok(self
            .schema(schema)?
            .iter()
            .map(|c| (c.name.clone(), c.description.clone()))
            .collect())
    }

    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str, description: &str) -> Vec<String> {
        vec![name.to_string(), description.to_string()]
    }

    #[test]
    fn test_from_pairs_preserves_column_order() {
        let mut raw = HashMap::new();
        raw.insert(
            "cos_hyd".to_string(),
            vec![pair("i", "row"), pair("j", "column"), pair("porosity", "Porosity")],
        );

        let metadata = SoilMetadata::from_pairs(raw).unwrap();
        assert_eq!(
            metadata.column_names("COS_HYD").unwrap(),
            vec!["i", "j", "porosity"]
        );
        assert_eq!(
            metadata.descriptions("cos_hyd").unwrap()["porosity"],
            "Porosity"
        );
        assert_eq!(metadata.schema_names(), vec!["COS_HYD"]);
    }

    #[test]
    fn test_malformed_pair_is_rejected() {
        let mut raw = HashMap::new();
        raw.insert("COS_HYD".to_string(), vec![vec!["i".to_string()]]);

        let err = SoilMetadata::from_pairs(raw).unwrap_err();
        assert!(matches!(err, SoilError::Config(_)));
    }

    #[test]
    fn test_unknown_schema() {
        let metadata = SoilMetadata::default();
        assert!(metadata.schema("SOIL_LAYERS").is_err());
    }
}
