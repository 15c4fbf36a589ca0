// JSON loaders for the connection export and per-source product lists
use crate::config::read_file;
use crate::model::{BrandConnectionRecord, ConfigError, ProductRecord};
use std::path::Path;

pub fn load_connections(path: impl AsRef<Path>) -> Result<Vec<BrandConnectionRecord>, ConfigError> {
    let content = read_file(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}

pub fn load_products(path: impl AsRef<Path>) -> Result<Vec<ProductRecord>, ConfigError> {
    let content = read_file(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn connections_accept_export_field_names() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"manufacturer_p1": "Beiersdorf", "manufacturers_p2": "Eucerin;Nivea"}},
                {{"primary_brand": "Hartmann", "related_brands": "MoliCare"}}
            ]"#
        )
        .unwrap();

        let records = load_connections(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].primary_brand, "Beiersdorf");
        assert_eq!(records[0].related_brands, "Eucerin;Nivea");
        assert_eq!(records[1].related_brands, "MoliCare");
    }

    #[test]
    fn products_tolerate_missing_title_and_flag() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"source_id": "1", "title": "NIVEA cream"}},
                {{"source_id": "2", "already_mapped": true, "title": "x"}},
                {{"source_id": "3"}}
            ]"#
        )
        .unwrap();

        let products = load_products(file.path()).unwrap();
        assert_eq!(products.len(), 3);
        assert!(!products[0].already_mapped);
        assert!(products[1].already_mapped);
        assert_eq!(products[2].title, None);
    }

    #[test]
    fn malformed_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{{\"source_id\": ").unwrap();
        assert!(matches!(
            load_products(file.path()),
            Err(ConfigError::Json(_))
        ));
    }
}
