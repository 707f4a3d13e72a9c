//! The fixed table of known collections

use crate::common::{Error, Result};

/// A runnable collection and where its files live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionDescriptor {
    /// Unique key used with `--collection`
    pub key: &'static str,
    /// Display name
    pub name: &'static str,
    /// Definition file name under the collections directory
    pub file: &'static str,
    /// HTML report file name under the reports directory
    pub report: &'static str,
}

/// Known collections, in run order
pub const COLLECTIONS: &[CollectionDescriptor] = &[
    CollectionDescriptor {
        key: "api",
        name: "NASA Open APIs",
        file: "nasa-openapis.collection.yaml",
        report: "newman.html",
    },
    CollectionDescriptor {
        key: "extras",
        name: "NASA Extras",
        file: "nasa-extras.collection.yaml",
        report: "newman-extras.html",
    },
    CollectionDescriptor {
        key: "donki",
        name: "NASA DONKI Extras",
        file: "nasa-donki-extras.collection.yaml",
        report: "newman-donki-extras.html",
    },
];

/// Resolve the `--collection` value against `table`
///
/// `None` selects everything. Selected descriptors keep table order, not
/// the order the keys were given in.
pub fn select<'a>(
    table: &'a [CollectionDescriptor],
    requested: Option<&str>,
) -> Result<Vec<&'a CollectionDescriptor>> {
    let Some(value) = requested else {
        return Ok(table.iter().collect());
    };

    if value.trim().is_empty() {
        return Err(Error::Config(
            "--collection flag requires a comma separated value".to_string(),
        ));
    }

    let keys: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect();

    let selected: Vec<&CollectionDescriptor> = table
        .iter()
        .filter(|descriptor| keys.contains(&descriptor.key))
        .collect();

    if selected.is_empty() {
        return Err(Error::Config(format!(
            "No matching collections for keys: {}",
            keys.join(", ")
        )));
    }

    Ok(selected)
}

/// Keys in the `--collection` value that name no descriptor in `table`
pub fn unknown_keys(table: &[CollectionDescriptor], requested: Option<&str>) -> Vec<String> {
    requested
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty() && !table.iter().any(|d| d.key == *key))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(selected: &[&CollectionDescriptor]) -> Vec<&'static str> {
        selected.iter().map(|d| d.key).collect()
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, a) in COLLECTIONS.iter().enumerate() {
            for b in &COLLECTIONS[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn test_select_all_by_default() {
        let selected = select(COLLECTIONS, None).unwrap();
        assert_eq!(keys(&selected), vec!["api", "extras", "donki"]);
    }

    #[test]
    fn test_select_keeps_table_order() {
        let selected = select(COLLECTIONS, Some("donki,api")).unwrap();
        assert_eq!(keys(&selected), vec!["api", "donki"]);
    }

    #[test]
    fn test_select_trims_and_skips_empty_items() {
        let selected = select(COLLECTIONS, Some(" extras , ,bogus")).unwrap();
        assert_eq!(keys(&selected), vec!["extras"]);
    }

    #[test]
    fn test_select_missing_value() {
        let err = select(COLLECTIONS, Some("")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("requires a comma separated value"));
    }

    #[test]
    fn test_select_no_match_names_keys() {
        let err = select(COLLECTIONS, Some("bogus,other")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: No matching collections for keys: bogus, other"
        );
    }

    #[test]
    fn test_unknown_keys() {
        assert_eq!(unknown_keys(COLLECTIONS, Some(" extras , ,bogus")), vec!["bogus"]);
        assert!(unknown_keys(COLLECTIONS, Some("api,donki")).is_empty());
        assert!(unknown_keys(COLLECTIONS, None).is_empty());
    }

    #[test]
    fn test_select_only_separators() {
        let err = select(COLLECTIONS, Some(",,")).unwrap_err();
        assert!(err.to_string().contains("No matching collections for keys"));
    }
}
