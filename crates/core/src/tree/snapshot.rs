//! JSON snapshot of the tree.
//!
//! Each node is a JSON object: digit-string keys map to child nodes and the
//! reserved key `"titles"` holds the candidate list as a list of word lists.
//!
//! ```text
//! {"3": {"4": {"titles": [["Le", "Petit", "Prince"]]}}}
//! ```

use serde::de::{self, MapAccess, Unexpected, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::node::{LengthNode, LengthTree, Title};
use super::TreeError;

/// Reserved key holding a node's candidate list.
pub const TITLES_KEY: &str = "titles";

impl Serialize for LengthNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.children.len() + usize::from(self.titles.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (length, child) in &self.children {
            map.serialize_entry(&length.to_string(), child)?;
        }
        if let Some(titles) = &self.titles {
            map.serialize_entry(TITLES_KEY, titles)?;
        }
        map.end()
    }
}

struct LengthNodeVisitor;

impl<'de> Visitor<'de> for LengthNodeVisitor {
    type Value = LengthNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of word lengths to nodes, with an optional \"titles\" list")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<LengthNode, A::Error> {
        let mut children = BTreeMap::new();
        let mut titles: Option<Vec<Title>> = None;

        while let Some(key) = map.next_key::<String>()? {
            if key == TITLES_KEY {
                if titles.is_some() {
                    return Err(de::Error::duplicate_field(TITLES_KEY));
                }
                titles = Some(map.next_value()?);
                continue;
            }

            let length: usize = key.parse().map_err(|_| {
                de::Error::invalid_value(Unexpected::Str(&key), &"a word length or \"titles\"")
            })?;
            if children.insert(length, map.next_value()?).is_some() {
                return Err(de::Error::custom(format!("duplicate length key {}", length)));
            }
        }

        Ok(LengthNode { children, titles })
    }
}

impl<'de> Deserialize<'de> for LengthNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LengthNodeVisitor)
    }
}

/// Write the tree to `path` as pretty-printed JSON.
pub fn write_snapshot(tree: &LengthTree, path: &Path) -> Result<(), TreeError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, tree.root())?;
    writer.flush()?;

    info!(
        path = %path.display(),
        top_level_keys = tree.root().children().len(),
        "Snapshot written"
    );
    Ok(())
}

/// Load a tree written by [`write_snapshot`].
pub fn read_snapshot(path: &Path, max_depth: usize) -> Result<LengthTree, TreeError> {
    if !path.exists() {
        return Err(TreeError::SnapshotNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let root: LengthNode = serde_json::from_reader(BufReader::new(file))?;
    Ok(LengthTree::from_root(root, max_depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_tree() -> LengthTree {
        let mut tree = LengthTree::new(20);
        tree.insert(&[3, 4], Title::from_raw("Le Petit Prince"));
        tree.insert(&[3], Title::from_raw("Une"));
        tree.insert(&[5, 1, 2], Title::from_raw("Autre titre"));
        tree
    }

    #[test]
    fn test_serialize_shape() {
        let mut root = LengthNode::new();
        root.insert(&[3, 4], Title::from_raw("Le Petit Prince"));

        let value = serde_json::to_value(&root).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"3": {"4": {"titles": [["Le", "Petit", "Prince"]]}}})
        );
    }

    #[test]
    fn test_deserialize_ignores_key_order() {
        let json = r#"{"titles": [["Root"]], "10": {"titles": [["Ten"]]}, "2": {}}"#;
        let node: LengthNode = serde_json::from_str(json).unwrap();

        assert_eq!(node.titles(), &[Title::from_raw("Root")]);
        assert_eq!(node.candidates_at(&[10]).unwrap(), &[Title::from_raw("Ten")]);
        assert!(node.child(2).unwrap().is_dead_end());
    }

    #[test]
    fn test_deserialize_rejects_unknown_key() {
        let json = r#"{"abc": {}}"#;
        let err = serde_json::from_str::<LengthNode>(json).unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_deserialize_rejects_non_object() {
        assert!(serde_json::from_str::<LengthNode>("[1, 2]").is_err());
    }

    #[test]
    fn test_write_then_read_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        let tree = sample_tree();

        write_snapshot(&tree, &path).unwrap();
        let loaded = read_snapshot(&path, 20).unwrap();

        assert_eq!(loaded, tree);
        assert_eq!(loaded.stats().titles, 3);
    }

    #[test]
    fn test_read_snapshot_with_bad_nested_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(&path, r#"{"3": {"4": {"titles": []}, "four": {}}}"#).unwrap();

        let err = read_snapshot(&path, 20).unwrap_err();
        assert!(matches!(err, TreeError::Json(_)));
        let message = err.to_string();
        assert!(message.contains("four"), "{}", message);
        assert!(message.contains("word length"), "{}", message);
    }

    #[test]
    fn test_read_missing_snapshot() {
        let err = read_snapshot(Path::new("/nonexistent/tree.json"), 20).unwrap_err();
        assert!(matches!(err, TreeError::SnapshotNotFound(_)));
    }

    #[test]
    fn test_read_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(&path, "{\"3\": ").unwrap();

        let err = read_snapshot(&path, 20).unwrap_err();
        assert!(matches!(err, TreeError::Json(_)));
    }
}
