//! Conversion between a [`Table`] and plain, serializable data.
//!
//! A scope is persisted as
//!
//! ```text
//! { "entries": [{ "identifier": ..., "kind": ..., "type": ... }, ...],
//!   "children": [<scope>, ...] }
//! ```
//!
//! Parent links are not stored. They are rebuilt from the nesting on load.
use crate::{
    report::{error_json, error_malformed, error_too_deep, Error},
    Entry, ScopeId, Table,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Deepest scope nesting, relative to the serialized scope, that JSON text can
/// hold. Each level costs two containers (the scope object and its `children`
/// list), and `serde_json` refuses to read more than 128 nested containers.
pub const JSON_SCOPE_LIMIT: usize = 60;

/// Deepest container nesting accepted by [`Table::from_value`], matching what
/// `serde_json` accepts from text.
const VALUE_NESTING_LIMIT: usize = 128;

/// Plain data describing a scope subtree.
///
/// Missing `entries` or `children` lists are treated as empty.
///
/// Comparing and dropping walk the tree with an explicit stack, so any depth
/// is fine. The derived `Debug` and the serde impls recurse, which the JSON
/// conversions on [`Table`] guard with [`JSON_SCOPE_LIMIT`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScopeData {
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub children: Vec<ScopeData>,
}

impl ScopeData {
    /// Return the number of scopes described, including this one.
    pub fn scope_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(data) = stack.pop() {
            count += 1;
            stack.extend(&data.children);
        }

        count
    }
}

impl PartialEq for ScopeData {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.entries != b.entries || a.children.len() != b.children.len() {
                return false;
            }
            stack.extend(a.children.iter().zip(&b.children));
        }

        true
    }
}

impl Eq for ScopeData {}

impl Drop for ScopeData {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut data) = stack.pop() {
            stack.append(&mut data.children);
        }
    }
}

impl Table {
    /// Return the subtree rooted at `scope` as plain data, depth first and in
    /// insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::Table;
    ///
    /// let mut table = Table::new();
    /// let root = table.root();
    /// table.insert_must(root, "y", "const", "float");
    /// table.enter(root);
    ///
    /// let data = table.serialize(root);
    /// assert_eq!(data.entries.len(), 1);
    /// assert_eq!(data.children.len(), 1);
    /// ```
    pub fn serialize(&self, scope: ScopeId) -> ScopeData {
        // Every scope lands in `order` before its children.
        let mut order = vec![scope];
        let mut next = 0;
        while let Some(&id) = order.get(next) {
            order.extend_from_slice(self.children(id));
            next += 1;
        }

        let mut built: Vec<Option<ScopeData>> = Vec::new();
        built.resize_with(self.scope_count(), || None);
        for &id in order.iter().rev() {
            let children: Vec<ScopeData> = self
                .children(id)
                .iter()
                .map(|child| {
                    built[child.index()]
                        .take()
                        .expect("children should be built before their parent")
                })
                .collect();
            built[id.index()] = Some(ScopeData {
                entries: self.entries(id).to_vec(),
                children,
            });
        }

        built[scope.index()]
            .take()
            .expect("the requested scope should be built last")
    }

    /// Build a new [`Table`] from plain data. The top level becomes the root, and
    /// every nested scope is linked to the scope that contains it.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `MalformedData` if any scope declares the same
    /// identifier twice. No table is produced in that case.
    pub fn deserialize(data: &ScopeData) -> Result<Table, Error> {
        let mut table = Table::new();
        let mut stack = vec![(table.root(), data)];

        while let Some((scope, data)) = stack.pop() {
            if let Some(identifier) = find_duplicate(&data.entries) {
                return Err(error_malformed(format!(
                    "`{identifier}` is declared more than once in scope `{}`",
                    table.path(scope)
                )));
            }
            table.replace_entries(scope, data.entries.clone());

            // Enter children in order, but pop them first to last.
            let start = stack.len();
            for child_data in &data.children {
                stack.push((table.enter(scope), child_data));
            }
            stack[start..].reverse();
        }
        log::debug!("rebuilt table with {} scopes", table.scope_count());

        Ok(table)
    }

    /// Return the subtree rooted at `scope` as a JSON [`Value`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `TooDeep` if scopes below `scope` nest deeper
    /// than [`JSON_SCOPE_LIMIT`].
    pub fn to_value(&self, scope: ScopeId) -> Result<Value, Error> {
        let data = self.serialize_for_json(scope)?;
        Ok(serde_json::to_value(data).expect("scope data should always serialize"))
    }

    /// Return the subtree rooted at `scope` as compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `TooDeep` if scopes below `scope` nest deeper
    /// than [`JSON_SCOPE_LIMIT`].
    pub fn to_json(&self, scope: ScopeId) -> Result<String, Error> {
        let data = self.serialize_for_json(scope)?;
        Ok(serde_json::to_string(&data).expect("scope data should always serialize"))
    }

    /// Return the subtree rooted at `scope` as indented JSON text.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `TooDeep` if scopes below `scope` nest deeper
    /// than [`JSON_SCOPE_LIMIT`].
    pub fn to_json_pretty(&self, scope: ScopeId) -> Result<String, Error> {
        let data = self.serialize_for_json(scope)?;
        Ok(serde_json::to_string_pretty(&data).expect("scope data should always serialize"))
    }

    /// Build a new [`Table`] from a JSON [`Value`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `MalformedData` if an entry is missing its
    /// `identifier`, `kind` or `type`, if any part has the wrong shape, if a
    /// scope declares the same identifier twice, or if the value nests more
    /// containers than `serde_json` reads from text.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{ErrorKind, Table};
    /// use serde_json::json;
    ///
    /// let table = Table::from_value(json!({
    ///     "entries": [{ "identifier": "y", "kind": "const", "type": "float" }],
    ///     "children": [{ "entries": [] }],
    /// }))
    /// .unwrap();
    /// let child = table.children(table.root())[0];
    /// assert_eq!(table.lookup(child, "y").unwrap().ty(), "float");
    ///
    /// let broken = Table::from_value(json!({ "entries": [{ "identifier": "y" }] }));
    /// assert_eq!(broken.unwrap_err().kind(), ErrorKind::MalformedData);
    /// ```
    pub fn from_value(value: Value) -> Result<Table, Error> {
        if value_nesting(&value) > VALUE_NESTING_LIMIT {
            return Err(error_malformed(format!(
                "value nests more than {VALUE_NESTING_LIMIT} arrays and objects"
            )));
        }
        let data: ScopeData = serde_json::from_value(value).map_err(error_malformed)?;
        Table::deserialize(&data)
    }

    /// Build a new [`Table`] from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind `MalformedData` under the same conditions as
    /// [`from_value`][`Table::from_value`], or if the text is not valid JSON.
    /// Syntax and shape errors point at the offending location in `text`.
    pub fn from_json(text: &str) -> Result<Table, Error> {
        let data: ScopeData = serde_json::from_str(text).map_err(|e| error_json(text, &e))?;
        Table::deserialize(&data)
    }

    /// Serialize `scope`, refusing subtrees the JSON form cannot hold.
    fn serialize_for_json(&self, scope: ScopeId) -> Result<ScopeData, Error> {
        let height = self.height(scope);
        if height > JSON_SCOPE_LIMIT {
            return Err(error_too_deep(height, JSON_SCOPE_LIMIT));
        }

        Ok(self.serialize(scope))
    }

    /// Name `scope` by the child positions leading to it from the root, like
    /// `root.children[0].children[2]`.
    fn path(&self, scope: ScopeId) -> String {
        let mut steps: Vec<usize> = self
            .ancestors(scope)
            .filter_map(|id| {
                let parent = self.parent(id)?;
                self.children(parent).iter().position(|&c| c == id)
            })
            .collect();
        steps.reverse();

        let mut path = String::from("root");
        for step in steps {
            path.push_str(&format!(".children[{step}]"));
        }
        path
    }
}

/// Return the first identifier that appears twice, if any.
fn find_duplicate(entries: &[Entry]) -> Option<&str> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(Entry::identifier)
        .find(|identifier| !seen.insert(*identifier))
}

/// Return how many arrays and objects nest inside each other in `value`.
fn value_nesting(value: &Value) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(value, 0)];
    while let Some((value, depth)) = stack.pop() {
        match value {
            Value::Array(items) => stack.extend(items.iter().map(|item| (item, depth + 1))),
            Value::Object(map) => stack.extend(map.values().map(|item| (item, depth + 1))),
            _ => continue,
        }
        deepest = deepest.max(depth + 1);
    }

    deepest
}

#[cfg(test)]
mod tests {
    use super::{ScopeData, JSON_SCOPE_LIMIT};
    use crate::{Entry, ErrorKind, ScopeId, Table};
    use serde_json::json;
    use test_log::test;

    /// Return a Table holding a chain of `depth` scopes below the root, with one
    /// entry at the root and one in the innermost scope.
    fn get_chain_table(depth: usize) -> (Table, ScopeId) {
        let mut table = Table::new();
        let mut current = table.root();
        table.insert_must(current, "y", "const", "float");
        for _ in 0..depth {
            current = table.enter(current);
        }
        table.insert_must(current, "x", "variable", "int");
        (table, current)
    }

    /// Return a Table with entries spread over three levels and two siblings.
    fn get_test_table() -> Table {
        let mut table = Table::new();
        let root = table.root();
        table.insert_must(root, "y", "const", "float");
        let first = table.enter(root);
        table.insert_must(first, "x", "variable", "int");
        table.insert_must(first, "f", "function", "fn(int) -> int");
        let nested = table.enter(first);
        table.insert_must(nested, "x", "variable", "bool");
        let second = table.enter(root);
        table.insert_must(second, "z", "variable", "string");
        table
    }

    #[test]
    fn test_serialize_shape() {
        let table = get_test_table();

        assert_eq!(
            table.to_value(table.root()).unwrap(),
            json!({
                "entries": [{ "identifier": "y", "kind": "const", "type": "float" }],
                "children": [
                    {
                        "entries": [
                            { "identifier": "x", "kind": "variable", "type": "int" },
                            { "identifier": "f", "kind": "function", "type": "fn(int) -> int" },
                        ],
                        "children": [
                            {
                                "entries": [
                                    { "identifier": "x", "kind": "variable", "type": "bool" },
                                ],
                                "children": [],
                            },
                        ],
                    },
                    {
                        "entries": [{ "identifier": "z", "kind": "variable", "type": "string" }],
                        "children": [],
                    },
                ],
            })
        );
    }

    #[test]
    fn test_serialize_subtree() {
        let table = get_test_table();
        let first = table.children(table.root())[0];
        let data = table.serialize(first);

        assert_eq!(data.entries[0], Entry::new("x", "variable", "int"));
        assert_eq!(data.scope_count(), 2);
    }

    #[test]
    fn test_round_trip() {
        let table = get_test_table();
        let data = table.serialize(table.root());
        let rebuilt = Table::deserialize(&data).unwrap();

        assert_eq!(rebuilt.serialize(rebuilt.root()), data);
        assert_eq!(rebuilt.scope_count(), table.scope_count());
    }

    #[test]
    fn test_round_trip_json_text() {
        let table = get_test_table();
        let text = table.to_json(table.root()).unwrap();
        let rebuilt = Table::from_json(&text).unwrap();

        assert_eq!(rebuilt.to_json(rebuilt.root()).unwrap(), text);

        let pretty = Table::from_json(&table.to_json_pretty(table.root()).unwrap()).unwrap();
        assert_eq!(pretty.serialize(pretty.root()), table.serialize(table.root()));
    }

    #[test]
    fn test_rebuilt_child_falls_back_to_root() {
        let mut table = Table::new();
        let root = table.root();
        table.insert_must(root, "y", "const", "float");
        let child = table.enter(root);
        table.insert_must(child, "x", "var", "int");

        let rebuilt = Table::deserialize(&table.serialize(root)).unwrap();
        let child = rebuilt.children(rebuilt.root())[0];

        assert_eq!(rebuilt.lookup(child, "y").unwrap(), &Entry::new("y", "const", "float"));
        assert_eq!(rebuilt.lookup(child, "x").unwrap().ty(), "int");
        assert_eq!(rebuilt.parent(child), Some(rebuilt.root()));
    }

    #[test]
    fn test_rebuilt_nested_parents() {
        let table = get_test_table();
        let rebuilt = Table::deserialize(&table.serialize(table.root())).unwrap();
        let first = rebuilt.children(rebuilt.root())[0];
        let nested = rebuilt.children(first)[0];

        assert_eq!(rebuilt.parent(nested), Some(first));
        assert_eq!(rebuilt.depth(nested), 2);
        assert_eq!(rebuilt.lookup(nested, "x").unwrap().ty(), "bool");
        assert_eq!(rebuilt.lookup(nested, "f").unwrap().kind(), "function");
        assert_eq!(rebuilt.lookup(nested, "y").unwrap().ty(), "float");
        assert!(rebuilt.lookup(nested, "z").is_err());
    }

    #[test]
    fn test_missing_lists_default() {
        let table = Table::from_value(json!({})).unwrap();

        assert!(table.is_empty());
        assert_eq!(table.scope_count(), 1);
        assert_eq!(
            Table::from_value(json!({ "children": [{}, {}] }))
                .unwrap()
                .scope_count(),
            3
        );
    }

    #[test]
    fn test_missing_entry_field() {
        let result = Table::from_value(json!({
            "children": [{ "entries": [{ "identifier": "x", "type": "int" }] }],
        }));
        let err = result.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedData);
        assert!(err.get_help().is_some_and(|h| h.contains("kind")));
    }

    #[test]
    fn test_wrong_shape() {
        for value in [
            json!("scope"),
            json!({ "entries": 5 }),
            json!({ "entries": [{ "identifier": "x", "kind": "var", "type": 3 }] }),
            json!({ "children": [5] }),
        ] {
            let err = Table::from_value(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedData);
        }
    }

    #[test]
    fn test_duplicate_identifier_in_data() {
        let data = ScopeData {
            entries: vec![],
            children: vec![ScopeData {
                entries: vec![Entry::new("x", "var", "int"), Entry::new("x", "var", "bool")],
                children: vec![],
            }],
        };
        let err = Table::deserialize(&data).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedData);
        assert!(err
            .get_help()
            .is_some_and(|h| h.contains("root.children[0]")));
    }

    #[test]
    fn test_json_syntax_error_points() {
        let err = Table::from_json("{\n  \"entries\": [,]\n}").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedData);
        assert!(err.has_visual());
        assert!(format!("{err:#}").contains("--> <input>:2:"));
    }

    #[test]
    fn test_json_empty_text() {
        let err = Table::from_json("").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedData);
    }

    #[test]
    fn test_round_trip_deep_chain() {
        let (table, _) = get_chain_table(10_000);
        let data = table.serialize(table.root());
        assert_eq!(data.scope_count(), 10_001);

        let rebuilt = Table::deserialize(&data).unwrap();
        assert!(rebuilt.serialize(rebuilt.root()) == data);

        let mut innermost = rebuilt.root();
        while let Some(&child) = rebuilt.children(innermost).first() {
            innermost = child;
        }
        assert_eq!(rebuilt.depth(innermost), 10_000);
        assert_eq!(rebuilt.lookup(innermost, "y").unwrap().ty(), "float");
        assert_eq!(rebuilt.lookup(innermost, "x").unwrap().ty(), "int");
    }

    #[test]
    fn test_duplicate_path_deep() {
        let mut data = ScopeData::default();
        data.entries.push(Entry::new("x", "var", "int"));
        data.entries.push(Entry::new("x", "var", "bool"));
        for _ in 0..3 {
            data = ScopeData {
                entries: vec![],
                children: vec![ScopeData::default(), data],
            };
        }
        let err = Table::deserialize(&data).unwrap_err();

        assert!(err.get_help().is_some_and(|h| h.contains(
            "scope `root.children[1].children[1].children[1]`"
        )));
    }

    #[test]
    fn test_json_at_scope_limit() {
        let (table, _) = get_chain_table(JSON_SCOPE_LIMIT);
        let text = table.to_json(table.root()).unwrap();
        let rebuilt = Table::from_json(&text).unwrap();

        assert_eq!(rebuilt.height(rebuilt.root()), JSON_SCOPE_LIMIT);
        assert!(rebuilt.serialize(rebuilt.root()) == table.serialize(table.root()));
    }

    #[test]
    fn test_json_past_scope_limit() {
        let (table, innermost) = get_chain_table(10_000);

        for result in [
            table.to_json(table.root()).map(|_| ()),
            table.to_json_pretty(table.root()).map(|_| ()),
            table.to_value(table.root()).map(|_| ()),
        ] {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::TooDeep);
        }

        let parent = table.parent(innermost).unwrap();
        assert!(table.to_json(parent).is_ok());
    }

    #[test]
    fn test_value_nesting_limit() {
        let mut value = json!({});
        for _ in 0..200 {
            value = json!({ "children": [value] });
        }
        let err = Table::from_value(value).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedData);
    }
}
