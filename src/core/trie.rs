//! Prefix tree over registered names.
//!
//! Children are kept in a `BTreeMap`, so prefix iteration yields keys in
//! lexicographic order. `cvarlist sv_` relies on that.

use std::collections::BTreeMap;

/// A trie (prefix tree) for string keys.
///
/// # Examples
///
/// ```
/// use bevy_convar_console::core::Trie;
///
/// let mut trie = Trie::new();
/// trie.insert("sv_gravity", 800);
/// trie.insert("sv_cheats", 0);
/// trie.insert("cl_fov", 90);
///
/// assert_eq!(trie.get("sv_gravity"), Some(&800));
///
/// let sv: Vec<_> = trie.prefix_iter("sv_").map(|(k, _)| k).collect();
/// assert_eq!(sv, vec!["sv_cheats", "sv_gravity"]);
/// ```
#[derive(Debug, Clone)]
pub struct Trie<V> {
    root: TrieNode<V>,
    len: usize,
}

#[derive(Debug, Clone)]
struct TrieNode<V> {
    children: BTreeMap<char, TrieNode<V>>,
    entry: Option<(Box<str>, V)>,
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
            entry: None,
        }
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::default(),
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, key: &str) -> Option<&TrieNode<V>> {
        key.chars()
            .try_fold(&self.root, |node, c| node.children.get(&c))
    }

    /// Insert a key, returning the previous value if it existed.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let mut node = &mut self.root;
        for c in key.chars() {
            node = node.children.entry(c).or_default();
        }

        let old = node.entry.replace((key.into(), value)).map(|(_, v)| v);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.node(key)?.entry.as_ref().map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a key, pruning branches left without entries.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let chars: Vec<char> = key.chars().collect();
        let removed = Self::remove_at(&mut self.root, &chars)?;
        self.len -= 1;
        Some(removed)
    }

    fn remove_at(node: &mut TrieNode<V>, key: &[char]) -> Option<V> {
        let Some((first, rest)) = key.split_first() else {
            return node.entry.take().map(|(_, v)| v);
        };

        let child = node.children.get_mut(first)?;
        let removed = Self::remove_at(child, rest);
        if child.entry.is_none() && child.children.is_empty() {
            node.children.remove(first);
        }
        removed
    }

    /// Iterate over entries whose key starts with `prefix`, in key order.
    pub fn prefix_iter(&self, prefix: &str) -> PrefixIter<'_, V> {
        PrefixIter {
            stack: self.node(prefix).into_iter().collect(),
        }
    }

    /// Iterate over every entry in key order.
    pub fn iter(&self) -> PrefixIter<'_, V> {
        self.prefix_iter("")
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k)
    }
}

/// Depth-first, ordered iterator over entries under a prefix.
pub struct PrefixIter<'a, V> {
    stack: Vec<&'a TrieNode<V>>,
}

impl<'a, V> Iterator for PrefixIter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            // Reversed so the smallest child is popped first
            self.stack.extend(node.children.values().rev());

            if let Some((key, value)) = &node.entry {
                return Some((key, value));
            }
        }
        None
    }
}
