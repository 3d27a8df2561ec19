// --- File: src/core/trie.rs
use std::collections::HashMap;

/// Index into the owning table's rule list.
pub type RuleId = usize;

#[derive(Debug, Clone)]
struct TrieNode {
    children: HashMap<char, usize>,
    rule_id: Option<RuleId>,
}

impl TrieNode {
    fn new() -> Self {
        Self { children: HashMap::new(), rule_id: None }
    }
}

/// Arena-backed prefix trie over Preeti sequences.
/// Used to find the longest multi-glyph rule at the current cursor.
#[derive(Debug, Clone)]
pub struct SequenceTrie {
    nodes: Vec<TrieNode>,
}

impl Default for SequenceTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceTrie {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::new()] }
    }

    /// Inserts a sequence. A later insert of the same key replaces the rule id.
    /// O(k) where k is the sequence length.
    pub fn insert(&mut self, key: &str, rule_id: RuleId) {
        let mut node_idx = 0;
        for c in key.chars() {
            let next_idx = if let Some(&id) = self.nodes[node_idx].children.get(&c) {
                id
            } else {
                let new_node_id = self.nodes.len();
                self.nodes.push(TrieNode::new());
                self.nodes[node_idx].children.insert(c, new_node_id);
                new_node_id
            };
            node_idx = next_idx;
        }
        self.nodes[node_idx].rule_id = Some(rule_id);
    }

    /// Longest rule that is a prefix of `text`, with the byte length it covers.
    pub fn longest_match(&self, text: &str) -> Option<(RuleId, usize)> {
        let mut node_idx = 0;
        let mut best = None;
        for (offset, c) in text.char_indices() {
            match self.nodes[node_idx].children.get(&c) {
                Some(&next_idx) => node_idx = next_idx,
                None => break,
            }
            if let Some(id) = self.nodes[node_idx].rule_id {
                best = Some((id, offset + c.len_utf8()));
            }
        }
        best
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_longest_prefix() {
        let mut trie = SequenceTrie::new();
        trie.insert("cf", 0);
        trie.insert("cf]", 1);
        assert_eq!(trie.longest_match("cf]g"), Some((1, 3)));
        assert_eq!(trie.longest_match("cfd"), Some((0, 2)));
        assert_eq!(trie.longest_match("c"), None);
    }

    #[test]
    fn counts_bytes_not_chars() {
        let mut trie = SequenceTrie::new();
        trie.insert("ˆf", 7);
        assert_eq!(trie.longest_match("ˆfx"), Some((7, "ˆf".len())));
    }
}
