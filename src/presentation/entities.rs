//! Rebuilding whole words from sub-token NER mentions.
//!
//! The tokenizer behind the NER model splits some words into fragments and
//! marks every fragment after the first with [`CONTINUATION_PREFIX`]. Merging
//! runs per tag group: a continuation extends the last entry of its own
//! group, anything else opens a new entry.

use crate::inference::types::EntityMention;

pub const CONTINUATION_PREFIX: &str = "##";

/// Entity strings grouped by tag. Tags keep first-appearance order; entries
/// keep arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedEntities {
    groups: Vec<(String, Vec<String>)>,
}

impl GroupedEntities {
    pub fn get(&self, tag: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, entries)| entries.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(t, e)| (t.as_str(), e.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    fn entries_mut(&mut self, tag: &str) -> &mut Vec<String> {
        let idx = match self.groups.iter().position(|(t, _)| t == tag) {
            Some(idx) => idx,
            None => {
                self.groups.push((tag.to_string(), Vec::new()));
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx].1
    }
}

/// Merge mentions into whole-word entities grouped by tag.
///
/// A continuation that arrives before any entry of its tag has its prefix
/// dropped and starts a new entry. Empty words and empty fragments are skipped.
pub fn merge_mentions(mentions: &[EntityMention]) -> GroupedEntities {
    let mut grouped = GroupedEntities::default();

    for mention in mentions {
        match mention.word.strip_prefix(CONTINUATION_PREFIX) {
            Some("") => {}
            Some(fragment) => {
                let entries = grouped.entries_mut(mention.tag());
                match entries.last_mut() {
                    Some(last) => last.push_str(fragment),
                    None => entries.push(fragment.to_string()),
                }
            }
            None if mention.word.is_empty() => {}
            None => grouped.entries_mut(mention.tag()).push(mention.word.clone()),
        }
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentions(pairs: &[(&str, &str)]) -> Vec<EntityMention> {
        pairs.iter().map(|(tag, word)| EntityMention::new(tag, word)).collect()
    }

    #[test]
    fn continuation_fragments_join() {
        let g = merge_mentions(&mentions(&[("ORG", "Gold"), ("ORG", "##man"), ("ORG", "##Sachs")]));
        assert_eq!(g.len(), 1);
        assert_eq!(g.get("ORG").unwrap(), ["GoldmanSachs"]);
    }

    #[test]
    fn separate_words_stay_separate() {
        let g = merge_mentions(&mentions(&[("PER", "Tim"), ("PER", "Cook")]));
        assert_eq!(g.get("PER").unwrap(), ["Tim", "Cook"]);
    }

    #[test]
    fn continuation_extends_its_own_group_only() {
        let g = merge_mentions(&mentions(&[
            ("ORG", "Nv"),
            ("PER", "Jensen"),
            ("ORG", "##idia"),
        ]));
        assert_eq!(g.get("ORG").unwrap(), ["Nvidia"]);
        assert_eq!(g.get("PER").unwrap(), ["Jensen"]);
    }

    #[test]
    fn tags_keep_first_appearance_order() {
        let g = merge_mentions(&mentions(&[
            ("PER", "Powell"),
            ("ORG", "Fed"),
            ("PER", "Yellen"),
            ("LOC", "Washington"),
        ]));
        let tags: Vec<&str> = g.iter().map(|(t, _)| t).collect();
        assert_eq!(tags, ["PER", "ORG", "LOC"]);
        assert_eq!(g.get("PER").unwrap(), ["Powell", "Yellen"]);
    }

    #[test]
    fn leading_continuation_drops_prefix() {
        let g = merge_mentions(&mentions(&[("ORG", "##Corp"), ("ORG", "##oration")]));
        assert_eq!(g.get("ORG").unwrap(), ["Corporation"]);
    }

    #[test]
    fn empty_words_and_bare_prefix_ignored() {
        let g = merge_mentions(&mentions(&[("ORG", ""), ("ORG", "##"), ("MISC", "")]));
        assert!(g.is_empty());
        assert!(g.get("ORG").is_none());
    }

    #[test]
    fn dropped_mentions_do_not_claim_tag_position() {
        let g = merge_mentions(&mentions(&[
            ("ORG", "##"),
            ("PER", "Dimon"),
            ("LOC", ""),
            ("ORG", "JPMorgan"),
            ("LOC", "London"),
        ]));
        let tags: Vec<&str> = g.iter().map(|(t, _)| t).collect();
        assert_eq!(tags, ["PER", "ORG", "LOC"]);
        assert_eq!(g.get("ORG").unwrap(), ["JPMorgan"]);
    }

    #[test]
    fn raw_bio_tags_merge_into_one_group() {
        let raw: Vec<EntityMention> = serde_json::from_value(serde_json::json!([
            { "entity": "B-ORG", "word": "JP" },
            { "entity": "I-ORG", "word": "##Morgan" }
        ]))
        .unwrap();
        let g = merge_mentions(&raw);
        assert_eq!(g.get("ORG").unwrap(), ["JPMorgan"]);
    }

    #[test]
    fn no_mentions_no_groups() {
        assert!(merge_mentions(&[]).is_empty());
    }
}
