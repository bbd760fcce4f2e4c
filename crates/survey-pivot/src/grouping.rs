//! Question grouping by shared variable prefix and shared question text.

use std::collections::BTreeMap;

use survey_common::group_key;
use survey_model::PivotedRow;

/// Longest common leading run of characters of `a` and `b`.
///
/// # Examples
///
/// ```
/// use survey_pivot::common_start;
///
/// assert_eq!(common_start("Question A part 1", "Question A part 2"), "Question A part ");
/// assert_eq!(common_start("abc", "xyz"), "");
/// ```
pub fn common_start(a: &str, b: &str) -> String {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect()
}

/// Running group text per group key for one pivot run.
///
/// Questions `Q5_a`, `Q5_b`, ... share the key `Q5`. The group text starts
/// as the first question's text and shrinks to the prefix common to every
/// question in the group. When that prefix gets shorter than the threshold
/// the key itself becomes the text.
#[derive(Debug, Clone, Default)]
pub struct GroupMap {
    threshold: usize,
    texts: BTreeMap<String, String>,
}

/// Group assigned to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    pub key: String,
    pub text: String,
}

impl GroupMap {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            texts: BTreeMap::new(),
        }
    }

    /// Folds a question into its group and returns the group as it stands.
    pub fn assign(&mut self, question_id: &str, question_text: &str) -> GroupAssignment {
        let key = group_key(question_id).to_string();
        let text = match self.texts.get(&key) {
            None => question_text.to_string(),
            Some(stored) => {
                let common = common_start(question_text, stored);
                if common.chars().count() >= self.threshold {
                    common
                } else {
                    key.clone()
                }
            }
        };
        self.texts.insert(key.clone(), text.clone());
        GroupAssignment { key, text }
    }

    /// Final text of a group.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Rewrites each row's group text with its group's final text.
    pub fn revise(&self, rows: &mut [PivotedRow]) {
        for row in rows {
            if let Some(text) = self.texts.get(&row.question_group_varname) {
                row.question_group_text.clone_from(text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_start() {
        assert_eq!(
            common_start("Question A part 1", "Question A part 2"),
            "Question A part "
        );
        assert_eq!(common_start("same", "same"), "same");
        assert_eq!(common_start("", "abc"), "");
        assert_eq!(common_start("Größe a", "Größe b"), "Größe ");
    }

    #[test]
    fn test_first_question_sets_group_text() {
        let mut groups = GroupMap::new(5);
        let assignment = groups.assign("Q5_a", "How often do you walk?");
        assert_eq!(assignment.key, "Q5");
        assert_eq!(assignment.text, "How often do you walk?");
    }

    #[test]
    fn test_group_text_converges_to_common_prefix() {
        let mut groups = GroupMap::new(5);
        groups.assign("Q5_a", "How often do you: walk");
        let second = groups.assign("Q5_b", "How often do you: cycle");
        assert_eq!(second.text, "How often do you: ");
        let third = groups.assign("Q5_c", "How often do you: drive");
        assert_eq!(third.text, "How often do you: ");
        assert_eq!(groups.text("Q5"), Some("How often do you: "));
    }

    #[test]
    fn test_short_prefix_falls_back_to_key() {
        let mut groups = GroupMap::new(9);
        groups.assign("Q7_a", "Trust in police");
        let second = groups.assign("Q7_b", "Trust in courts");
        assert_eq!(second.text, "Trust in ");
        let mut groups = GroupMap::new(10);
        groups.assign("Q7_a", "Trust in police");
        let second = groups.assign("Q7_b", "Trust in courts");
        assert_eq!(second.text, "Q7");
    }

    #[test]
    fn test_threshold_counts_characters() {
        let mut groups = GroupMap::new(7);
        groups.assign("Q1_a", "Größe a");
        // "Größe " is 6 characters but 8 bytes
        assert_eq!(groups.assign("Q1_b", "Größe b").text, "Q1");
    }

    #[test]
    fn test_ungrouped_questions_use_full_name_as_key() {
        let mut groups = GroupMap::new(3);
        let assignment = groups.assign("Q9", "Overall rating");
        assert_eq!(assignment.key, "Q9");
        assert_eq!(groups.len(), 1);
    }
}
