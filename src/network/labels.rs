//! Sanitised topic labels used as matrix column names.

use indexmap::IndexMap;

use crate::nlp::TopicCatalogue;

/// Prefix shared by every topic column.
pub const LABEL_PREFIX: &str = "Topic_";

/// Build the column label for catalogue entry `(id, name)`.
///
/// The id always leads the label (`minus_<n>` for negative ids) so labels of
/// distinct ids cannot collide; a name already starting with the id is not
/// prefixed twice. Characters outside `[alphanumeric . _]` become `_` and
/// runs of `_` collapse.
pub fn sanitize_label(id: i64, name: &str) -> String {
    let id_text = id.to_string();
    let body = match name.strip_prefix(id_text.as_str()) {
        Some("") => "",
        Some(rest) if rest.starts_with(|c: char| matches!(c, '_' | ' ' | '-')) => &rest[1..],
        _ => name,
    };
    let token = if id < 0 {
        format!("minus_{}", id.unsigned_abs())
    } else {
        id_text
    };

    let raw = format!("{LABEL_PREFIX}{token}_{body}");
    let mut label = String::with_capacity(raw.len());
    for ch in raw.chars() {
        let ch = if ch.is_alphanumeric() || ch == '.' || ch == '_' {
            ch
        } else {
            '_'
        };
        if ch == '_' && label.ends_with('_') {
            continue;
        }
        label.push(ch);
    }
    let trimmed = label.trim_end_matches('_').len();
    label.truncate(trimmed);
    label
}

/// Topic id → label, computed once per catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    outlier: i64,
    labels: IndexMap<i64, String>,
}

impl LabelMap {
    pub fn from_catalogue(catalogue: &TopicCatalogue) -> Self {
        let labels = catalogue
            .iter()
            .map(|(id, descriptor)| (id, sanitize_label(id, &descriptor.name)))
            .collect();
        Self {
            outlier: catalogue.outlier(),
            labels,
        }
    }

    pub fn get(&self, id: i64) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    /// Id of the topic whose column never reaches the matrix.
    pub fn outlier(&self) -> i64 {
        self.outlier
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.labels.iter().map(|(id, label)| (*id, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_prefix_not_repeated() {
        assert_eq!(sanitize_label(0, "0_python_code_list"), "Topic_0_python_code_list");
        assert_eq!(sanitize_label(0, "python_list_data"), "Topic_0_python_list_data");
        assert_eq!(sanitize_label(1, "10_lists"), "Topic_1_10_lists");
    }

    #[test]
    fn outlier_gets_spelled_out_sign() {
        assert_eq!(sanitize_label(-1, "-1_the_and_of"), "Topic_minus_1_the_and_of");
    }

    #[test]
    fn illegal_characters_collapse() {
        assert_eq!(sanitize_label(3, "3_loops - while  for"), "Topic_3_loops_while_for");
        assert_eq!(sanitize_label(4, "4_what?!"), "Topic_4_what");
        assert_eq!(sanitize_label(5, "5"), "Topic_5");
    }
}
