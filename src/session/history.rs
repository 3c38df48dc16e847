use super::model::EditRecord;

/// Server-confirmed edits in the order they were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditHistory {
    records: Vec<EditRecord>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only call with a record the server has already confirmed.
    pub fn append(&mut self, record: EditRecord) {
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn latest(&self) -> Option<&EditRecord> {
        self.records.last()
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EditRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EditOperation;

    fn record(filename: &str) -> EditRecord {
        EditRecord {
            operation: EditOperation::RotateRight,
            filename: filename.to_string(),
            url: format!("/static/uploads/{filename}"),
        }
    }

    #[test]
    fn latest_returns_the_record_just_appended() {
        let mut history = EditHistory::new();
        history.append(record("a.png"));
        history.append(record("b.png"));

        assert_eq!(history.latest(), Some(&record("b.png")));
        assert_eq!(history.count(), 2);
    }

    #[test]
    fn clear_empties_history() {
        let mut history = EditHistory::new();
        history.append(record("a.png"));
        history.clear();

        assert!(history.latest().is_none());
        assert_eq!(history.count(), 0);
    }

    #[test]
    fn records_keep_insertion_order() {
        let mut history = EditHistory::new();
        for name in ["1.png", "2.png", "3.png"] {
            history.append(record(name));
        }
        let names: Vec<_> = history.records().iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, ["1.png", "2.png", "3.png"]);
    }
}
