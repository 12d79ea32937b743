use crate::{DetailKey, EntityDetail, RawMatch};

/// Position of a match row: index of its state result in arrival order, then
/// index within that result's raw matches. Stable because results are
/// append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchRef {
    pub result_index: usize,
    pub match_index: usize,
}

impl MatchRef {
    pub fn new(result_index: usize, match_index: usize) -> Self {
        Self {
            result_index,
            match_index,
        }
    }
}

/// Expand/collapse state for one match row plus its lazily loaded detail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchExpansion {
    key: Option<DetailKey>,
    expanded: bool,
    loading: bool,
    detail: Option<EntityDetail>,
}

impl MatchExpansion {
    pub fn new(key: Option<DetailKey>) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    /// Rows without a file number never fetch.
    pub fn for_match(state_code: &str, raw: &RawMatch) -> Self {
        Self::new(
            raw.file_number()
                .map(|file_number| DetailKey::new(state_code, file_number)),
        )
    }

    /// Flips the row. Returns the key to fetch on the first expansion of a
    /// row that has a key and no detail yet.
    pub fn toggle(&mut self) -> Option<DetailKey> {
        self.expanded = !self.expanded;
        if !self.expanded || self.loading || self.detail.is_some() {
            return None;
        }
        let key = self.key.clone()?;
        self.loading = true;
        Some(key)
    }

    pub fn resolve(&mut self, detail: EntityDetail) {
        self.detail = Some(detail);
        self.loading = false;
    }

    pub fn key(&self) -> Option<&DetailKey> {
        self.key.as_ref()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn detail(&self) -> Option<&EntityDetail> {
        self.detail.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::MatchExpansion;
    use crate::{DetailKey, EntityDetail, RawMatch};

    #[test]
    fn open_close_open_requests_detail_once() {
        let raw = RawMatch::from_fields([("name", "ACME LLC"), ("file_number", "1234")]);
        let mut row = MatchExpansion::for_match("de", &raw);

        assert_eq!(row.toggle(), Some(DetailKey::new("DE", "1234")));
        assert!(row.is_loading());
        assert_eq!(row.toggle(), None);
        assert!(!row.is_expanded());
        assert_eq!(row.toggle(), None);
        assert!(row.is_loading());

        row.resolve(EntityDetail::unavailable(&DetailKey::new("DE", "1234"), "boom"));
        assert!(!row.is_loading());
        row.toggle();
        assert_eq!(row.toggle(), None);
        assert!(row.detail().is_some());
    }

    #[test]
    fn row_without_file_number_is_display_only() {
        let raw = RawMatch::from_fields([("name", "ACME LLC")]);
        let mut row = MatchExpansion::for_match("DE", &raw);
        assert_eq!(row.toggle(), None);
        assert!(row.is_expanded());
        assert!(!row.is_loading());
        assert_eq!(row.toggle(), None);
        assert!(!row.is_expanded());
    }
}
