use crate::config::PagerConfig;

/// A clickable indicator that refers to one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerItem {
    pub slide_ref: usize,
    pub active: bool,
}

/// Row of indicator items, one per slide.
#[derive(Debug, Clone)]
pub struct Pager {
    wrap: String,
    item_class: String,
    active_class: String,
    items: Vec<PagerItem>,
}

impl Pager {
    /// Builds a pager when the configuration names a wrap and both classes.
    pub fn from_config(cfg: &PagerConfig, len: usize) -> Option<Self> {
        let wrap = cfg.wrap.clone()?;
        let item_class = cfg.item_class.clone()?;
        let active_class = cfg.active_class.clone()?;
        let mut pager = Self {
            wrap,
            item_class,
            active_class,
            items: Vec::new(),
        };
        pager.rebuild(len);
        Some(pager)
    }

    /// Discards all items and creates `len` fresh ones.
    pub fn rebuild(&mut self, len: usize) {
        self.items = (0..len)
            .map(|slide_ref| PagerItem {
                slide_ref,
                active: false,
            })
            .collect();
    }

    pub fn highlight(&mut self, active: usize) {
        for item in &mut self.items {
            item.active = item.slide_ref == active;
        }
    }

    pub fn wrap(&self) -> &str {
        &self.wrap
    }

    pub fn items(&self) -> &[PagerItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.items.iter().find(|i| i.active).map(|i| i.slide_ref)
    }

    /// Class list a host should put on item `index`.
    pub fn classes(&self, index: usize) -> Vec<&str> {
        match self.items.get(index) {
            Some(item) if item.active => vec![self.item_class.as_str(), self.active_class.as_str()],
            Some(_) => vec![self.item_class.as_str()],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PagerConfig {
        PagerConfig {
            wrap: Some("pager".into()),
            item_class: Some("dot".into()),
            active_class: Some("dot-active".into()),
        }
    }

    #[test]
    fn needs_all_three_fields() {
        let mut partial = cfg();
        partial.active_class = None;
        assert!(Pager::from_config(&partial, 3).is_none());
        assert_eq!(Pager::from_config(&cfg(), 3).map(|p| p.len()), Some(3));
    }

    #[test]
    fn highlight_marks_exactly_one() {
        let mut pager = Pager::from_config(&cfg(), 4).unwrap();
        pager.highlight(2);
        assert_eq!(pager.active(), Some(2));
        assert_eq!(pager.items().iter().filter(|i| i.active).count(), 1);
        assert_eq!(pager.classes(2), vec!["dot", "dot-active"]);
        assert_eq!(pager.classes(1), vec!["dot"]);
        assert!(pager.classes(9).is_empty());
    }

    #[test]
    fn rebuild_clears_highlight() {
        let mut pager = Pager::from_config(&cfg(), 2).unwrap();
        pager.highlight(1);
        pager.rebuild(5);
        assert_eq!(pager.len(), 5);
        assert_eq!(pager.active(), None);
        assert_eq!(pager.wrap(), "pager");
    }
}
