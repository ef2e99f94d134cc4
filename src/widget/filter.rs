//! Author filter.
//!
//! The selection is a set of author names. An empty selection means "no
//! filter": every article passes. `toggle` and `clear` are the only
//! mutators; the owner restarts paging from the first page after each one.

use std::collections::HashSet;

use crate::feed::Article;

/// Unique authors in first-occurrence order.
pub fn distinct_authors(articles: &[Article]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(articles.len());
    let mut authors = Vec::new();
    for article in articles {
        if seen.insert(article.author.as_str()) {
            authors.push(article.author.clone());
        }
    }
    authors
}

/// Positions into the loaded article list that pass the filter, in feed order.
///
/// Derived on every filter change; never stored beyond the owning instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    positions: Vec<usize>,
}

impl FilteredView {
    /// The unfiltered view over `len` articles.
    pub fn all(len: usize) -> Self {
        Self {
            positions: (0..len).collect(),
        }
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Resolve the view against the list it was computed from.
    #[cfg(test)]
    pub fn articles<'a>(&'a self, all: &'a [Article]) -> impl Iterator<Item = &'a Article> + 'a {
        self.positions.iter().filter_map(move |&i| all.get(i))
    }
}

/// The distinct authors of the loaded feed plus the current selection.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    authors: Vec<String>,
    selection: SelectionSet,
}

impl FilterState {
    /// Start with nothing selected over the authors observed in `articles`.
    pub fn from_articles(articles: &[Article]) -> Self {
        Self {
            authors: distinct_authors(articles),
            selection: SelectionSet::new(),
        }
    }

    /// Selectable authors, first-occurrence order.
    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Flip `author`. Returns false (and changes nothing) for an author the
    /// loaded feed never mentioned.
    pub fn toggle(&mut self, author: &str) -> bool {
        if !self.authors.iter().any(|a| a == author) {
            return false;
        }
        self.selection.toggle(author);
        true
    }

    /// Deselect everyone. Returns false if nothing was selected.
    pub fn clear(&mut self) -> bool {
        self.selection.clear()
    }

    pub fn apply(&self, articles: &[Article]) -> FilteredView {
        self.selection.apply(articles)
    }

    pub fn label(&self) -> String {
        self.selection.label()
    }
}

/// The set of currently selected authors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    authors: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `author`. Always a mutation.
    pub fn toggle(&mut self, author: &str) {
        if !self.authors.remove(author) {
            self.authors.insert(author.to_string());
        }
    }

    /// Deselect everyone. Returns false if nothing was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.authors.is_empty();
        self.authors.clear();
        changed
    }

    pub fn is_selected(&self, author: &str) -> bool {
        self.authors.contains(author)
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Whether `article` passes the filter.
    pub fn matches(&self, article: &Article) -> bool {
        self.authors.is_empty() || self.authors.contains(&article.author)
    }

    /// The filtered view: the articles that pass, in their original order.
    ///
    /// One pass with a hash lookup per article.
    pub fn apply(&self, articles: &[Article]) -> FilteredView {
        if self.authors.is_empty() {
            return FilteredView::all(articles.len());
        }
        let positions = articles
            .iter()
            .enumerate()
            .filter(|(_, a)| self.matches(a))
            .map(|(i, _)| i)
            .collect();
        FilteredView { positions }
    }

    /// Caption for the filter control.
    pub fn label(&self) -> String {
        match self.len() {
            0 => "Filter authors (all)".to_string(),
            1 => "1 author selected".to_string(),
            n => format!("{} authors selected", n),
        }
    }
}
