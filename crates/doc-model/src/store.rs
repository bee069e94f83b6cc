//! Annotation store snapshots
//!
//! A snapshot maps 1-based page numbers to the ordered annotations drawn on
//! that page (insertion order is z-order). Snapshots are never mutated: every
//! operation returns a new snapshot that shares untouched pages with its
//! predecessor, so history entries can be compared by reference.

use crate::annotation::Annotation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageNumber(u32);

impl PageNumber {
    pub fn new(number: u32) -> Self {
        debug_assert!(number >= 1, "page numbers start at 1");
        Self(number)
    }

    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// 0-based page index.
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutations that produce a new snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentAction {
    /// Replace one page's whole annotation sequence.
    ReplacePageAnnotations { page: PageNumber, annotations: Vec<Annotation> },
    /// Append one annotation to each listed page, as a single step.
    AddAnnotations { per_page: BTreeMap<PageNumber, Annotation> },
}

type PageMap = BTreeMap<PageNumber, Arc<Vec<Annotation>>>;

/// Immutable version of the full annotation set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<PageNumber, Vec<Annotation>>",
    into = "BTreeMap<PageNumber, Vec<Annotation>>"
)]
pub struct AnnotationSnapshot {
    pages: Arc<PageMap>,
}

impl AnnotationSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotations of `page` in z-order; empty when the page has none.
    pub fn page(&self, page: PageNumber) -> &[Annotation] {
        self.pages.get(&page).map(|annotations| annotations.as_slice()).unwrap_or_default()
    }

    /// Pages that carry at least one annotation, in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = (PageNumber, &[Annotation])> {
        self.pages.iter().map(|(page, annotations)| (*page, annotations.as_slice()))
    }

    pub fn annotation_count(&self) -> usize {
        self.pages.values().map(|annotations| annotations.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Whether both snapshots are the same version (reference equality).
    pub fn ptr_eq(&self, other: &AnnotationSnapshot) -> bool {
        Arc::ptr_eq(&self.pages, &other.pages)
    }

    /// Whether `page` is stored by the same allocation in both snapshots.
    pub fn shares_page(&self, other: &AnnotationSnapshot, page: PageNumber) -> bool {
        match (self.pages.get(&page), other.pages.get(&page)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn replace_page_annotations(
        &self,
        page: PageNumber,
        annotations: Vec<Annotation>,
    ) -> AnnotationSnapshot {
        let mut pages = PageMap::clone(&self.pages);

        if annotations.is_empty() {
            pages.remove(&page);
        } else {
            pages.insert(page, Arc::new(annotations));
        }

        AnnotationSnapshot { pages: Arc::new(pages) }
    }

    pub fn add_annotations(
        &self,
        per_page: impl IntoIterator<Item = (PageNumber, Annotation)>,
    ) -> AnnotationSnapshot {
        let mut pages = PageMap::clone(&self.pages);

        for (page, annotation) in per_page {
            let existing = pages.entry(page).or_default();
            let mut annotations = Vec::with_capacity(existing.len() + 1);
            annotations.extend_from_slice(existing.as_slice());
            annotations.push(annotation);
            *existing = Arc::new(annotations);
        }

        AnnotationSnapshot { pages: Arc::new(pages) }
    }

    pub fn apply(&self, action: DocumentAction) -> AnnotationSnapshot {
        match action {
            DocumentAction::ReplacePageAnnotations { page, annotations } => {
                self.replace_page_annotations(page, annotations)
            }
            DocumentAction::AddAnnotations { per_page } => self.add_annotations(per_page),
        }
    }
}

impl From<BTreeMap<PageNumber, Vec<Annotation>>> for AnnotationSnapshot {
    fn from(map: BTreeMap<PageNumber, Vec<Annotation>>) -> Self {
        let pages = map
            .into_iter()
            .filter(|(_, annotations)| !annotations.is_empty())
            .map(|(page, annotations)| (page, Arc::new(annotations)))
            .collect();

        Self { pages: Arc::new(pages) }
    }
}

impl From<AnnotationSnapshot> for BTreeMap<PageNumber, Vec<Annotation>> {
    fn from(snapshot: AnnotationSnapshot) -> Self {
        snapshot
            .pages
            .iter()
            .map(|(page, annotations)| (*page, annotations.as_ref().clone()))
            .collect()
    }
}
