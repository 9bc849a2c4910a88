//! Ordered annotation sequence with whole-sequence replacement semantics
//!
//! Insertion order is z-order: later entries draw on top and are hit-tested
//! first. Every mutation returns a new set; the old one stays valid, so a
//! history snapshot is a cheap reference clone.

use std::sync::Arc;

use crate::domain::{Annotation, AnnotationId};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationSet(Arc<Vec<Annotation>>);

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.0.iter()
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.0.iter().find(|a| a.id() == id)
    }

    /// Annotations of one page, bottom to top
    pub fn on_page(&self, page: u32) -> impl DoubleEndedIterator<Item = &Annotation> + '_ {
        self.0.iter().filter(move |a| a.page() == page)
    }

    /// Whether two sets share the same underlying snapshot
    pub fn ptr_eq(&self, other: &AnnotationSet) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn append(&self, annotation: Annotation) -> Self {
        let mut next = Vec::with_capacity(self.0.len() + 1);
        next.extend(self.0.iter().cloned());
        next.push(annotation);
        Self(Arc::new(next))
    }

    pub fn remove_by_id(&self, id: AnnotationId) -> Self {
        self.filter(|a| a.id() != id)
    }

    /// Drop every annotation on `page`
    pub fn remove_by_page(&self, page: u32) -> Self {
        self.filter(|a| a.page() != page)
    }

    /// Rigidly move one annotation by (dx, dy)
    pub fn translate(&self, id: AnnotationId, dx: f32, dy: f32) -> Self {
        Self(Arc::new(
            self.0
                .iter()
                .map(|a| {
                    if a.id() == id {
                        a.translated(dx, dy)
                    } else {
                        a.clone()
                    }
                })
                .collect(),
        ))
    }

    fn filter(&self, keep: impl Fn(&Annotation) -> bool) -> Self {
        Self(Arc::new(self.0.iter().filter(|a| keep(a)).cloned().collect()))
    }
}

impl FromIterator<Annotation> for AnnotationSet {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
