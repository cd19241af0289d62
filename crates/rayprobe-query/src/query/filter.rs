use crate::world::Admission;
use std::fmt;
use std::sync::Arc;

type Predicate<B, S> = Arc<dyn Fn(B, &S) -> bool + Send + Sync>;

/// Decides which bodies take part in a query.
///
/// Excluded bodies are rejected first; the remaining ones are admitted if the
/// predicate, when set, accepts them.
pub struct QueryFilter<B, S: ?Sized> {
    pub exclude_bodies: Vec<B>,
    predicate: Option<Predicate<B, S>>,
}

impl<B, S: ?Sized> QueryFilter<B, S> {
    pub fn new() -> Self {
        Self {
            exclude_bodies: Vec::new(),
            predicate: None,
        }
    }

    pub fn exclude_body(mut self, body: B) -> Self {
        self.exclude_bodies.push(body);
        self
    }

    pub fn predicate(mut self, predicate: impl Fn(B, &S) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }
}

impl<B: Copy + PartialEq, S: ?Sized> QueryFilter<B, S> {
    pub fn test(&self, body: B, shape: &S) -> Admission {
        if self.exclude_bodies.contains(&body) {
            return Admission::Reject;
        }

        match &self.predicate {
            Some(predicate) => predicate(body, shape).into(),
            None => Admission::Admit,
        }
    }
}

impl<B, S: ?Sized> Default for QueryFilter<B, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Clone, S: ?Sized> Clone for QueryFilter<B, S> {
    fn clone(&self) -> Self {
        Self {
            exclude_bodies: self.exclude_bodies.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<B: fmt::Debug, S: ?Sized> fmt::Debug for QueryFilter<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryFilter")
            .field("exclude_bodies", &self.exclude_bodies)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}
