// src/internal/context/mod.rs

//! Immutable, request-scoped value carrier.
//!
//! A [`Context`] is a persistent linked list of typed entries. Deriving a
//! context (`with_value`, `with_logger`) allocates one node pointing at the
//! parent, so the parent stays valid and unchanged and can be shared across
//! threads and tasks.

use std::any::{Any, TypeId};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::internal::logger::Logger;

/// Typed key for values stored in a [`Context`]
pub trait ContextKey: 'static {
    type Value: Send + Sync + 'static;
}

struct Node {
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

/// Key the bound logger lives under
struct LoggerKey;

impl ContextKey for LoggerKey {
    type Value = Logger;
}

tokio::task_local! {
    static CURRENT: Context;
}

impl Context {
    /// Empty root context
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_value<K: ContextKey>(&self, value: K::Value) -> Context {
        Context {
            head: Some(Arc::new(Node {
                key: TypeId::of::<K>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Nearest value stored under `K`, if any
    pub fn value<K: ContextKey>(&self) -> Option<&K::Value> {
        let key = TypeId::of::<K>();
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            if current.key == key {
                return current.value.downcast_ref::<K::Value>();
            }
            node = current.parent.as_deref();
        }
        None
    }

    pub fn with_logger(&self, logger: Logger) -> Context {
        self.with_value::<LoggerKey>(logger)
    }

    pub fn logger(&self) -> Option<&Logger> {
        self.value::<LoggerKey>()
    }

    /// Whether both handles point at the same context value
    pub fn ptr_eq(a: &Context, b: &Context) -> bool {
        match (&a.head, &b.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            depth += 1;
            node = current.parent.as_deref();
        }
        depth
    }

    /// Runs `fut` with this context as [`Context::current`]
    pub async fn scope<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(self, fut).await
    }

    /// Runs `f` with this context as [`Context::current`]
    pub fn sync_scope<F, R>(self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT.sync_scope(self, f)
    }

    /// Context installed by the innermost enclosing scope, or the background
    /// context outside of any scope.
    pub fn current() -> Context {
        CURRENT.try_with(Context::clone).unwrap_or_default()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.depth())
            .field("logger", &self.logger())
            .finish()
    }
}
