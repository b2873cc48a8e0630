//! # Namespace Registry
//!
//! The shared, concurrent namespace map written by parallel build tasks.
//! Namespaces are created with insert-if-absent semantics under a write lock;
//! each namespace's declarations sit behind their own mutex, so sibling tasks
//! only contend when they touch the same namespace.

use crate::codedom::{CodeClass, CodeEnum, CodeNamespace, DeclarationKind, DeclarationRef};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

#[derive(Default)]
struct NamespaceDraft {
    classes: BTreeMap<String, CodeClass>,
    enums: BTreeMap<String, CodeEnum>,
}

impl NamespaceDraft {
    fn find(&self, name: &str) -> Option<DeclarationKind> {
        if self.classes.contains_key(name) {
            Some(DeclarationKind::Class)
        } else if self.enums.contains_key(name) {
            Some(DeclarationKind::Enum)
        } else {
            None
        }
    }
}

type SharedDraft = Arc<Mutex<NamespaceDraft>>;

fn lock(draft: &SharedDraft) -> MutexGuard<'_, NamespaceDraft> {
    draft.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Concurrent map from namespace name to its declarations.
#[derive(Default)]
pub(crate) struct NamespaceRegistry {
    namespaces: RwLock<BTreeMap<String, SharedDraft>>,
}

impl NamespaceRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the draft for `name`, creating it atomically if absent.
    fn draft(&self, name: &str) -> SharedDraft {
        {
            let read = self.namespaces.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(draft) = read.get(name) {
                return Arc::clone(draft);
            }
        }
        let mut write = self.namespaces.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(write.entry(name.to_string()).or_default())
    }

    fn existing_draft(&self, name: &str) -> Option<SharedDraft> {
        let read = self.namespaces.read().unwrap_or_else(PoisonError::into_inner);
        read.get(name).map(Arc::clone)
    }

    /// Makes sure the namespace exists.
    pub(crate) fn ensure_namespace(&self, name: &str) {
        self.draft(name);
    }

    /// Inserts `class` unless the name is taken in `namespace`.
    /// Returns the reference and whether this call inserted it.
    pub(crate) fn insert_class_if_absent(
        &self,
        namespace: &str,
        class: CodeClass,
    ) -> (DeclarationRef, bool) {
        let draft = self.draft(namespace);
        let mut guard = lock(&draft);
        let name = class.name.clone();
        if let Some(kind) = guard.find(&name) {
            return (
                DeclarationRef {
                    namespace: namespace.to_string(),
                    name,
                    kind,
                },
                false,
            );
        }
        guard.classes.insert(name.clone(), class);
        (DeclarationRef::class(namespace, name), true)
    }

    /// Inserts `enumeration` unless the name is taken in `namespace`.
    pub(crate) fn insert_enum_if_absent(
        &self,
        namespace: &str,
        enumeration: CodeEnum,
    ) -> (DeclarationRef, bool) {
        let draft = self.draft(namespace);
        let mut guard = lock(&draft);
        let name = enumeration.name.clone();
        if let Some(kind) = guard.find(&name) {
            return (
                DeclarationRef {
                    namespace: namespace.to_string(),
                    name,
                    kind,
                },
                false,
            );
        }
        guard.enums.insert(name.clone(), enumeration);
        (DeclarationRef::enumeration(namespace, name), true)
    }

    /// Finds a declaration named `name`, looking in `preferred` first and then
    /// in every namespace, shallowest first.
    pub(crate) fn find_declaration_anywhere(
        &self,
        preferred: &str,
        name: &str,
    ) -> Option<DeclarationRef> {
        let found = |namespace: &str, draft: &SharedDraft| {
            lock(draft).find(name).map(|kind| DeclarationRef {
                namespace: namespace.to_string(),
                name: name.to_string(),
                kind,
            })
        };
        if let Some(draft) = self.existing_draft(preferred) {
            if let Some(declaration) = found(preferred, &draft) {
                return Some(declaration);
            }
        }
        let mut drafts: Vec<(String, SharedDraft)> = {
            let read = self.namespaces.read().unwrap_or_else(PoisonError::into_inner);
            read.iter()
                .filter(|(namespace, _)| namespace.as_str() != preferred)
                .map(|(namespace, draft)| (namespace.clone(), Arc::clone(draft)))
                .collect()
        };
        drafts.sort_by_key(|(namespace, _)| namespace.split('.').count());
        drafts
            .iter()
            .find_map(|(namespace, draft)| found(namespace, draft))
    }

    /// Runs `f` on the class behind `declaration` while holding its namespace lock.
    /// `f` must not call back into the registry.
    pub(crate) fn with_class<R>(
        &self,
        declaration: &DeclarationRef,
        f: impl FnOnce(&mut CodeClass) -> R,
    ) -> Option<R> {
        let draft = self.existing_draft(&declaration.namespace)?;
        let mut guard = lock(&draft);
        guard.classes.get_mut(&declaration.name).map(f)
    }

    /// Assembles the owned tree.
    pub(crate) fn into_tree(self) -> CodeNamespace {
        let namespaces = self
            .namespaces
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut root = CodeNamespace::root();
        for (name, draft) in namespaces {
            let draft = match Arc::try_unwrap(draft) {
                Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
                Err(shared) => {
                    let mut guard = lock(&shared);
                    std::mem::take(&mut *guard)
                }
            };
            let ns = root.ensure_namespace(&name);
            for class in draft.classes.into_values() {
                ns.add_class(class);
            }
            for enumeration in draft.enums.into_values() {
                ns.add_enum(enumeration);
            }
        }
        root
    }
}
