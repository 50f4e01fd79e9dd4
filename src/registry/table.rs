//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::pass::{PassIdentity, PassKind};
use crate::registry::{PassSource, RegistryError};
use crate::utility::{SaHashMap, SaHashSet};
use static_assertions::assert_impl_all;
use std::slice;

/// The catalog of every pass known to the compiler.
///
/// A registry goes through two phases:
///
/// 1. Loading: passes are added through [`Self::register`] and [`Self::load`].
///    [`Self::lookup`] is not allowed during this phase and returns
///    [`RegistryError::NotFrozen`].
/// 2. Frozen: after [`Self::freeze`] the registry is read-only, and can be
///    shared between any number of threads without synchronization.
///
/// Registration order is preserved and is observable through [`Self::all`],
/// it is the order of the default pipeline.
///
/// ```
/// # use passpipe::pass::PassKind;
/// # use passpipe::registry::PassRegistry;
/// let mut registry = PassRegistry::new();
/// registry.register("SILCleanup", PassKind::Transform).unwrap();
/// registry.register("DCE", PassKind::Transform).unwrap();
/// registry.freeze();
///
/// let names: Vec<_> = registry.all().map(|p| p.name()).collect();
/// assert_eq!(names, ["SILCleanup", "DCE"]);
/// ```
#[derive(Debug, Default)]
pub struct PassRegistry {
    passes: Vec<PassIdentity>,
    names: SaHashMap<String, usize>,
    frozen: bool,
}

assert_impl_all!(PassRegistry: Send, Sync);

impl PassRegistry {
    /// Creates an empty registry in the loading phase.
    pub fn new() -> Self {
        Self {
            passes: Vec::default(),
            names: SaHashMap::default(),
            frozen: false,
        }
    }

    /// Registers a single pass, returning its canonical identity.
    pub fn register(&mut self, name: &str, kind: PassKind) -> Result<PassIdentity, RegistryError> {
        if self.frozen {
            return Err(RegistryError::RegistryFrozen);
        }

        let identity = PassIdentity::new(name, kind)?;

        if self.names.contains_key(name) {
            return Err(RegistryError::DuplicateName {
                names: vec![name.to_owned()],
            });
        }

        tracing::trace!(pass = name, %kind, "registered pass");

        self.push(identity.clone());

        Ok(identity)
    }

    /// Registers every pass produced by `source` as a single batch.
    ///
    /// Either every pass is registered or none are. If any names collide,
    /// either with each other or with passes that are already registered,
    /// all of them are reported in [`RegistryError::DuplicateName`].
    ///
    /// Returns the number of passes that were registered.
    pub fn load<S: PassSource + ?Sized>(&mut self, source: &S) -> Result<usize, RegistryError> {
        if self.frozen {
            return Err(RegistryError::RegistryFrozen);
        }

        let entries = source.entries()?;
        let duplicates = self.duplicates_in(&entries);

        if !duplicates.is_empty() {
            tracing::warn!(count = duplicates.len(), "rejected pass batch with duplicate names");

            return Err(RegistryError::DuplicateName { names: duplicates });
        }

        let batch = entries
            .into_iter()
            .map(|(name, kind)| PassIdentity::new(&name, kind))
            .collect::<Result<Vec<_>, _>>()?;

        let count = batch.len();

        for pass in batch {
            self.push(pass);
        }

        tracing::debug!(count, total = self.passes.len(), "loaded pass batch");

        Ok(count)
    }

    /// Ends the loading phase. This is idempotent.
    pub fn freeze(&mut self) {
        if !self.frozen {
            self.frozen = true;

            tracing::info!(passes = self.passes.len(), "pass registry frozen");
        }
    }

    /// Whether or not [`Self::freeze`] has been called.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Finds the pass called `name`.
    ///
    /// Looking passes up while the registry is still loading is not allowed,
    /// the set of passes is not final yet. This returns [`RegistryError::NotFrozen`]
    /// in that case.
    pub fn lookup(&self, name: &str) -> Result<&PassIdentity, RegistryError> {
        if !self.frozen {
            return Err(RegistryError::NotFrozen);
        }

        match self.names.get(name) {
            Some(&index) => Ok(&self.passes[index]),
            None => Err(RegistryError::UnknownPass(name.to_owned())),
        }
    }

    /// Checks if a pass called `name` has been registered.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Every registered pass, in registration order.
    ///
    /// The iterator borrows the registry and can be restarted by calling
    /// this again (or cloning it).
    pub fn all(&self) -> slice::Iter<'_, PassIdentity> {
        self.passes.iter()
    }

    /// The number of registered passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Whether no passes have been registered.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    // names that collide with the registry or with an earlier entry in `batch`,
    // each listed once in order of first appearance
    fn duplicates_in(&self, batch: &[(String, PassKind)]) -> Vec<String> {
        let mut seen = SaHashSet::default();
        let mut reported = SaHashSet::default();
        let mut duplicates = Vec::default();

        for (name, _) in batch {
            let name = name.as_str();
            let collides = self.names.contains_key(name) || !seen.insert(name);

            if collides && reported.insert(name) {
                duplicates.push(name.to_owned());
            }
        }

        duplicates
    }

    fn push(&mut self, pass: PassIdentity) {
        self.names.insert(pass.name().to_owned(), self.passes.len());
        self.passes.push(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::InvalidPassName;
    use crate::registry::StaticSource;

    static BATCH: [(&str, PassKind); 4] = [
        ("SILCleanup", PassKind::Transform),
        ("DCE", PassKind::Transform),
        ("CSE", PassKind::Transform),
        ("InstCount", PassKind::Utility),
    ];

    fn names(registry: &PassRegistry) -> Vec<&str> {
        registry.all().map(|p| p.name()).collect()
    }

    #[test]
    fn load_preserves_order() {
        let mut registry = PassRegistry::new();

        assert_eq!(registry.load(&StaticSource::new(&BATCH)), Ok(4));

        registry.freeze();

        assert_eq!(names(&registry), ["SILCleanup", "DCE", "CSE", "InstCount"]);
        assert_eq!(
            registry.lookup("InstCount").map(|p| p.kind()),
            Ok(PassKind::Utility)
        );
    }

    #[test]
    fn all_is_restartable() {
        let mut registry = PassRegistry::new();
        registry.load(&StaticSource::new(&BATCH)).unwrap();
        registry.freeze();

        let iter = registry.all();
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), registry.len());
    }

    #[test]
    fn register_duplicate() {
        let mut registry = PassRegistry::new();

        registry.register("DCE", PassKind::Transform).unwrap();

        assert_eq!(
            registry.register("DCE", PassKind::Analysis),
            Err(RegistryError::DuplicateName {
                names: vec!["DCE".to_owned()]
            })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn batch_reports_every_duplicate() {
        static DUPES: [(&str, PassKind); 6] = [
            ("DCE", PassKind::Transform),
            ("SROA", PassKind::Transform),
            ("CSE", PassKind::Transform),
            ("SROA", PassKind::Transform),
            ("LICM", PassKind::Transform),
            ("SROA", PassKind::Transform),
        ];

        let mut registry = PassRegistry::new();
        registry.register("LICM", PassKind::Transform).unwrap();

        let err = registry.load(&StaticSource::new(&DUPES)).unwrap_err();

        assert_eq!(
            err,
            RegistryError::DuplicateName {
                names: vec!["SROA".to_owned(), "LICM".to_owned()]
            }
        );

        // the batch is all-or-nothing
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("DCE"));
    }

    #[test]
    fn duplicates_reported_before_bad_names() {
        static MIXED: [(&str, PassKind); 4] = [
            ("DCE", PassKind::Transform),
            ("DCE", PassKind::Transform),
            ("bad name", PassKind::Transform),
            ("CSE", PassKind::Transform),
        ];

        let mut registry = PassRegistry::new();

        assert_eq!(
            registry.load(&StaticSource::new(&MIXED)),
            Err(RegistryError::DuplicateName {
                names: vec!["DCE".to_owned()]
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn bad_name_in_batch_loads_nothing() {
        static BAD: [(&str, PassKind); 2] = [
            ("DCE", PassKind::Transform),
            ("bad name", PassKind::Transform),
        ];

        let mut registry = PassRegistry::new();

        assert_eq!(
            registry.load(&StaticSource::new(&BAD)),
            Err(RegistryError::InvalidName(InvalidPassName(
                "bad name".to_owned()
            )))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn freeze_is_idempotent() {
        let mut registry = PassRegistry::new();
        registry.load(&StaticSource::new(&BATCH)).unwrap();

        registry.freeze();
        registry.freeze();

        assert!(registry.is_frozen());
        assert_eq!(registry.len(), BATCH.len());
        assert!(registry.lookup(BATCH[0].0).is_ok());
        assert_eq!(
            registry.register("Late", PassKind::Transform),
            Err(RegistryError::RegistryFrozen)
        );
    }

    #[test]
    fn frozen_rejects_registration() {
        let mut registry = PassRegistry::new();
        registry.freeze();

        assert_eq!(
            registry.register("DCE", PassKind::Transform),
            Err(RegistryError::RegistryFrozen)
        );
        assert_eq!(
            registry.load(&StaticSource::new(&BATCH)),
            Err(RegistryError::RegistryFrozen)
        );
    }

    #[test]
    fn lookup_requires_freeze() {
        let mut registry = PassRegistry::new();
        registry.register("DCE", PassKind::Transform).unwrap();

        assert_eq!(registry.lookup("DCE"), Err(RegistryError::NotFrozen));
        assert_eq!(registry.lookup("Frobnicate"), Err(RegistryError::NotFrozen));

        registry.freeze();

        assert!(registry.lookup("DCE").is_ok());
        assert_eq!(
            registry.lookup("Frobnicate"),
            Err(RegistryError::UnknownPass("Frobnicate".to_owned()))
        );
    }

    #[test]
    fn invalid_name() {
        let mut registry = PassRegistry::new();

        assert_eq!(
            registry.register("Dead Code", PassKind::Transform),
            Err(RegistryError::InvalidName(InvalidPassName(
                "Dead Code".to_owned()
            )))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn shared_between_threads() {
        let mut registry = PassRegistry::new();
        registry.load(&StaticSource::new(&BATCH)).unwrap();
        registry.freeze();

        std::thread::scope(|s| {
            for (name, _) in BATCH.iter() {
                let registry = &registry;

                s.spawn(move || assert!(registry.lookup(name).is_ok()));
            }
        });
    }
}
