// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hand-rolled composition root.
//!
//! A registry of contract-name -> instance lists satisfying the
//! [`CompositionRoot`] seam. Built once during initialize (single writer),
//! then safe for concurrent resolve access; export/release serialize behind
//! the write lock so no caller observes a partial mutation.

use std::collections::HashMap;
use std::sync::RwLock;

use ignition_core::traits::composition::{CompositionRoot, ExportToken, ImportSink};
use ignition_core::{ComponentInstance, IgnitionError};
use tracing::debug;

/// One exported instance and the token that revokes it.
struct Slot {
    token: ExportToken,
    instance: ComponentInstance,
}

#[derive(Default)]
struct GraphInner {
    exports: HashMap<String, Vec<Slot>>,
    next_token: u64,
}

/// The default, in-process composition root.
#[derive(Default)]
pub struct ComponentGraph {
    inner: RwLock<GraphInner>,
}

impl ComponentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contracts with at least one live export.
    pub fn contract_count(&self) -> usize {
        self.inner
            .read()
            .map(|inner| inner.exports.values().filter(|v| !v.is_empty()).count())
            .unwrap_or(0)
    }

    /// Drops every export. Used by the bootstrapper's dispose path.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.exports.clear();
        }
    }

    fn check_contract(contract: &str) -> Result<(), IgnitionError> {
        if contract.trim().is_empty() {
            return Err(IgnitionError::InvalidArgument(
                "contract name must not be empty".into(),
            ));
        }
        Ok(())
    }

    fn read_locked(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, GraphInner>, IgnitionError> {
        self.inner
            .read()
            .map_err(|_| IgnitionError::Internal("component graph lock poisoned".into()))
    }

    fn write_locked(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, GraphInner>, IgnitionError> {
        self.inner
            .write()
            .map_err(|_| IgnitionError::Internal("component graph lock poisoned".into()))
    }
}

impl CompositionRoot for ComponentGraph {
    fn export(
        &self,
        contract: &str,
        instance: ComponentInstance,
    ) -> Result<ExportToken, IgnitionError> {
        Self::check_contract(contract)?;
        let mut inner = self.write_locked()?;
        let token = ExportToken(inner.next_token);
        inner.next_token += 1;
        inner
            .exports
            .entry(contract.to_string())
            .or_default()
            .push(Slot { token, instance });
        debug!(contract, token = token.0, "instance exported");
        Ok(token)
    }

    fn get_export(&self, contract: &str) -> Result<Option<ComponentInstance>, IgnitionError> {
        Self::check_contract(contract)?;
        let inner = self.read_locked()?;
        Ok(inner
            .exports
            .get(contract)
            .and_then(|slots| slots.first())
            .map(|slot| slot.instance.clone()))
    }

    fn get_exports(&self, contract: &str) -> Result<Vec<ComponentInstance>, IgnitionError> {
        Self::check_contract(contract)?;
        let inner = self.read_locked()?;
        Ok(inner
            .exports
            .get(contract)
            .map(|slots| slots.iter().map(|s| s.instance.clone()).collect())
            .unwrap_or_default())
    }

    fn release(&self, token: ExportToken) -> Result<(), IgnitionError> {
        let mut inner = self.write_locked()?;
        for slots in inner.exports.values_mut() {
            if let Some(pos) = slots.iter().position(|s| s.token == token) {
                slots.remove(pos);
                debug!(token = token.0, "export released");
                return Ok(());
            }
        }
        // Already released. Revocation is idempotent.
        Ok(())
    }

    fn fill_imports(&self, sink: &mut dyn ImportSink) -> Result<(), IgnitionError> {
        let wanted = sink.imports();
        for contract in wanted {
            let instances = self.get_exports(&contract)?;
            sink.accept(&contract, instances);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn export_resolve_release_cycle() {
        let graph = ComponentGraph::new();
        let token = graph.export("svc.clock", Arc::new(42u32)).unwrap();

        let resolved = graph.get_export("svc.clock").unwrap().unwrap();
        assert_eq!(*resolved.downcast::<u32>().unwrap(), 42);

        graph.release(token).unwrap();
        assert!(graph.get_export("svc.clock").unwrap().is_none());
    }

    #[test]
    fn release_is_idempotent() {
        let graph = ComponentGraph::new();
        let token = graph.export("svc.a", Arc::new(1u8)).unwrap();
        graph.release(token).unwrap();
        graph.release(token).unwrap();
    }

    #[test]
    fn release_removes_only_the_tokened_instance() {
        let graph = ComponentGraph::new();
        let first = graph.export("svc.multi", Arc::new(1u8)).unwrap();
        let _second = graph.export("svc.multi", Arc::new(2u8)).unwrap();

        graph.release(first).unwrap();
        let remaining = graph.get_exports("svc.multi").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(*remaining[0].clone().downcast::<u8>().unwrap(), 2);
    }

    #[test]
    fn empty_contract_is_an_argument_error() {
        let graph = ComponentGraph::new();
        assert!(matches!(
            graph.export("", Arc::new(0u8)),
            Err(IgnitionError::InvalidArgument(_))
        ));
        assert!(matches!(
            graph.get_export("  "),
            Err(IgnitionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn fill_imports_hands_over_all_instances() {
        struct Sink {
            received: Vec<(String, usize)>,
        }
        impl ImportSink for Sink {
            fn imports(&self) -> Vec<String> {
                vec!["svc.a".into(), "svc.missing".into()]
            }
            fn accept(&mut self, contract: &str, instances: Vec<ComponentInstance>) {
                self.received.push((contract.to_string(), instances.len()));
            }
        }

        let graph = ComponentGraph::new();
        graph.export("svc.a", Arc::new(1u8)).unwrap();
        graph.export("svc.a", Arc::new(2u8)).unwrap();

        let mut sink = Sink { received: vec![] };
        graph.fill_imports(&mut sink).unwrap();
        assert_eq!(
            sink.received,
            [("svc.a".to_string(), 2), ("svc.missing".to_string(), 0)]
        );
    }

    #[test]
    fn concurrent_resolves_do_not_block_each_other() {
        let graph = Arc::new(ComponentGraph::new());
        graph.export("svc.shared", Arc::new(7u64)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let graph = graph.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(graph.get_export("svc.shared").unwrap().is_some());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }
}
