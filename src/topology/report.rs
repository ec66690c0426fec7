// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Report
//!
//! Per-declaration lifecycle of one provisioning run, in creation order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::ResourceKind;
use crate::graph::{ResourceId, ResourceNode};
use crate::provider::ResourceHandle;
use crate::state_machine::{
    DeclarationInput, DeclarationStatus, StateMachineWithHistory, TransitionResult,
};

/// Outcome of one planned declaration
#[derive(Debug, Clone, Serialize)]
pub struct DeclarationRecord {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub handle: Option<ResourceHandle>,
    pub error: Option<String>,
    lifecycle: StateMachineWithHistory<DeclarationStatus>,
}

impl DeclarationRecord {
    pub fn status(&self) -> DeclarationStatus {
        *self.lifecycle.current_state()
    }

    pub fn lifecycle(&self) -> &StateMachineWithHistory<DeclarationStatus> {
        &self.lifecycle
    }
}

/// Report of one provisioning run
#[derive(Debug, Clone, Serialize)]
pub struct ProvisioningReport {
    pub correlation_id: Uuid,
    pub deployment: String,
    pub provider: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    records: Vec<DeclarationRecord>,
}

impl ProvisioningReport {
    /// One `Planned` record per node, in the order given
    pub(crate) fn new(
        correlation_id: Uuid,
        deployment: impl Into<String>,
        provider: impl Into<String>,
        order: &[&ResourceNode],
        started_at: DateTime<Utc>,
    ) -> Self {
        let records = order
            .iter()
            .map(|node| DeclarationRecord {
                id: node.id.clone(),
                kind: node.kind(),
                handle: None,
                error: None,
                lifecycle: StateMachineWithHistory::new(DeclarationStatus::Planned),
            })
            .collect();

        Self {
            correlation_id,
            deployment: deployment.into(),
            provider: provider.into(),
            started_at,
            finished_at: None,
            records,
        }
    }

    pub(crate) fn begin(&mut self, position: usize, at: DateTime<Utc>) -> TransitionResult<()> {
        self.records[position]
            .lifecycle
            .transition_with_history(DeclarationInput::Begin, at)
    }

    pub(crate) fn succeed(
        &mut self,
        position: usize,
        handle: ResourceHandle,
        at: DateTime<Utc>,
    ) -> TransitionResult<()> {
        let record = &mut self.records[position];
        record
            .lifecycle
            .transition_with_history(DeclarationInput::Succeed, at)?;
        record.handle = Some(handle);
        Ok(())
    }

    pub(crate) fn fail(
        &mut self,
        position: usize,
        error: String,
        at: DateTime<Utc>,
    ) -> TransitionResult<()> {
        let record = &mut self.records[position];
        record
            .lifecycle
            .transition_with_history(DeclarationInput::Fail, at)?;
        record.error = Some(error);
        Ok(())
    }

    /// Mark every still-planned record as skipped; returns how many were
    pub(crate) fn skip_pending(&mut self, at: DateTime<Utc>) -> TransitionResult<usize> {
        let mut skipped = 0;
        for record in &mut self.records {
            if record.status() == DeclarationStatus::Planned {
                record
                    .lifecycle
                    .transition_with_history(DeclarationInput::Skip, at)?;
                skipped += 1;
            }
        }
        Ok(skipped)
    }

    pub(crate) fn finish(&mut self, at: DateTime<Utc>) {
        self.finished_at = Some(at);
    }

    /// Records in creation order
    pub fn records(&self) -> &[DeclarationRecord] {
        &self.records
    }

    pub fn record(&self, id: &ResourceId) -> Option<&DeclarationRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Number of records in `status`
    pub fn count(&self, status: DeclarationStatus) -> usize {
        self.records.iter().filter(|r| r.status() == status).count()
    }

    /// The declaration that aborted the run, if any
    pub fn failure(&self) -> Option<&DeclarationRecord> {
        self.records
            .iter()
            .find(|r| r.status() == DeclarationStatus::Failed)
    }

    /// True when every planned resource was declared
    pub fn is_complete(&self) -> bool {
        self.records
            .iter()
            .all(|r| r.status() == DeclarationStatus::Declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tags;
    use crate::graph::ResourceSpec;

    fn node(name: &str) -> ResourceNode {
        ResourceNode {
            id: ResourceId::new(name),
            spec: ResourceSpec::ElasticAddress {
                availability_zone: "us-east-1a".into(),
                tags: Tags::named(name),
            },
            depends_on: Vec::new(),
        }
    }

    #[test]
    fn test_failure_skips_the_rest() {
        let nodes = [node("a"), node("b"), node("c")];
        let order: Vec<&ResourceNode> = nodes.iter().collect();
        let mut report =
            ProvisioningReport::new(Uuid::now_v7(), "demo", "memory", &order, Utc::now());

        report.begin(0, Utc::now()).unwrap();
        report
            .succeed(
                0,
                ResourceHandle::new(ResourceKind::ElasticAddress, "eipalloc-00000001"),
                Utc::now(),
            )
            .unwrap();
        report.begin(1, Utc::now()).unwrap();
        report.fail(1, "quota".into(), Utc::now()).unwrap();

        assert_eq!(report.skip_pending(Utc::now()).unwrap(), 1);
        assert_eq!(report.count(DeclarationStatus::Declared), 1);
        assert_eq!(report.count(DeclarationStatus::Skipped), 1);
        assert_eq!(report.failure().map(|r| r.id.as_str()), Some("b"));
        assert_eq!(report.failure().and_then(|r| r.error.as_deref()), Some("quota"));
        assert!(!report.is_complete());

        let history = report.record(&"b".into()).unwrap().lifecycle().history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].to, DeclarationStatus::Failed);
    }

    #[test]
    fn test_succeed_requires_begin() {
        let nodes = [node("a")];
        let order: Vec<&ResourceNode> = nodes.iter().collect();
        let mut report =
            ProvisioningReport::new(Uuid::now_v7(), "demo", "memory", &order, Utc::now());

        let handle = ResourceHandle::new(ResourceKind::ElasticAddress, "eipalloc-00000001");
        assert!(report.succeed(0, handle, Utc::now()).is_err());
        assert!(report.records()[0].handle.is_none());
    }
}
