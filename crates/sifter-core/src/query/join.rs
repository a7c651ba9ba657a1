//! Join planning: build or reuse inner joins for association paths.

use crate::{
    obs::{CompileEvent, CompileSink},
    query::path::AssociationStep,
};
use derive_more::Display;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// JoinId
/// Index of a join within one specification.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[display("j{_0}")]
pub struct JoinId(pub usize);

///
/// JoinKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum JoinKind {
    #[display("INNER")]
    Inner,
}

///
/// JoinSource
/// Where a column or child join hangs: the query root or a join.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum JoinSource {
    #[default]
    Root,
    Join(JoinId),
}

///
/// JoinNode
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct JoinNode {
    pub id: JoinId,
    pub owning_type: String,
    pub association: String,
    pub target: String,
    pub kind: JoinKind,
    pub parent: JoinSource,
    /// Dotted path from the root (`department.manager`).
    pub path: String,
}

///
/// JoinKey
///

type JoinKey = (String, String, JoinKind);

///
/// JoinSet
///
/// Joins materialized by one compilation. Local to a single compile call;
/// never shared.
///

#[derive(Debug, Default)]
pub struct JoinSet {
    nodes: Vec<JoinNode>,
    index: BTreeMap<JoinKey, JoinId>,
}

impl JoinSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Walk `steps` in order, reusing the join registered for each
    /// `(owner, association, INNER)` key or creating it under the current
    /// source. Returns the source the terminal column hangs from.
    pub fn plan(&mut self, steps: &[AssociationStep], sink: &dyn CompileSink) -> JoinSource {
        let mut source = JoinSource::Root;

        for step in steps {
            let key = (step.owner.clone(), step.association.clone(), JoinKind::Inner);

            if let Some(id) = self.index.get(&key).copied() {
                sink.record(CompileEvent::JoinReused {
                    owner: &step.owner,
                    association: &step.association,
                });
                source = JoinSource::Join(id);
                continue;
            }

            let id = JoinId(self.nodes.len());
            let path = match self.path_of(source) {
                Some(parent) => format!("{parent}.{}", step.association),
                None => step.association.clone(),
            };
            sink.record(CompileEvent::JoinCreated {
                owner: &step.owner,
                association: &step.association,
                path: &path,
            });

            self.nodes.push(JoinNode {
                id,
                owning_type: step.owner.clone(),
                association: step.association.clone(),
                target: step.target.clone(),
                kind: JoinKind::Inner,
                parent: source,
                path,
            });
            self.index.insert(key, id);
            source = JoinSource::Join(id);
        }

        source
    }

    /// Dotted path of a join, or `None` for the root.
    #[must_use]
    pub fn path_of(&self, source: JoinSource) -> Option<&str> {
        match source {
            JoinSource::Root => None,
            JoinSource::Join(id) => self.nodes.get(id.0).map(|node| node.path.as_str()),
        }
    }

    #[must_use]
    pub fn get(&self, id: JoinId) -> Option<&JoinNode> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JoinNode> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn into_nodes(self) -> Vec<JoinNode> {
        self.nodes
    }
}
