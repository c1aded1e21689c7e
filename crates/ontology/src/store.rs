//! Validated, immutable, index-based skill graph.
//!
//! [`Ontology::load`] consumes a [`TaxonomyDef`], validates it (referential
//! integrity, label uniqueness, prerequisite acyclicity) and builds adjacency
//! lists keyed by node index, so traversal never hashes strings. The store
//! never partially loads: any validation failure rejects the whole taxonomy.

use std::collections::HashMap;

use thiserror::Error;

use crate::taxonomy::TaxonomyDef;
use crate::types::{EdgeKind, SkillEdge, SkillNode};

/// Canonical form of a skill label: lowercased, trimmed, inner whitespace
/// collapsed to single spaces. Punctuation is preserved so labels like
/// "C++" and "C#" stay distinct.
#[must_use]
pub fn canonical_label(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors rejecting a taxonomy at load time.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum OntologyLoadError {
    /// Two skills declare the same id.
    #[error("Duplicate skill id '{id}'")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },

    /// A skill has an empty or whitespace-only id.
    #[error("Skill at position {position} has an empty id")]
    EmptyId {
        /// Zero-based position in the taxonomy's skill list.
        position: usize,
    },

    /// A skill has an empty display name.
    #[error("Skill '{id}' has an empty display name")]
    EmptyDisplayName {
        /// The offending skill.
        id: String,
    },

    /// A skill declares an empty synonym.
    #[error("Skill '{id}' declares an empty synonym")]
    EmptySynonym {
        /// The offending skill.
        id: String,
    },

    /// The same label (id, display name, or synonym, canonicalized) is bound
    /// to two different nodes.
    #[error("Label '{label}' is bound to both '{first}' and '{second}'")]
    DuplicateLabel {
        /// The ambiguous canonical label.
        label: String,
        /// Id of the node that bound the label first.
        first: String,
        /// Id of the node that bound it again.
        second: String,
    },

    /// An edge references a skill id that does not exist.
    #[error("Edge '{from}' -> '{to}' references unknown skill '{unknown}'")]
    DanglingEdge {
        /// Declared source id.
        from: String,
        /// Declared target id.
        to: String,
        /// Whichever endpoint is unknown.
        unknown: String,
    },

    /// An edge weight is negative, NaN, or infinite.
    #[error("Edge '{from}' -> '{to}' has invalid weight {weight} (must be finite and >= 0)")]
    InvalidWeight {
        /// Declared source id.
        from: String,
        /// Declared target id.
        to: String,
        /// The rejected weight.
        weight: f64,
    },

    /// Prerequisite edges form a cycle.
    #[error("Prerequisite cycle detected: {chain}")]
    PrerequisiteCycle {
        /// The cycle as a readable chain (e.g. "a -> b -> a").
        chain: String,
    },
}

// ============================================================================
// Label Index
// ============================================================================

/// Which field of a node a label entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// The node's stable id.
    Id,
    /// The node's display name.
    Display,
    /// One of the node's synonyms.
    Synonym,
}

#[derive(Debug, Clone, Copy)]
struct LabelEntry {
    node: usize,
    kind: LabelKind,
}

/// One entry of the ontology's label index.
#[derive(Debug, Clone, Copy)]
pub struct LabelRef<'a> {
    /// Canonical label text.
    pub label: &'a str,
    /// Where the label came from.
    pub kind: LabelKind,
    /// The node the label is bound to.
    pub node: &'a SkillNode,
}

/// One traversal step: the far endpoint of an edge plus its kind and weight.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    /// The node at the other end of the edge.
    pub node: &'a SkillNode,
    /// Relation kind.
    pub kind: EdgeKind,
    /// Edge weight.
    pub weight: f64,
}

// ============================================================================
// Ontology
// ============================================================================

/// Immutable skill graph: nodes, typed edges, label index, and adjacency.
///
/// Built once by [`Ontology::load`] and shared read-only afterwards; all
/// higher-level algorithms (normalization, gap analysis, path search) are
/// written against the lookup and traversal primitives here rather than
/// re-implementing graph storage.
#[derive(Debug)]
pub struct Ontology {
    /// Nodes in taxonomy file order.
    nodes: Vec<SkillNode>,
    /// Edges in taxonomy file order.
    edges: Vec<SkillEdge>,
    /// Exact id -> node index.
    id_index: HashMap<String, usize>,
    /// Canonical label -> node index, covering ids, display names, synonyms.
    labels: HashMap<String, LabelEntry>,
    /// Edge index -> (from, to) node indices, resolved at load.
    endpoints: Vec<(usize, usize)>,
    /// Node index -> indices of edges leaving it.
    outbound: Vec<Vec<usize>>,
    /// Node index -> indices of edges entering it.
    inbound: Vec<Vec<usize>>,
}

impl Ontology {
    /// Validate a taxonomy definition and build the graph.
    ///
    /// Fails with [`OntologyLoadError`] on malformed structure; never
    /// partially loads.
    pub fn load(def: TaxonomyDef) -> Result<Self, OntologyLoadError> {
        let TaxonomyDef { skills, edges } = def;

        let mut id_index: HashMap<String, usize> = HashMap::with_capacity(skills.len());
        let mut labels: HashMap<String, LabelEntry> = HashMap::new();

        for (idx, skill) in skills.iter().enumerate() {
            if skill.id.trim().is_empty() {
                return Err(OntologyLoadError::EmptyId { position: idx });
            }
            if skill.display_name.trim().is_empty() {
                return Err(OntologyLoadError::EmptyDisplayName {
                    id: skill.id.clone(),
                });
            }
            if id_index.insert(skill.id.clone(), idx).is_some() {
                return Err(OntologyLoadError::DuplicateId {
                    id: skill.id.clone(),
                });
            }

            bind_label(&mut labels, &skills, canonical_label(&skill.id), idx, LabelKind::Id)?;
            bind_label(
                &mut labels,
                &skills,
                canonical_label(&skill.display_name),
                idx,
                LabelKind::Display,
            )?;
            for synonym in &skill.synonyms {
                if synonym.trim().is_empty() {
                    return Err(OntologyLoadError::EmptySynonym {
                        id: skill.id.clone(),
                    });
                }
                bind_label(
                    &mut labels,
                    &skills,
                    canonical_label(synonym),
                    idx,
                    LabelKind::Synonym,
                )?;
            }
        }

        let mut endpoints: Vec<(usize, usize)> = Vec::with_capacity(edges.len());
        let mut outbound: Vec<Vec<usize>> = vec![Vec::new(); skills.len()];
        let mut inbound: Vec<Vec<usize>> = vec![Vec::new(); skills.len()];
        let mut prereq_out: Vec<Vec<usize>> = vec![Vec::new(); skills.len()];

        for (edge_idx, edge) in edges.iter().enumerate() {
            let from = *id_index.get(&edge.from_id).ok_or_else(|| {
                OntologyLoadError::DanglingEdge {
                    from: edge.from_id.clone(),
                    to: edge.to_id.clone(),
                    unknown: edge.from_id.clone(),
                }
            })?;
            let to = *id_index.get(&edge.to_id).ok_or_else(|| {
                OntologyLoadError::DanglingEdge {
                    from: edge.from_id.clone(),
                    to: edge.to_id.clone(),
                    unknown: edge.to_id.clone(),
                }
            })?;
            if !edge.weight.is_finite() || edge.weight < 0.0 {
                return Err(OntologyLoadError::InvalidWeight {
                    from: edge.from_id.clone(),
                    to: edge.to_id.clone(),
                    weight: edge.weight,
                });
            }

            endpoints.push((from, to));
            outbound[from].push(edge_idx);
            inbound[to].push(edge_idx);
            if edge.kind == EdgeKind::Prerequisite {
                prereq_out[from].push(to);
            }
        }

        check_prerequisite_cycles(&skills, &prereq_out)?;

        tracing::debug!(
            "Ontology loaded: {} skills, {} edges, {} labels",
            skills.len(),
            edges.len(),
            labels.len()
        );

        Ok(Self {
            nodes: skills,
            edges,
            id_index,
            labels,
            endpoints,
            outbound,
            inbound,
        })
    }

    /// Get a node by exact id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SkillNode> {
        self.id_index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Exact-match lookup against ids and display names, case-normalized and
    /// whitespace-trimmed. Synonyms are deliberately not covered here;
    /// resolution order across synonym and fuzzy stages belongs to the
    /// normalizer.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<&SkillNode> {
        match self.resolve_label(label) {
            Some((node, LabelKind::Id | LabelKind::Display)) => Some(node),
            _ => None,
        }
    }

    /// Exact-match lookup against synonym strings only.
    #[must_use]
    pub fn lookup_synonym(&self, label: &str) -> Option<&SkillNode> {
        match self.resolve_label(label) {
            Some((node, LabelKind::Synonym)) => Some(node),
            _ => None,
        }
    }

    /// Resolve a label of any kind, reporting which field matched.
    #[must_use]
    pub fn resolve_label(&self, label: &str) -> Option<(&SkillNode, LabelKind)> {
        let key = canonical_label(label);
        self.labels
            .get(&key)
            .map(|entry| (&self.nodes[entry.node], entry.kind))
    }

    /// Iterate over every canonical label in the index with its node.
    pub fn labels(&self) -> impl Iterator<Item = LabelRef<'_>> + '_ {
        self.labels.iter().map(|(label, entry)| LabelRef {
            label,
            kind: entry.kind,
            node: &self.nodes[entry.node],
        })
    }

    /// Nodes reachable from `node_id` over one outbound edge of `kind`.
    ///
    /// The sole traversal primitive (with [`Ontology::edges_from`] and
    /// [`Ontology::edges_into`] when weights matter). Unknown ids yield an
    /// empty list. Parallel edges are preserved, so a neighbor can repeat.
    #[must_use]
    pub fn neighbors(&self, node_id: &str, kind: EdgeKind) -> Vec<&SkillNode> {
        self.edges_from(node_id, kind)
            .into_iter()
            .map(|view| view.node)
            .collect()
    }

    /// Outbound edges of `kind` leaving `node_id`, with weights.
    #[must_use]
    pub fn edges_from(&self, node_id: &str, kind: EdgeKind) -> Vec<EdgeView<'_>> {
        self.edge_views(node_id, kind, &self.outbound, |(_, to)| to)
    }

    /// Inbound edges of `kind` entering `node_id`, with weights.
    ///
    /// For `is-prerequisite-of`, these lead to the node's direct
    /// prerequisites.
    #[must_use]
    pub fn edges_into(&self, node_id: &str, kind: EdgeKind) -> Vec<EdgeView<'_>> {
        self.edge_views(node_id, kind, &self.inbound, |(from, _)| from)
    }

    fn edge_views<'a>(
        &'a self,
        node_id: &str,
        kind: EdgeKind,
        adjacency: &[Vec<usize>],
        pick_far: impl Fn((usize, usize)) -> usize,
    ) -> Vec<EdgeView<'a>> {
        let Some(&idx) = self.id_index.get(node_id) else {
            return Vec::new();
        };
        adjacency[idx]
            .iter()
            .filter(|&&edge_idx| self.edges[edge_idx].kind == kind)
            .map(|&edge_idx| EdgeView {
                node: &self.nodes[pick_far(self.endpoints[edge_idx])],
                kind,
                weight: self.edges[edge_idx].weight,
            })
            .collect()
    }

    /// All nodes in taxonomy file order.
    #[must_use]
    pub fn nodes(&self) -> &[SkillNode] {
        &self.nodes
    }

    /// All edges in taxonomy file order.
    #[must_use]
    pub fn edges(&self) -> &[SkillEdge] {
        &self.edges
    }

    /// Number of skill nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the ontology holds no skills.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges of any kind.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

fn bind_label(
    labels: &mut HashMap<String, LabelEntry>,
    skills: &[SkillNode],
    key: String,
    idx: usize,
    kind: LabelKind,
) -> Result<(), OntologyLoadError> {
    if let Some(existing) = labels.get(&key) {
        if existing.node != idx {
            return Err(OntologyLoadError::DuplicateLabel {
                label: key,
                first: skills[existing.node].id.clone(),
                second: skills[idx].id.clone(),
            });
        }
        // Same node restating its own label (e.g. a synonym repeating the
        // display name): first binding wins, no error.
        return Ok(());
    }
    labels.insert(key, LabelEntry { node: idx, kind });
    Ok(())
}

// ============================================================================
// Prerequisite Cycle Check
// ============================================================================

/// DFS over prerequisite edges only. Start nodes are visited in sorted-id
/// order so the reported chain is reproducible for a given taxonomy.
fn check_prerequisite_cycles(
    nodes: &[SkillNode],
    prereq_out: &[Vec<usize>],
) -> Result<(), OntologyLoadError> {
    let mut visited = vec![false; nodes.len()];
    let mut in_stack = vec![false; nodes.len()];
    let mut stack_path: Vec<usize> = Vec::new();

    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| nodes[a].id.cmp(&nodes[b].id));

    for start in order {
        if !visited[start] {
            visit_prereq(
                start,
                nodes,
                prereq_out,
                &mut visited,
                &mut in_stack,
                &mut stack_path,
            )?;
        }
    }
    Ok(())
}

fn visit_prereq(
    idx: usize,
    nodes: &[SkillNode],
    prereq_out: &[Vec<usize>],
    visited: &mut [bool],
    in_stack: &mut [bool],
    stack_path: &mut Vec<usize>,
) -> Result<(), OntologyLoadError> {
    if in_stack[idx] {
        let cycle_start = stack_path.iter().position(|&i| i == idx).unwrap_or(0);
        let chain: Vec<_> = stack_path[cycle_start..]
            .iter()
            .chain(std::iter::once(&idx))
            .map(|&i| nodes[i].id.as_str())
            .collect();
        return Err(OntologyLoadError::PrerequisiteCycle {
            chain: chain.join(" -> "),
        });
    }
    if visited[idx] {
        return Ok(());
    }

    in_stack[idx] = true;
    stack_path.push(idx);

    for &target in &prereq_out[idx] {
        visit_prereq(target, nodes, prereq_out, visited, in_stack, stack_path)?;
    }

    in_stack[idx] = false;
    stack_path.pop();
    visited[idx] = true;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
