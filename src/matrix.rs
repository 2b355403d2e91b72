//! Travel-time matrix keyed by ordered location pair.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{LocationId, TravelEdge};

/// Directed travel data for one day. A missing pair is unreachable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TravelEdge>", into = "Vec<TravelEdge>")]
pub struct TravelMatrix {
    edges: HashMap<(LocationId, LocationId), TravelEdge>,
}

impl TravelMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an edge, replacing any previous edge for the same pair.
    pub fn insert(&mut self, edge: TravelEdge) {
        self.edges.insert((edge.from.clone(), edge.to.clone()), edge);
    }

    pub fn with_edge(mut self, edge: TravelEdge) -> Self {
        self.insert(edge);
        self
    }

    pub fn edge(&self, from: &LocationId, to: &LocationId) -> Option<&TravelEdge> {
        // Tuple keys can't be borrowed as a tuple of references.
        self.edges.get(&(from.clone(), to.clone()))
    }

    /// Base duration for a pair, `None` when unreachable.
    pub fn duration(&self, from: &LocationId, to: &LocationId) -> Option<i64> {
        self.edge(from, to).map(|edge| edge.duration_secs)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> impl Iterator<Item = &TravelEdge> {
        self.edges.values()
    }
}

impl FromIterator<TravelEdge> for TravelMatrix {
    fn from_iter<I: IntoIterator<Item = TravelEdge>>(iter: I) -> Self {
        let mut matrix = Self::new();
        for edge in iter {
            matrix.insert(edge);
        }
        matrix
    }
}

impl From<Vec<TravelEdge>> for TravelMatrix {
    fn from(edges: Vec<TravelEdge>) -> Self {
        edges.into_iter().collect()
    }
}

impl From<TravelMatrix> for Vec<TravelEdge> {
    fn from(matrix: TravelMatrix) -> Self {
        let mut edges: Vec<TravelEdge> = matrix.edges.into_values().collect();
        edges.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));
        edges
    }
}
