use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::DomainResult;
use crate::domain::tree::validate_basis;
use crate::domain::vector::{mediant, Vector};

/// A vector in the mediant tree together with where it came from.
#[derive(Debug, Clone)]
pub struct MediantNode {
    pub vector: Vector,
    /// Generation that inserted this node, 0 for basis elements
    pub generation: usize,
    /// The adjacent pair whose mediant this is, None for basis elements
    pub neighbours: Option<(Index, Index)>,
    /// The newer of the two neighbours, None for basis elements and roots
    pub parent: Option<Index>,
    /// Left child first, then right child
    pub children: Vec<Index>,
}

/// Arena-backed mediant tree.
///
/// Every vector is stored once; a level is an ordered list of indices into the
/// arena, so level `g` is built from level `g - 1` without copying vectors.
#[derive(Debug)]
pub struct MediantArena {
    arena: Arena<MediantNode>,
    roots: Vec<Index>,
    levels: Vec<Vec<Index>>,
}

impl MediantArena {
    /// Builds levels `0..=generations` from `basis`.
    #[instrument(level = "debug", skip(basis), fields(basis_len = basis.len()))]
    pub fn grow(basis: &[Vector], generations: usize, dimensions: usize) -> DomainResult<Self> {
        validate_basis(basis, dimensions)?;
        let mut tree = Self {
            arena: Arena::new(),
            roots: Vec::new(),
            levels: Vec::with_capacity(generations + 1),
        };
        let level_zero: Vec<Index> = basis
            .iter()
            .map(|vector| {
                tree.arena.insert(MediantNode {
                    vector: vector.clone(),
                    generation: 0,
                    neighbours: None,
                    parent: None,
                    children: Vec::new(),
                })
            })
            .collect();
        tree.levels.push(level_zero);

        for generation in 1..=generations {
            let next = tree.refine(generation)?;
            tree.levels.push(next);
        }
        Ok(tree)
    }

    #[instrument(level = "trace", skip(self))]
    fn refine(&mut self, generation: usize) -> DomainResult<Vec<Index>> {
        let previous = self.levels[generation - 1].clone();
        let mut next = Vec::with_capacity(previous.len() * 2 - 1);
        for pair in previous.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            let inserted = self.insert_mediant(left, right, generation)?;
            next.push(left);
            next.push(inserted);
        }
        if let Some(&last) = previous.last() {
            next.push(last);
        }
        Ok(next)
    }

    fn insert_mediant(&mut self, left: Index, right: Index, generation: usize) -> DomainResult<Index> {
        let (left_node, right_node) = (&self.arena[left], &self.arena[right]);
        let vector = mediant(&left_node.vector, &right_node.vector)?;
        let parent = match left_node.generation.cmp(&right_node.generation) {
            std::cmp::Ordering::Greater => Some(left),
            std::cmp::Ordering::Less => Some(right),
            std::cmp::Ordering::Equal => None,
        };
        let idx = self.arena.insert(MediantNode {
            vector,
            generation,
            neighbours: Some((left, right)),
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent_idx) => self.arena[parent_idx].children.push(idx),
            None => self.roots.push(idx),
        }
        Ok(idx)
    }

    pub fn get(&self, idx: Index) -> Option<&MediantNode> {
        self.arena.get(idx)
    }

    /// Nodes inserted from an adjacent pair of basis elements.
    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn generations(&self) -> usize {
        self.levels.len() - 1
    }

    /// Number of distinct nodes stored.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Vectors of level `generation`, in order.
    pub fn level(&self, generation: usize) -> Option<Vec<Vector>> {
        self.levels
            .get(generation)
            .map(|indices| indices.iter().map(|&i| self.arena[i].vector.clone()).collect())
    }

    pub fn last_level(&self) -> Vec<Vector> {
        self.level(self.generations()).unwrap_or_default()
    }

    /// Pre-order walk over all roots, left subtree before right subtree.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    /// Longest root-to-leaf path counted in nodes, 0 without mediants.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(Index, usize)> = self.roots.iter().map(|&r| (r, 1)).collect();
        while let Some((idx, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Some(node) = self.get(idx) {
                stack.extend(node.children.iter().map(|&c| (c, depth + 1)));
            }
        }
        deepest
    }

    /// Mediants without children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<&Vector> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| &node.vector)
            .collect()
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a MediantArena,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a MediantArena) -> Self {
        let stack = tree.roots.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a MediantNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.tree.get(current)?;
        // reversed so the left child is visited first
        self.stack.extend(node.children.iter().rev().copied());
        Some((current, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::{generate, simplex_basis, stern_brocot_basis};
    use rstest::rstest;

    #[rstest]
    fn test_single_root_for_classic_basis() {
        let tree = MediantArena::grow(&stern_brocot_basis(), 3, 2).unwrap();
        assert_eq!(tree.roots().len(), 1);
        let root = tree.get(tree.roots()[0]).unwrap();
        assert_eq!(root.vector, Vector::from((1, 1)));
        assert!(root.parent.is_none());
    }

    #[rstest]
    fn test_children_are_left_then_right() {
        let tree = MediantArena::grow(&stern_brocot_basis(), 2, 2).unwrap();
        let root = tree.get(tree.roots()[0]).unwrap();
        let children: Vec<_> = root
            .children
            .iter()
            .map(|&c| tree.get(c).unwrap().vector.clone())
            .collect();
        assert_eq!(children, vec![Vector::from((1, 2)), Vector::from((2, 1))]);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(4)]
    fn test_depth_equals_generations(#[case] g: usize) {
        let tree = MediantArena::grow(&stern_brocot_basis(), g, 2).unwrap();
        assert_eq!(tree.depth(), g);
        assert_eq!(tree.generations(), g);
    }

    #[rstest]
    fn test_each_vector_stored_once() {
        let g = 6;
        let tree = MediantArena::grow(&stern_brocot_basis(), g, 2).unwrap();
        // 2 basis vectors + 2^g - 1 mediants
        assert_eq!(tree.len(), 2 + (1 << g) - 1);
        assert_eq!(tree.leaves().len(), 1 << (g - 1));
    }

    #[rstest]
    fn test_preorder_visits_all_mediants() {
        let tree = MediantArena::grow(&stern_brocot_basis(), 3, 2).unwrap();
        let visited: Vec<String> = tree.iter().map(|(_, n)| n.vector.to_string()).collect();
        assert_eq!(
            visited,
            vec!["(1, 1)", "(1, 2)", "(1, 3)", "(2, 3)", "(2, 1)", "(3, 2)", "(3, 1)"]
        );
    }

    #[rstest]
    fn test_simplex_basis_has_one_root_per_gap() {
        let tree = MediantArena::grow(&simplex_basis(4).unwrap(), 2, 4).unwrap();
        assert_eq!(tree.roots().len(), 3);
        assert_eq!(tree.last_level(), generate(&simplex_basis(4).unwrap(), 2, 4).unwrap());
    }
}
