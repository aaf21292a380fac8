//! Tree view over the parser's flat section list.
//!
//! A section is a child of the nearest preceding section with a smaller depth.
//! [`OutlineTree::build`] walks the list once with a depth stack and records
//! parent and child indices; the sections themselves stay where they are.
//! The preamble never has a parent or children.

use crate::ast::SectionNode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineTree {
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl OutlineTree {
    pub fn build(sections: &[SectionNode]) -> Self {
        let mut tree = Self {
            parents: vec![None; sections.len()],
            children: vec![Vec::new(); sections.len()],
            roots: Vec::new(),
        };
        let mut stack: Vec<(usize, u32)> = Vec::new();

        for (index, section) in sections.iter().enumerate() {
            if section.is_preamble() {
                tree.roots.push(index);
                continue;
            }
            while stack.last().is_some_and(|&(_, depth)| depth >= section.depth) {
                stack.pop();
            }
            match stack.last() {
                Some(&(parent, _)) => {
                    tree.parents[index] = Some(parent);
                    tree.children[parent].push(index);
                }
                None => tree.roots.push(index),
            }
            stack.push((index, section.depth));
        }
        tree
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    pub fn children(&self, index: usize) -> &[usize] {
        self.children.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sections without a parent, in document order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Number of ancestors of `index`.
    pub fn level(&self, index: usize) -> usize {
        let mut level = 0;
        let mut current = self.parent(index);
        while let Some(parent) = current {
            level += 1;
            current = self.parent(parent);
        }
        level
    }

    /// Pre-order walk calling `visit(index, level)`.
    pub fn walk(&self, mut visit: impl FnMut(usize, usize)) {
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&i| (i, 0)).collect();
        while let Some((index, level)) = stack.pop() {
            visit(index, level);
            stack.extend(self.children(index).iter().rev().map(|&child| (child, level + 1)));
        }
    }
}
