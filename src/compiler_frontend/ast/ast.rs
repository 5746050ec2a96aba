use crate::compiler_frontend::ast::ast_nodes::{Node, NodeId, NodeKind};
use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorLocation};
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::projects::settings::TOKEN_TO_NODE_RATIO;
use crate::return_compiler_error;

/// Arena backed syntax tree.
///
/// Nodes are never freed. Detaching a node leaves it in the arena as an orphan
/// so ids handed out to callers stay valid for the lifetime of the tree.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
    pub root: NodeId,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    /// Creates a tree holding an empty script root
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(token_count: usize) -> Self {
        let mut ast = Ast {
            nodes: Vec::with_capacity(token_count / TOKEN_TO_NODE_RATIO + 1),
            root: NodeId(0),
        };
        ast.root = ast.new_node(NodeKind::Script, TextLocation::default());
        ast
    }

    // ============================================================
    // Creation
    // ============================================================
    pub fn new_node(&mut self, kind: NodeKind, location: TextLocation) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            location,
            is_constant_name: false,
        });
        id
    }

    /// Creates a node and adopts the (detached) children in order
    pub fn new_node_with_children(
        &mut self,
        kind: NodeKind,
        location: TextLocation,
        children: &[NodeId],
    ) -> NodeId {
        let id = self.new_node(kind, location);
        for child in children {
            self.add_child_to_back(id, *child);
        }
        id
    }

    pub fn new_name(&mut self, name: &str, location: TextLocation) -> NodeId {
        self.new_node(NodeKind::Name(name.to_owned()), location)
    }

    // ============================================================
    // Queries
    // ============================================================
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[inline]
    pub fn location(&self, id: NodeId) -> TextLocation {
        self.nodes[id.index()].location
    }

    pub fn error_location(&self, id: NodeId) -> ErrorLocation {
        ErrorLocation::from(self.location(id))
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == child)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.child_index(parent, id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Iterates the parent, grandparent, ... of a node up to the tree root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            current: self.parent(id),
        }
    }

    pub fn is_statement_block(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Script | NodeKind::Block)
    }

    pub fn is_get(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::GetProp(_) | NodeKind::GetElem)
    }

    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_constant_name(&self, id: NodeId) -> bool {
        self.nodes[id.index()].is_constant_name
    }

    pub fn set_constant_name(&mut self, id: NodeId, is_constant: bool) {
        self.nodes[id.index()].is_constant_name = is_constant;
    }

    /// Total number of nodes ever created, including orphans
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_children(self.root)
    }

    /// Node ids in pre-order (parents before children, children left to right)
    pub fn preorder(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![from];

        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }

        order
    }

    /// Whether `node` is `ancestor` or sits somewhere below it
    pub fn is_descendant_or_self(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    // ============================================================
    // Mutation
    // ============================================================
    pub fn add_child_to_back(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.parent(child).is_none(),
            "{child} is already owned by another parent"
        );
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        self.debug_assert_tree_invariants(parent);
    }

    pub fn add_child_to_front(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.parent(child).is_none(),
            "{child} is already owned by another parent"
        );
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.insert(0, child);
        self.debug_assert_tree_invariants(parent);
    }

    /// Inserts a detached node as the sibling immediately before `existing`
    pub fn add_child_before(
        &mut self,
        new_child: NodeId,
        existing: NodeId,
    ) -> Result<(), CompilerError> {
        let (parent, index) = self.parent_and_index(existing)?;
        self.insert_child_at(parent, index, new_child);
        Ok(())
    }

    /// Inserts a detached node as the sibling immediately after `existing`
    pub fn add_child_after(
        &mut self,
        new_child: NodeId,
        existing: NodeId,
    ) -> Result<(), CompilerError> {
        let (parent, index) = self.parent_and_index(existing)?;
        self.insert_child_at(parent, index + 1, new_child);
        Ok(())
    }

    /// Puts a detached node in the place of `old`, leaving `old` detached
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> Result<(), CompilerError> {
        debug_assert!(
            self.parent(new).is_none(),
            "{new} is already owned by another parent"
        );
        let (parent, index) = self.parent_and_index(old)?;
        self.nodes[parent.index()].children[index] = new;
        self.nodes[new.index()].parent = Some(parent);
        self.nodes[old.index()].parent = None;
        self.debug_assert_tree_invariants(parent);
        Ok(())
    }

    /// Removes a node (and its subtree) from its parent
    pub fn detach(&mut self, id: NodeId) -> Result<NodeId, CompilerError> {
        let (parent, index) = self.parent_and_index(id)?;
        self.nodes[parent.index()].children.remove(index);
        self.nodes[id.index()].parent = None;
        self.debug_assert_tree_invariants(parent);
        Ok(id)
    }

    /// Removes and returns all children of a node, in order
    pub fn detach_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = std::mem::take(&mut self.nodes[id.index()].children);
        for child in &children {
            self.nodes[child.index()].parent = None;
        }
        self.debug_assert_tree_invariants(id);
        children
    }

    /// Deep copies a subtree. The copy is detached.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let source = self.node(id).clone();
        let copy = self.new_node(source.kind, source.location);
        self.nodes[copy.index()].is_constant_name = source.is_constant_name;

        for child in source.children {
            let child_copy = self.clone_subtree(child);
            self.add_child_to_back(copy, child_copy);
        }

        copy
    }

    fn insert_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        debug_assert!(
            self.parent(child).is_none(),
            "{child} is already owned by another parent"
        );
        self.nodes[parent.index()].children.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);
        self.debug_assert_tree_invariants(parent);
    }

    fn parent_and_index(&self, id: NodeId) -> Result<(NodeId, usize), CompilerError> {
        let Some(parent) = self.parent(id) else {
            return_compiler_error!(self.error_location(id) => "{} ({}) has no parent", id, self.kind(id).describe(); {
                ViolatedInvariant => "mutated node must be attached to the tree",
            });
        };

        match self.child_index(parent, id) {
            Some(index) => Ok((parent, index)),
            None => {
                return_compiler_error!(self.error_location(id) => "{} is not listed under its parent {}", id, parent; {
                    ViolatedInvariant => "parent back-reference must agree with the parent's children",
                })
            }
        }
    }

    // ============================================================
    // Invariants
    // ============================================================
    /// Checks that every child listed under a node points back at it,
    /// and that no node is listed under two parents.
    pub fn check_tree_invariants(&self) -> Result<(), CompilerError> {
        let mut seen = vec![false; self.nodes.len()];

        for id in self.preorder(self.root) {
            if seen[id.index()] {
                return_compiler_error!(self.error_location(id) => "{} is reachable through two parents", id; {
                    ViolatedInvariant => "single ownership",
                });
            }
            seen[id.index()] = true;

            for child in self.children(id) {
                if self.parent(*child) != Some(id) {
                    return_compiler_error!(self.error_location(*child) => "{} does not point back at its parent {}", child, id; {
                        ViolatedInvariant => "parent back-reference",
                    });
                }
            }
        }

        Ok(())
    }

    #[cfg(debug_assertions)]
    fn debug_assert_tree_invariants(&self, parent: NodeId) {
        let children = self.children(parent);
        for (index, child) in children.iter().enumerate() {
            debug_assert_eq!(self.parent(*child), Some(parent));
            debug_assert!(
                !children[index + 1..].contains(child),
                "{child} listed twice under {parent}"
            );
        }
    }

    #[cfg(not(debug_assertions))]
    fn debug_assert_tree_invariants(&self, _parent: NodeId) {}
}

pub struct Ancestors<'a> {
    ast: &'a Ast,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.current?;
        self.current = self.ast.parent(current);
        Some(current)
    }
}
