//=========================================================================
// Scene Node Tree
//=========================================================================
//
// Hierarchical object tree with deferred structural mutation.
//
// Architecture:
//   Node
//     ├─ behavior: Box<dyn Behavior>     (per-frame hooks)
//     ├─ children: Vec<NodeRef>          (owned, insertion order)
//     ├─ to_remove / to_add: Vec<NodeRef>(pending operations)
//     └─ parent: Weak<Node>              (non-owning back-reference)
//
// Flow (per node, per frame):
//   update() → apply removals → apply additions → on_update() → children
//   render() → on_render() → children
//
// A node's child list is only mutated at the start of its own update.
// Every other structural request is queued, so no traversal ever sees
// its list change underneath it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::canvas::Canvas;
use crate::core::frame::FrameContext;

//=== AsAny ===============================================================

/// Upcast helper so behaviors can be recovered by concrete type.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== Behavior Trait ======================================================

/// Per-node hooks invoked by the tree traversal.
///
/// Both hooks receive the node they are attached to, so a behavior can
/// queue structural changes (`add_child`, `remove_self`, ...) on itself
/// or its relatives. Those changes are applied on the next update of the
/// node that owns the affected child list.
///
/// # Minimal Implementation
///
/// ```rust
/// # use stagecraft::prelude::*;
/// struct Spinner { angle: f32 }
///
/// impl Behavior for Spinner {
///     fn on_update(&mut self, _node: &Node, ctx: &FrameContext<'_>) {
///         self.angle += ctx.delta_time();
///     }
/// }
/// ```
pub trait Behavior: AsAny {
    /// Per-frame logic. Called after pending children have been applied
    /// and before any child is updated.
    fn on_update(&mut self, _node: &Node, _ctx: &FrameContext<'_>) {}

    /// Draws this node. Called before any child is rendered.
    fn on_render(&self, _node: &Node, _canvas: &mut dyn Canvas) {}
}

/// Behavior of a plain grouping node.
struct Group;

impl Behavior for Group {}

//=== Node ================================================================

/// Shared handle to a node. Identity is the allocation (`Rc::ptr_eq`).
pub type NodeRef = Rc<Node>;

/// A node of the scene tree.
pub struct Node {
    this: Weak<Node>,
    parent: RefCell<Weak<Node>>,
    behavior: RefCell<Box<dyn Behavior>>,
    children: RefCell<Vec<NodeRef>>,
    to_remove: RefCell<Vec<NodeRef>>,
    to_add: RefCell<Vec<NodeRef>>,
}

impl Node {
    //--- Construction -----------------------------------------------------

    /// Creates a detached node driven by `behavior`.
    pub fn new<B: Behavior>(behavior: B) -> NodeRef {
        Rc::new_cyclic(|this| Node {
            this: this.clone(),
            parent: RefCell::new(Weak::new()),
            behavior: RefCell::new(Box::new(behavior)),
            children: RefCell::new(Vec::new()),
            to_remove: RefCell::new(Vec::new()),
            to_add: RefCell::new(Vec::new()),
        })
    }

    /// Creates a detached node with no behavior of its own.
    ///
    /// Useful to group children that are iterated or removed together.
    pub fn group() -> NodeRef {
        Self::new(Group)
    }

    //--- Structural Requests ----------------------------------------------

    /// Queues `child` for insertion on this node's next update.
    pub fn add_child(&self, child: NodeRef) {
        self.to_add.borrow_mut().push(child);
    }

    /// Queues `child` for removal on this node's next update.
    ///
    /// Nodes that are not children at that point are ignored.
    pub fn remove_child(&self, child: &NodeRef) {
        self.to_remove.borrow_mut().push(Rc::clone(child));
    }

    /// Asks the parent to remove this node. No-op without a parent.
    pub fn remove_self(&self) {
        let Some(parent) = self.parent() else {
            trace!(target: "node", "remove_self on a detached node ignored");
            return;
        };

        if let Some(this) = self.this.upgrade() {
            parent.remove_child(&this);
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Current parent, if this node is attached.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.borrow().upgrade()
    }

    /// Number of applied children, or 0 while the child list is being
    /// rewritten.
    pub fn child_count(&self) -> usize {
        match self.children.try_borrow() {
            Ok(children) => children.len(),
            Err(_) => {
                warn!(target: "node", "child_count during child list mutation");
                0
            }
        }
    }

    /// Child at `index`, or `None` when out of range or while the child
    /// list is being rewritten.
    pub fn child(&self, index: usize) -> Option<NodeRef> {
        self.children.try_borrow().ok()?.get(index).cloned()
    }

    /// Calls `f` on every applied child, in order.
    ///
    /// `f` may queue additions or removals anywhere in the tree; they take
    /// effect on the owning node's next update, never during this call.
    pub fn for_each_child<F>(&self, mut f: F)
    where
        F: FnMut(&NodeRef),
    {
        match self.children.try_borrow() {
            Ok(children) => children.iter().for_each(|child| f(child)),
            Err(_) => warn!(target: "node", "for_each_child during child list mutation ignored"),
        }
    }

    /// Borrows the behavior as `T`.
    ///
    /// Returns `None` if the behavior is another type or is currently
    /// mutably borrowed (e.g. from inside its own `on_update`).
    pub fn behavior<T: Behavior>(&self) -> Option<Ref<'_, T>> {
        let guard = self.behavior.try_borrow().ok()?;
        Ref::filter_map(guard, |b| (**b).as_any().downcast_ref::<T>()).ok()
    }

    /// Mutably borrows the behavior as `T`. Same failure cases as
    /// [`Node::behavior`].
    pub fn behavior_mut<T: Behavior>(&self) -> Option<RefMut<'_, T>> {
        let guard = self.behavior.try_borrow_mut().ok()?;
        RefMut::filter_map(guard, |b| (**b).as_any_mut().downcast_mut::<T>()).ok()
    }

    /// Returns `true` if both handles point at this very node.
    pub fn is(&self, other: &Node) -> bool {
        std::ptr::eq(self, other)
    }

    //--- Traversal --------------------------------------------------------

    /// Applies pending changes, runs this node's hook, then updates every
    /// child in order.
    ///
    /// A child added before this call is updated by it; a child removed
    /// before this call is not.
    pub(crate) fn update(&self, ctx: &FrameContext<'_>) {
        self.apply_pending();

        match self.behavior.try_borrow_mut() {
            Ok(mut behavior) => behavior.on_update(self, ctx),
            Err(_) => warn!(target: "node", "Re-entrant update skipped"),
        }

        match self.children.try_borrow() {
            Ok(children) => {
                for child in children.iter() {
                    child.update(ctx);
                }
            }
            Err(_) => warn!(target: "node", "Child list busy, children not updated"),
        }
    }

    /// Draws this node, then every child in order. Never mutates the tree.
    pub(crate) fn render(&self, canvas: &mut dyn Canvas) {
        match self.behavior.try_borrow() {
            Ok(behavior) => behavior.on_render(self, canvas),
            Err(_) => warn!(target: "node", "Behavior busy, render skipped"),
        }

        match self.children.try_borrow() {
            Ok(children) => {
                for child in children.iter() {
                    child.render(canvas);
                }
            }
            Err(_) => warn!(target: "node", "Child list busy, children not rendered"),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn apply_pending(&self) {
        // Detached nodes are dropped only once the child list is released,
        // so their `Drop` may still query this node.
        let mut detached: Vec<NodeRef> = Vec::new();

        let Ok(mut children) = self.children.try_borrow_mut() else {
            warn!(target: "node", "Child list busy, pending changes deferred");
            return;
        };

        // Removals first, matched by identity so shifting indices never
        // drop the wrong node.
        for target in self.to_remove.take() {
            match children.iter().position(|c| Rc::ptr_eq(c, &target)) {
                Some(index) => {
                    let removed = children.remove(index);
                    if Weak::ptr_eq(&removed.parent.borrow(), &self.this) {
                        *removed.parent.borrow_mut() = Weak::new();
                    }
                    trace!(target: "node", "Removed child at index {}", index);
                    detached.push(removed);
                }
                None => trace!(target: "node", "Removal of a non-child ignored"),
            }
            detached.push(target);
        }

        for child in self.to_add.take() {
            if children.iter().any(|c| Rc::ptr_eq(c, &child)) {
                warn!(target: "node", "Node is already a child, duplicate add ignored");
                detached.push(child);
                continue;
            }

            if let Some(previous) = child.parent() {
                if !previous.is(self) {
                    warn!(target: "node", "Re-parenting a node that is still attached elsewhere");
                }
            }

            *child.parent.borrow_mut() = self.this.clone();
            children.push(child);
        }

        drop(children);
        drop(detached);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("children", &self.children.try_borrow().map(|c| c.len()).ok())
            .field("pending_add", &self.to_add.try_borrow().map(|c| c.len()).ok())
            .field("pending_remove", &self.to_remove.try_borrow().map(|c| c.len()).ok())
            .field("attached", &self.parent().is_some())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use crate::core::canvas::{Color, Rect};
    use crate::core::input::TouchInput;

    //--- Test Helpers -----------------------------------------------------

    type Log = Rc<RefCell<Vec<String>>>;
    type Hook = Box<dyn FnMut(&Node)>;

    /// Records every hook invocation and optionally runs a script on update.
    struct Probe {
        name: &'static str,
        log: Log,
        script: Option<Hook>,
    }

    impl Behavior for Probe {
        fn on_update(&mut self, node: &Node, _ctx: &FrameContext<'_>) {
            self.log.borrow_mut().push(format!("update:{}", self.name));
            if let Some(script) = self.script.as_mut() {
                script(node);
            }
        }

        fn on_render(&self, _node: &Node, _canvas: &mut dyn Canvas) {
            self.log.borrow_mut().push(format!("render:{}", self.name));
        }
    }

    fn probe(name: &'static str, log: &Log) -> NodeRef {
        Node::new(Probe {
            name,
            log: Rc::clone(log),
            script: None,
        })
    }

    fn scripted(name: &'static str, log: &Log, script: impl FnMut(&Node) + 'static) -> NodeRef {
        Node::new(Probe {
            name,
            log: Rc::clone(log),
            script: Some(Box::new(script)),
        })
    }

    struct NullCanvas;

    impl Canvas for NullCanvas {
        fn width(&self) -> u32 {
            0
        }
        fn height(&self) -> u32 {
            0
        }
        fn fill_rect(&mut self, _rect: Rect, _color: Color, _alpha: f32) {}
    }

    fn tick(node: &Node) {
        let input = TouchInput::new();
        node.update(&FrameContext::new(0.016, &input));
    }

    fn draw(node: &Node) {
        node.render(&mut NullCanvas);
    }

    fn take(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    fn names(node: &Node) -> Vec<usize> {
        let mut out = Vec::new();
        node.for_each_child(|c| out.push(Rc::as_ptr(c) as usize));
        out
    }

    //--- Additions --------------------------------------------------------

    #[test]
    fn add_child_is_deferred_until_update() {
        let log = Log::default();
        let root = Node::group();
        let child = probe("a", &log);

        root.add_child(Rc::clone(&child));
        assert_eq!(root.child_count(), 0);
        assert!(child.parent().is_none());

        tick(&root);
        assert_eq!(root.child_count(), 1);
        assert!(child.parent().is_some_and(|p| p.is(&root)));
    }

    #[test]
    fn added_child_is_updated_in_the_same_call() {
        let log = Log::default();
        let root = probe("root", &log);
        root.add_child(probe("a", &log));

        tick(&root);
        assert_eq!(take(&log), vec!["update:root", "update:a"]);
    }

    #[test]
    fn child_added_during_update_waits_for_next_update() {
        let log = Log::default();
        let spawn_log = Rc::clone(&log);
        let mut spawned = false;
        let root = scripted("root", &log, move |node| {
            if !spawned {
                node.add_child(probe("late", &spawn_log));
                spawned = true;
            }
        });

        tick(&root);
        assert_eq!(root.child_count(), 0);
        assert_eq!(take(&log), vec!["update:root"]);

        tick(&root);
        assert_eq!(take(&log), vec!["update:root", "update:late"]);
    }

    #[test]
    fn duplicate_add_is_ignored() {
        let root = Node::group();
        let child = Node::group();
        root.add_child(Rc::clone(&child));
        root.add_child(Rc::clone(&child));
        tick(&root);
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn reparenting_moves_back_reference() {
        let first = Node::group();
        let second = Node::group();
        let child = Node::group();

        first.add_child(Rc::clone(&child));
        tick(&first);
        second.add_child(Rc::clone(&child));
        tick(&second);

        assert!(child.parent().is_some_and(|p| p.is(&second)));
    }

    //--- Removals ---------------------------------------------------------

    #[test]
    fn removed_child_is_neither_updated_nor_rendered() {
        let log = Log::default();
        let root = Node::group();
        let child = probe("a", &log);
        root.add_child(Rc::clone(&child));
        tick(&root);
        take(&log);

        root.remove_child(&child);
        assert_eq!(root.child_count(), 1, "removal is deferred");

        tick(&root);
        draw(&root);
        assert!(take(&log).is_empty());
        assert_eq!(root.child_count(), 0);
        assert!(child.parent().is_none());
    }

    #[test]
    fn remove_self_takes_effect_on_next_parent_update() {
        let log = Log::default();
        let root = Node::group();
        let mut frames = 0;
        let child = scripted("a", &log, move |node| {
            frames += 1;
            if frames == 1 {
                node.remove_self();
            }
        });
        root.add_child(Rc::clone(&child));

        tick(&root);
        assert_eq!(root.child_count(), 1);
        draw(&root);
        assert_eq!(take(&log), vec!["update:a", "render:a"]);

        tick(&root);
        draw(&root);
        assert!(take(&log).is_empty());
        assert_eq!(root.child_count(), 0);
    }

    #[test]
    fn remove_self_without_parent_is_noop() {
        let node = Node::group();
        node.remove_self();
        tick(&node);
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn removing_a_non_child_is_noop() {
        let root = Node::group();
        let kept = Node::group();
        let stranger = Node::group();
        root.add_child(Rc::clone(&kept));
        tick(&root);

        root.remove_child(&stranger);
        tick(&root);
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn removal_before_addition_is_applied_is_noop() {
        let root = Node::group();
        let child = Node::group();

        root.add_child(Rc::clone(&child));
        root.remove_child(&child);
        tick(&root);

        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn double_removal_is_honored_once() {
        let root = Node::group();
        let a = Node::group();
        let b = Node::group();
        root.add_child(Rc::clone(&a));
        root.add_child(Rc::clone(&b));
        tick(&root);

        root.remove_child(&a);
        root.remove_child(&a);
        tick(&root);

        assert_eq!(root.child_count(), 1);
        assert!(root.child(0).is_some_and(|c| Rc::ptr_eq(&c, &b)));
    }

    #[test]
    fn distinct_adds_and_removes_commute() {
        let build = |order: &[&str]| {
            let root = Node::group();
            let nodes: Vec<NodeRef> = (0..4).map(|_| Node::group()).collect();
            root.add_child(Rc::clone(&nodes[0]));
            root.add_child(Rc::clone(&nodes[1]));
            tick(&root);

            for step in order {
                match *step {
                    "rm0" => root.remove_child(&nodes[0]),
                    "add2" => root.add_child(Rc::clone(&nodes[2])),
                    "add3" => root.add_child(Rc::clone(&nodes[3])),
                    _ => unreachable!(),
                }
            }
            tick(&root);

            let mut present: Vec<usize> = (0..4)
                .filter(|i| {
                    let mut found = false;
                    root.for_each_child(|c| found |= Rc::ptr_eq(c, &nodes[*i]));
                    found
                })
                .collect();
            present.sort();
            present
        };

        let expected = vec![1, 2, 3];
        assert_eq!(build(&["rm0", "add2", "add3"]), expected);
        assert_eq!(build(&["add2", "rm0", "add3"]), expected);
        assert_eq!(build(&["add3", "add2", "rm0"]), expected);
    }

    //--- Traversal --------------------------------------------------------

    #[test]
    fn render_visits_self_then_children_in_order() {
        let log = Log::default();
        let root = probe("root", &log);
        root.add_child(probe("a", &log));
        root.add_child(probe("b", &log));
        tick(&root);
        take(&log);

        draw(&root);
        assert_eq!(take(&log), vec!["render:root", "render:a", "render:b"]);
    }

    #[test]
    fn for_each_child_tolerates_removal_requests() {
        let root = Node::group();
        for _ in 0..3 {
            root.add_child(Node::group());
        }
        tick(&root);
        let before = names(&root);

        let mut visited = 0;
        root.for_each_child(|child| {
            visited += 1;
            child.remove_self();
        });

        assert_eq!(visited, 3);
        assert_eq!(names(&root), before, "nothing changes until update");

        tick(&root);
        assert_eq!(root.child_count(), 0);
    }

    #[test]
    fn for_each_child_tolerates_addition_requests() {
        let root = Node::group();
        root.add_child(Node::group());
        root.add_child(Node::group());
        tick(&root);

        let mut visited = 0;
        root.for_each_child(|_| {
            visited += 1;
            root.add_child(Node::group());
        });

        assert_eq!(visited, 2, "queued children are not visited");
        assert_eq!(root.child_count(), 2);

        tick(&root);
        assert_eq!(root.child_count(), 4);
    }

    /// Reports what its former parent looks like while being dropped.
    struct DropWatcher {
        parent: Weak<Node>,
        seen: Rc<Cell<Option<usize>>>,
    }

    impl Behavior for DropWatcher {}

    impl Drop for DropWatcher {
        fn drop(&mut self) {
            if let Some(parent) = self.parent.upgrade() {
                let _ = parent.child(0);
                self.seen.set(Some(parent.child_count()));
            }
        }
    }

    #[test]
    fn removed_child_drop_can_query_former_parent() {
        let root = Node::group();
        let seen = Rc::new(Cell::new(None));
        let child = Node::new(DropWatcher {
            parent: Rc::downgrade(&root),
            seen: Rc::clone(&seen),
        });
        root.add_child(Rc::clone(&child));
        tick(&root);

        root.remove_child(&child);
        drop(child);
        assert_eq!(seen.get(), None, "still owned by the pending removal");

        tick(&root);
        assert_eq!(seen.get(), Some(0));
        assert_eq!(root.child_count(), 0);
    }

    //--- Accessors --------------------------------------------------------

    #[test]
    fn child_out_of_range_is_none() {
        let root = Node::group();
        root.add_child(Node::group());
        tick(&root);

        assert!(root.child(0).is_some());
        assert!(root.child(1).is_none());
        assert!(root.child(usize::MAX).is_none());
    }

    struct Counter {
        count: u32,
        self_visible: Option<bool>,
    }

    impl Behavior for Counter {
        fn on_update(&mut self, node: &Node, _ctx: &FrameContext<'_>) {
            self.count += 1;
            self.self_visible = Some(node.behavior::<Counter>().is_some());
        }
    }

    #[test]
    fn behavior_downcasts_to_concrete_type() {
        let node = Node::new(Counter {
            count: 0,
            self_visible: None,
        });
        tick(&node);
        tick(&node);

        assert_eq!(node.behavior::<Counter>().map(|c| c.count), Some(2));
        assert!(node.behavior::<Group>().is_none());

        if let Some(mut counter) = node.behavior_mut::<Counter>() {
            counter.count = 10;
        }
        assert_eq!(node.behavior::<Counter>().map(|c| c.count), Some(10));
    }

    #[test]
    fn behavior_is_unavailable_while_its_hook_runs() {
        let node = Node::new(Counter {
            count: 0,
            self_visible: None,
        });
        tick(&node);
        assert_eq!(node.behavior::<Counter>().and_then(|c| c.self_visible), Some(false));
    }
}
