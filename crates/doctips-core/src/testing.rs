#![forbid(unsafe_code)]

//! In-memory host used by the unit tests: a flat DOM arena, a fake clipboard
//! and a timer queue driven by a deterministic clock.

use core::time::Duration;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::host::{
    ClipboardHost, CopySurface, DocumentHost, HostError, MarkupHost, OffsetMetrics, TimerHost,
};

/// Monotonic clock advanced explicitly by the test.
#[derive(Debug, Default, Clone)]
pub(crate) struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    pub(crate) const fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Default)]
struct FakeNode {
    tag: String,
    id: Option<String>,
    metrics: OffsetMetrics,
    offset_parent: Option<NodeId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
}

struct PendingTimer {
    due: Duration,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

pub(crate) struct FakeHost {
    nodes: RefCell<Vec<FakeNode>>,
    body: NodeId,
    search: RefCell<String>,
    key_dismiss_installs: Cell<usize>,
    style_writes: Cell<usize>,
    copy_allowed: Cell<bool>,
    selected: Cell<Option<NodeId>>,
    last_copy_field: RefCell<Option<String>>,
    clipboard: RefCell<Vec<String>>,
    clock: RefCell<DeterministicClock>,
    timers: RefCell<Vec<PendingTimer>>,
    next_timer_seq: Cell<u64>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        let body = FakeNode {
            tag: "body".to_owned(),
            ..FakeNode::default()
        };
        Self {
            nodes: RefCell::new(vec![body]),
            body: NodeId(0),
            search: RefCell::new(String::new()),
            key_dismiss_installs: Cell::new(0),
            style_writes: Cell::new(0),
            copy_allowed: Cell::new(true),
            selected: Cell::new(None),
            last_copy_field: RefCell::new(None),
            clipboard: RefCell::new(Vec::new()),
            clock: RefCell::new(DeterministicClock::default()),
            timers: RefCell::new(Vec::new()),
            next_timer_seq: Cell::new(0),
        }
    }

    pub(crate) fn with_search(search: &str) -> Self {
        let host = Self::new();
        host.set_search(search);
        host
    }

    pub(crate) fn set_search(&self, search: &str) {
        *self.search.borrow_mut() = search.to_owned();
    }

    fn push(&self, node: FakeNode) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        NodeId(nodes.len() - 1)
    }

    /// A positioned box whose offset parent is `offset_parent`.
    pub(crate) fn add_box(
        &self,
        offset_parent: Option<NodeId>,
        left: i32,
        top: i32,
        height: i32,
    ) -> NodeId {
        self.push(FakeNode {
            tag: "div".to_owned(),
            metrics: OffsetMetrics { left, top, height },
            offset_parent,
            ..FakeNode::default()
        })
    }

    /// A tooltip element registered under `id`.
    pub(crate) fn add_tip(&self, id: &str) -> NodeId {
        self.push(FakeNode {
            tag: "div".to_owned(),
            id: Some(id.to_owned()),
            ..FakeNode::default()
        })
    }

    /// An element appended under `parent` (or detached when `None`).
    pub(crate) fn add_element(&self, tag: &str, parent: Option<NodeId>) -> NodeId {
        let node = self.push(FakeNode {
            tag: tag.to_owned(),
            parent,
            ..FakeNode::default()
        });
        if let Some(parent) = parent {
            self.nodes.borrow_mut()[parent.0].children.push(node);
        }
        node
    }

    pub(crate) fn set_text(&self, node: NodeId, text: &str) {
        self.nodes.borrow_mut()[node.0].text = text.to_owned();
    }

    pub(crate) fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    pub(crate) fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].styles.get(property).cloned()
    }

    pub(crate) fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attributes.get(name).cloned()
    }

    pub(crate) fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    pub(crate) fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub(crate) fn body_children(&self) -> Vec<NodeId> {
        self.children(self.body)
    }

    pub(crate) fn key_dismiss_installs(&self) -> usize {
        self.key_dismiss_installs.get()
    }

    pub(crate) fn style_writes(&self) -> usize {
        self.style_writes.get()
    }

    pub(crate) fn set_copy_allowed(&self, allowed: bool) {
        self.copy_allowed.set(allowed);
    }

    pub(crate) fn clipboard(&self) -> Vec<String> {
        self.clipboard.borrow().clone()
    }

    /// Tag of the field the most recent successful copy went through.
    pub(crate) fn last_copy_field(&self) -> Option<String> {
        self.last_copy_field.borrow().clone()
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Advance the clock and run every timer that came due, in due order.
    pub(crate) fn advance(&self, dt: Duration) {
        self.clock.borrow_mut().advance(dt);
        let now = self.clock.borrow().now();
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let due = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= now)
                    .min_by_key(|(_, timer)| (timer.due, timer.seq))
                    .map(|(idx, _)| idx);
                due.map(|idx| timers.remove(idx))
            };
            match next {
                Some(timer) => (timer.task)(),
                None => break,
            }
        }
    }

    fn matches(node: &FakeNode, selector: &str) -> bool {
        let selector = selector.trim();
        let Some((tag, rest)) = selector.split_once('[') else {
            return node.tag == selector;
        };
        let Some((name, value)) = rest.trim_end_matches(']').split_once('=') else {
            return false;
        };
        node.tag == tag && node.attributes.get(name).map(String::as_str) == Some(value)
    }

    fn detach(&self, child: NodeId) {
        let parent = self.nodes.borrow_mut()[child.0].parent.take();
        if let Some(parent) = parent {
            self.nodes.borrow_mut()[parent.0]
                .children
                .retain(|&c| c != child);
        }
    }
}

impl DocumentHost for FakeHost {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .position(|node| node.id.as_deref() == Some(id))
            .map(NodeId)
    }

    fn offset_metrics(&self, element: &NodeId) -> OffsetMetrics {
        self.nodes.borrow()[element.0].metrics
    }

    fn offset_parent(&self, element: &NodeId) -> Option<NodeId> {
        self.nodes.borrow()[element.0].offset_parent
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) -> Result<(), HostError> {
        self.style_writes.set(self.style_writes.get() + 1);
        self.nodes.borrow_mut()[element.0]
            .styles
            .insert(property.to_owned(), value.to_owned());
        Ok(())
    }

    fn location_search(&self) -> String {
        self.search.borrow().clone()
    }

    fn install_key_dismiss(&self) -> Result<(), HostError> {
        self.key_dismiss_installs
            .set(self.key_dismiss_installs.get() + 1);
        Ok(())
    }
}

impl ClipboardHost for FakeHost {
    type Input = NodeId;

    fn create_input(&self, value: &str, surface: CopySurface) -> Result<NodeId, HostError> {
        let (tag, value) = match surface {
            // Text inputs strip CR and LF from their value.
            CopySurface::SingleLine => ("input", value.replace(['\r', '\n'], "")),
            CopySurface::MultiLine => ("textarea", value.to_owned()),
        };
        Ok(self.push(FakeNode {
            tag: tag.to_owned(),
            value,
            ..FakeNode::default()
        }))
    }

    fn attach_input(&self, input: &NodeId) -> Result<(), HostError> {
        self.nodes.borrow_mut()[input.0].parent = Some(self.body);
        self.nodes.borrow_mut()[self.body.0].children.push(*input);
        Ok(())
    }

    fn select_input(&self, input: &NodeId) {
        self.selected.set(Some(*input));
    }

    fn exec_copy(&self) -> Result<bool, HostError> {
        if !self.copy_allowed.get() {
            return Ok(false);
        }
        let Some(selected) = self.selected.get() else {
            return Ok(false);
        };
        let nodes = self.nodes.borrow();
        let node = &nodes[selected.0];
        if node.parent.is_none() {
            return Err(HostError::new("selection is not attached to the document"));
        }
        self.clipboard.borrow_mut().push(node.value.clone());
        *self.last_copy_field.borrow_mut() = Some(node.tag.clone());
        Ok(true)
    }

    fn detach_input(&self, input: &NodeId) -> Result<(), HostError> {
        self.detach(*input);
        if self.selected.get() == Some(*input) {
            self.selected.set(None);
        }
        Ok(())
    }
}

impl MarkupHost for FakeHost {
    type Node = NodeId;

    fn query_all(&self, selector: &str) -> Result<Vec<NodeId>, HostError> {
        if selector.trim().is_empty() {
            return Err(HostError::new("empty selector"));
        }
        let nodes = self.nodes.borrow();
        Ok(nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| selector.split(',').any(|part| Self::matches(node, part)))
            .map(|(idx, _)| NodeId(idx))
            .collect())
    }

    fn text_content(&self, node: &NodeId) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    fn parent_element(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, HostError> {
        Ok(self.add_element(tag, None))
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), HostError> {
        self.set_attr(*node, name, value);
        Ok(())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        self.detach(*child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(*parent);
        nodes[parent.0].children.push(*child);
        Ok(())
    }

    fn prepend_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        self.detach(*child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(*parent);
        nodes[parent.0].children.insert(0, *child);
        Ok(())
    }
}

impl TimerHost for FakeHost {
    fn schedule_once(
        &self,
        delay: Duration,
        task: Box<dyn FnOnce() + 'static>,
    ) -> Result<(), HostError> {
        let seq = self.next_timer_seq.get();
        self.next_timer_seq.set(seq + 1);
        let due = self.clock.borrow().now().saturating_add(delay);
        self.timers.borrow_mut().push(PendingTimer { due, seq, task });
        Ok(())
    }
}
