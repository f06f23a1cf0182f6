//! Singly-linked record list.
//!
//! # Responsibility
//! - Hold records in insertion order with O(1) prepend and append.
//! - Provide positional update/removal and exact-match keyed scans.
//!
//! # Invariants
//! - `length` equals the number of nodes reachable from `head`.
//! - `head.is_none() == tail.is_none() == (length == 0)`.
//! - The tail node never has a successor.
//! - Every node is owned by the list; callers only see borrowed handles.
//!
//! Nodes live in a slot arena and link to their successor by slot id, which
//! gives a real tail link without shared ownership.

use crate::model::field::ValidationResult;
use crate::model::record::{Record, RecordDraft, RecordRules};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

type NodeId = usize;

struct Node {
    record: Record,
    next: Option<NodeId>,
}

/// Ordered, exclusively owned chain of records.
pub struct RecordList {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    length: usize,
    rules: Arc<RecordRules>,
}

/// Borrowed view of one node, used for head-to-tail traversal.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    list: &'a RecordList,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub fn value(&self) -> &'a Record {
        &self.node.record
    }

    pub fn next(&self) -> Option<NodeRef<'a>> {
        self.node.next.and_then(|id| self.list.node_ref(id))
    }
}

impl Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", self.value())
            .field("has_next", &self.node.next.is_some())
            .finish()
    }
}

/// Head-to-tail record iterator.
pub struct Iter<'a> {
    cursor: Option<NodeRef<'a>>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = current.next();
        self.remaining = self.remaining.saturating_sub(1);
        Some(current.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl RecordList {
    /// Creates an empty list validated by the standard rules.
    pub fn new() -> Self {
        Self::with_rules(RecordRules::standard())
    }

    /// Creates an empty list validated by `rules`.
    pub fn with_rules(rules: Arc<RecordRules>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            length: 0,
            rules,
        }
    }

    /// Materializes `records` in order via repeated `push_last`.
    pub fn from_records(
        rules: Arc<RecordRules>,
        records: impl IntoIterator<Item = Record>,
    ) -> ValidationResult<Self> {
        let mut list = Self::with_rules(rules);
        for record in records {
            list.push_last(record)?;
        }
        Ok(list)
    }

    pub fn rules(&self) -> &RecordRules {
        &self.rules
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Builds a record from raw fields and makes it the new head.
    pub fn insert_first(
        &mut self,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> ValidationResult<()> {
        let record = Record::new_with(&self.rules, amount, category, date, description)?;
        self.link_first(record);
        Ok(())
    }

    /// Builds a record from raw fields and appends it after the tail.
    pub fn insert_last(
        &mut self,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> ValidationResult<()> {
        let record = Record::new_with(&self.rules, amount, category, date, description)?;
        self.link_last(record);
        Ok(())
    }

    /// Prepends an existing record after re-checking it against the list rules.
    pub fn push_first(&mut self, record: Record) -> ValidationResult<()> {
        self.rules.check_record(&record)?;
        self.link_first(record);
        Ok(())
    }

    /// Appends an existing record after re-checking it against the list rules.
    pub fn push_last(&mut self, record: Record) -> ValidationResult<()> {
        self.rules.check_record(&record)?;
        self.link_last(record);
        Ok(())
    }

    /// Returns the head node, or `None` for an empty list.
    pub fn get(&self) -> Option<NodeRef<'_>> {
        self.head.and_then(|id| self.node_ref(id))
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            cursor: self.get(),
            remaining: self.length,
        }
    }

    /// Positions and records whose amount equals `value` exactly.
    ///
    /// `value` must itself be a valid amount.
    pub fn get_by_amount(&self, value: f64) -> ValidationResult<BTreeMap<usize, &Record>> {
        self.rules.check_amount(value)?;
        #[allow(clippy::float_cmp)]
        let found = self.collect_matching(|record| record.amount() == value);
        Ok(found)
    }

    /// Positions and records whose category equals `value`.
    pub fn get_by_category(&self, value: &str) -> ValidationResult<BTreeMap<usize, &Record>> {
        self.rules.check_category(value)?;
        Ok(self.collect_matching(|record| record.category() == value))
    }

    /// Positions and records whose date string equals `value`.
    ///
    /// Comparison is textual: `2024-1-1` does not match `2024-01-01`.
    pub fn get_by_date(&self, value: &str) -> ValidationResult<BTreeMap<usize, &Record>> {
        self.rules.check_date(value)?;
        Ok(self.collect_matching(|record| record.date() == value))
    }

    /// Unlinks the node at `index`.
    ///
    /// Returns `false` for a negative index, an empty list, or an index past
    /// the end.
    pub fn remove_by_index(&mut self, index: i64) -> bool {
        let Ok(index) = usize::try_from(index) else {
            return false;
        };
        let Some(head) = self.head else {
            return false;
        };

        if index == 0 {
            let Some(removed) = self.release(head) else {
                return false;
            };
            self.head = removed.next;
            if self.head.is_none() {
                self.tail = None;
            }
            self.length -= 1;
            return true;
        }

        let Some(prev) = self.id_at(index - 1) else {
            return false;
        };
        let Some(target) = self.slot(prev).and_then(|node| node.next) else {
            return false;
        };
        let Some(removed) = self.release(target) else {
            return false;
        };

        if let Some(prev_node) = self.slot_mut(prev) {
            prev_node.next = removed.next;
        }
        if removed.next.is_none() {
            self.tail = Some(prev);
        }
        self.length -= 1;
        true
    }

    /// Overwrites the supplied fields of the record at `index` in place.
    ///
    /// Returns `Ok(false)` for a negative or past-the-end index (including an
    /// empty list). Supplied fields are validated together before any write.
    pub fn update_by_index(&mut self, index: i64, changes: &RecordDraft) -> ValidationResult<bool> {
        let Some(id) = usize::try_from(index).ok().and_then(|index| self.id_at(index)) else {
            return Ok(false);
        };

        let rules = &self.rules;
        let Some(node) = self.slots.get_mut(id).and_then(Option::as_mut) else {
            return Ok(false);
        };
        node.record.apply(rules, changes)?;
        Ok(true)
    }

    /// Consumes the list, returning records in head-to-tail order.
    pub fn into_records(mut self) -> Vec<Record> {
        let mut records = Vec::with_capacity(self.length);
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(node) = self.slots.get_mut(id).and_then(Option::take) else {
                break;
            };
            cursor = node.next;
            records.push(node.record);
        }
        records
    }

    fn link_first(&mut self, record: Record) {
        let id = self.alloc(Node {
            record,
            next: self.head,
        });
        self.head = Some(id);
        if self.tail.is_none() {
            self.tail = Some(id);
        }
        self.length += 1;
    }

    fn link_last(&mut self, record: Record) {
        let id = self.alloc(Node { record, next: None });
        let tail = self.tail;
        match tail.and_then(|tail| self.slot_mut(tail)) {
            Some(tail) => tail.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.length += 1;
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Option<Node> {
        let node = self.slots.get_mut(id)?.take()?;
        self.free.push(id);
        Some(node)
    }

    fn slot(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }

    fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.slot(id).map(|node| NodeRef { list: self, node })
    }

    /// Walks `index` links from the head.
    fn id_at(&self, index: usize) -> Option<NodeId> {
        let mut cursor = self.head;
        for _ in 0..index {
            cursor = self.slot(cursor?)?.next;
        }
        cursor
    }

    fn collect_matching(&self, matches: impl Fn(&Record) -> bool) -> BTreeMap<usize, &Record> {
        self.iter()
            .enumerate()
            .filter(|(_, record)| matches(*record))
            .collect()
    }
}

impl Default for RecordList {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for RecordList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a RecordList {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
