/*!
# Intrusive Doubly Linked Lists

An arena of doubly linked lists. Every list owns a left sentinel slot and a
tail pointer; the slots of all lists live in one shared `ListArena`, so a
`cut` or `insert_list` moves a whole chain of containers from one list to
another in O(1) without touching the items. Container ids stay valid across
every operation, which is what lets the split-findmin structure keep
back-references into spines that are repeatedly cut and spliced.

Handles deliberately implement neither `Clone` nor `Copy`: a list is consumed
when it is spliced into another one, and the type system enforces that the
stale handle cannot be used afterwards.

Sentinels are never exposed as items; walking `prev` from any container
terminates at a slot whose item is `None`.
*/

const NIL: usize = usize::MAX;

/// Index of a container slot inside a [`ListArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerId(usize);

#[derive(Debug)]
struct Slot<T> {
    item: Option<T>,
    prev: usize,
    next: usize,
}

/// One list: its sentinel and its last container (the sentinel itself when
/// the list is empty).
#[derive(Debug)]
pub struct ListHandle {
    sentinel: ContainerId,
    last: ContainerId,
}

impl ListHandle {
    /// The sentinel container of this list.
    pub fn sentinel(&self) -> ContainerId {
        self.sentinel
    }

    /// The last container, or the sentinel when the list is empty.
    pub fn last(&self) -> ContainerId {
        self.last
    }
}

/// Shared storage for any number of doubly linked lists over items of type `T`.
#[derive(Debug)]
pub struct ListArena<T> {
    slots: Vec<Slot<T>>,
}

impl<T: Copy> ListArena<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    fn alloc(&mut self, item: Option<T>, prev: usize, next: usize) -> ContainerId {
        self.slots.push(Slot { item, prev, next });
        ContainerId(self.slots.len() - 1)
    }

    /// Creates a new empty list.
    pub fn new_list(&mut self) -> ListHandle {
        let sentinel = self.alloc(None, NIL, NIL);
        ListHandle {
            sentinel,
            last: sentinel,
        }
    }

    pub fn is_empty(&self, list: &ListHandle) -> bool {
        list.sentinel == list.last
    }

    /// The item held by `container`, or `None` for sentinels.
    pub fn item(&self, container: ContainerId) -> Option<T> {
        self.slots[container.0].item
    }

    /// The container after `container`, if any.
    pub fn next(&self, container: ContainerId) -> Option<ContainerId> {
        match self.slots[container.0].next {
            NIL => None,
            n => Some(ContainerId(n)),
        }
    }

    /// The container before `container`. `None` only for sentinels.
    pub fn prev(&self, container: ContainerId) -> Option<ContainerId> {
        match self.slots[container.0].prev {
            NIL => None,
            p => Some(ContainerId(p)),
        }
    }

    /// First item-bearing container of `list`.
    pub fn first(&self, list: &ListHandle) -> Option<ContainerId> {
        if self.is_empty(list) {
            None
        } else {
            self.next(list.sentinel)
        }
    }

    /// Appends `item` at the tail and returns its container.
    pub fn append(&mut self, list: &mut ListHandle, item: T) -> ContainerId {
        self.insert_after(list, list.last, item)
    }

    /// Prepends `item` right after the sentinel and returns its container.
    pub fn append_first(&mut self, list: &mut ListHandle, item: T) -> ContainerId {
        self.insert_after(list, list.sentinel, item)
    }

    /// Inserts `item` after `position` (which must belong to `list`).
    pub fn insert_after(
        &mut self,
        list: &mut ListHandle,
        position: ContainerId,
        item: T,
    ) -> ContainerId {
        let old_next = self.slots[position.0].next;
        let container = self.alloc(Some(item), position.0, old_next);
        if old_next != NIL {
            self.slots[old_next].prev = container.0;
        }
        self.slots[position.0].next = container.0;
        if list.last == position {
            list.last = container;
        }
        container
    }

    /// Unlinks `container` from `list` and returns its predecessor.
    pub fn remove(&mut self, list: &mut ListHandle, container: ContainerId) -> ContainerId {
        let prev = self.slots[container.0].prev;
        let next = self.slots[container.0].next;
        self.slots[prev].next = next;
        if next != NIL {
            self.slots[next].prev = prev;
        }
        if list.last == container {
            list.last = ContainerId(prev);
        }
        ContainerId(prev)
    }

    /// Splits `list` after `container`: everything up to and including
    /// `container` stays, the rest is returned as a new list. Cutting at the
    /// last container (or at the sentinel of an empty list) returns an empty
    /// list; cutting at the sentinel of a non-empty list moves everything.
    pub fn cut_after(&mut self, list: &mut ListHandle, container: ContainerId) -> ListHandle {
        if container == list.last {
            return self.new_list();
        }
        let sentinel = self.alloc(None, NIL, self.slots[container.0].next);
        let first = self.slots[container.0].next;
        self.slots[first].prev = sentinel.0;
        self.slots[container.0].next = NIL;
        let suffix = ListHandle {
            sentinel,
            last: list.last,
        };
        list.last = container;
        suffix
    }

    /// Splices `other` into `list` after `position`, consuming `other`.
    /// Returns the last spliced container, or `position` when `other` was
    /// empty.
    pub fn insert_list(
        &mut self,
        list: &mut ListHandle,
        position: ContainerId,
        other: ListHandle,
    ) -> ContainerId {
        if self.is_empty(&other) {
            return position;
        }
        let first = self.slots[other.sentinel.0].next;
        let last = other.last;
        let old_next = self.slots[position.0].next;
        self.slots[position.0].next = first;
        self.slots[first].prev = position.0;
        self.slots[last.0].next = old_next;
        if old_next != NIL {
            self.slots[old_next].prev = last.0;
        }
        if list.last == position {
            list.last = last;
        }
        last
    }

    /// Appends the whole contents of `other` to `list`, consuming `other`.
    pub fn extend(&mut self, list: &mut ListHandle, other: ListHandle) {
        if self.is_empty(&other) {
            return;
        }
        let first = self.slots[other.sentinel.0].next;
        self.slots[list.last.0].next = first;
        self.slots[first].prev = list.last.0;
        list.last = other.last;
    }

    /// Collects the items of `list` front to back.
    pub fn items(&self, list: &ListHandle) -> Vec<T> {
        let mut out = Vec::new();
        let mut current = self.next(list.sentinel);
        while let Some(c) = current {
            if let Some(item) = self.slots[c.0].item {
                out.push(item);
            }
            current = self.next(c);
        }
        out
    }
}

impl<T: Copy> Default for ListArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_iterate() {
        let mut arena = ListArena::new();
        let mut list = arena.new_list();
        assert!(arena.is_empty(&list));
        arena.append(&mut list, 1);
        arena.append(&mut list, 2);
        arena.append_first(&mut list, 0);
        assert_eq!(arena.items(&list), vec![0, 1, 2]);
        assert_eq!(arena.item(list.last()), Some(2));
    }

    #[test]
    fn test_remove_middle_and_tail() {
        let mut arena = ListArena::new();
        let mut list = arena.new_list();
        let a = arena.append(&mut list, 'a');
        let b = arena.append(&mut list, 'b');
        let c = arena.append(&mut list, 'c');

        let before = arena.remove(&mut list, b);
        assert_eq!(before, a);
        assert_eq!(arena.items(&list), vec!['a', 'c']);

        arena.remove(&mut list, c);
        assert_eq!(arena.items(&list), vec!['a']);
        assert_eq!(list.last(), a);
    }

    #[test]
    fn test_cut_after() {
        let mut arena = ListArena::new();
        let mut list = arena.new_list();
        let containers: Vec<_> = (0..5).map(|i| arena.append(&mut list, i)).collect();

        let suffix = arena.cut_after(&mut list, containers[2]);
        assert_eq!(arena.items(&list), vec![0, 1, 2]);
        assert_eq!(arena.items(&suffix), vec![3, 4]);

        // Cutting at the tail yields an empty list.
        let empty = arena.cut_after(&mut list, containers[2]);
        assert!(arena.is_empty(&empty));

        // Cutting at the sentinel moves everything.
        let sentinel = list.sentinel();
        let all = arena.cut_after(&mut list, sentinel);
        assert!(arena.is_empty(&list));
        assert_eq!(arena.items(&all), vec![0, 1, 2]);
    }

    #[test]
    fn test_insert_list_preserves_container_ids() {
        let mut arena = ListArena::new();
        let mut target = arena.new_list();
        let a = arena.append(&mut target, 10);
        arena.append(&mut target, 30);

        let mut other = arena.new_list();
        let x = arena.append(&mut other, 20);
        arena.append(&mut other, 25);

        let spliced_last = arena.insert_list(&mut target, a, other);
        assert_eq!(arena.items(&target), vec![10, 20, 25, 30]);
        assert_eq!(arena.item(spliced_last), Some(25));
        // The moved container is the same slot as before the splice.
        assert_eq!(arena.item(x), Some(20));
        assert_eq!(arena.prev(x), Some(a));
    }

    #[test]
    fn test_insert_empty_list_returns_position() {
        let mut arena = ListArena::new();
        let mut target = arena.new_list();
        let a = arena.append(&mut target, 1);
        let other = arena.new_list();
        assert_eq!(arena.insert_list(&mut target, a, other), a);
        assert_eq!(arena.items(&target), vec![1]);
    }

    #[test]
    fn test_extend() {
        let mut arena = ListArena::new();
        let mut left = arena.new_list();
        arena.append(&mut left, 1);
        let mut right = arena.new_list();
        arena.append(&mut right, 2);
        arena.append(&mut right, 3);
        arena.extend(&mut left, right);
        assert_eq!(arena.items(&left), vec![1, 2, 3]);

        let empty = arena.new_list();
        arena.extend(&mut left, empty);
        assert_eq!(arena.items(&left), vec![1, 2, 3]);
    }

    #[test]
    fn test_prev_walk_stops_at_sentinel() {
        let mut arena = ListArena::new();
        let mut list = arena.new_list();
        arena.append(&mut list, 7);
        let b = arena.append(&mut list, 8);

        let a = arena.prev(b).unwrap();
        assert_eq!(arena.item(a), Some(7));
        let s = arena.prev(a).unwrap();
        assert_eq!(arena.item(s), None);
        assert_eq!(s, list.sentinel());
    }
}
