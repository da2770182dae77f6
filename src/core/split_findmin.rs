/*!
# Split-Findmin (Gabow)

Gabow's split-findmin structure: an ordered list of costed elements supporting
`decrease_cost` and `split` with amortized inverse-Ackermann cost per
operation, used by the shortest-path engine to maintain tentative distances of
unvisited vertices.

After initialization a list of index `i` is partitioned into *units*:

- **left-over singleton elements** (fewer than four elements remained when the
  greedy pass stopped, plus any produced later by splits),
- **singleton superelements** (a maximal run of consecutive superelements of
  one level that turned out to have length one),
- **sublists**: runs of two or more same-level superelements, each sublist
  itself a split-findmin structure of index `i - 1` whose elements carry the
  superelements.

Superelements are formed greedily from one end while at least four elements
remain unprocessed; a superelement at `level = α⁻¹(i, remaining)` spans
`2·A(i, level)` consecutive elements. Every unit kind lives on its own spine
(an intrusive linked list), and each aggregate caches the minimum cost of
everything below it: `c(e)` over a superelement's elements, `c(sublist)` over
its superelements, `c(L)` over the units of `L`.

`decrease_cost` renews the aggregates along the containment chain.
`split(x)` severs the list after `x`: spines are cut at the unit boundary
found by walking backwards from `x`, and when `x` lies strictly inside a
superelement that superelement is dismantled. Its sublist is split twice so
the superelement stands alone, and the element runs before/after the cut are
re-decomposed by the head/tail initializer and spliced back into the spines.

Everything is arena-allocated and addressed by ids; containment
back-references are ids, never owning pointers, so the cyclic structure stays
safe Rust.
*/

use crate::core::ackermann::AckermannTable;
use crate::core::error::{Result, ThorupError};
use crate::core::linked_list::{ContainerId, ListArena, ListHandle};

/// Sentinel cost standing in for +∞.
pub const INFINITE_COST: u64 = u64::MAX;

/// Handle of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

/// Handle of a superelement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperelementId(usize);

/// Handle of a list (the outer structure or any sublist produced by
/// initialization or splits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListId(usize);

/// What an element carries: a caller-supplied position at the outermost
/// level, or a superelement one level down.
#[derive(Debug, Clone, Copy)]
enum Payload {
    Position(usize),
    Superelement(SuperelementId),
}

#[derive(Debug)]
struct ElementNode {
    payload: Payload,
    cost: u64,
    /// Container in the elements spine of the list this element belongs to.
    container: ContainerId,
    /// Set while the element is covered by a superelement.
    superelement: Option<SuperelementId>,
    /// Set while the element is a left-over singleton of a list.
    containing_list: Option<ListId>,
    singleton_container: Option<ContainerId>,
}

#[derive(Debug)]
struct SuperelementNode {
    level: i64,
    first: ElementId,
    last: ElementId,
    cost: u64,
    /// Set while this is a singleton superelement of a list.
    containing_list: Option<ListId>,
    singleton_container: Option<ContainerId>,
    /// Set while this superelement is grouped into a sublist.
    containing_sublist: Option<ListId>,
    /// The element carrying this superelement inside that sublist.
    sublist_element: Option<ElementId>,
}

#[derive(Debug)]
struct ListNode {
    index: i64,
    cost: u64,
    elements: ListHandle,
    singleton_elements: ListHandle,
    singleton_superelements: ListHandle,
    sublists: ListHandle,
    /// The list this one is a sublist of, if any.
    containing_list: Option<ListId>,
    /// Container of this list in the parent's sublists spine.
    spine_container: Option<ContainerId>,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Head,
    Tail,
}

/// Which unit disappears when a superelement is dismantled mid-split.
enum DeadUnit {
    SingletonSuperelement,
    Sublist(ListId),
}

/// The split-findmin structure over one ordered element list.
#[derive(Debug)]
pub struct SplitFindminStructure {
    ackermann: AckermannTable,
    elements: Vec<ElementNode>,
    supers: Vec<SuperelementNode>,
    lists: Vec<ListNode>,
    element_links: ListArena<ElementId>,
    superelement_links: ListArena<SuperelementId>,
    sublist_links: ListArena<ListId>,
    root: ListId,
    initialized: bool,
}

impl SplitFindminStructure {
    /// Creates an empty structure sized for `elements_number` elements and
    /// `decreasecosts_number` expected cost decreases; the pair picks the
    /// index of the outermost list.
    pub fn new(elements_number: usize, decreasecosts_number: usize) -> Self {
        let ackermann = AckermannTable::new(elements_number as u64);
        let index = ackermann.get_inverse(decreasecosts_number as i64, elements_number as u64);
        let mut this = Self {
            ackermann,
            elements: Vec::with_capacity(elements_number),
            supers: Vec::new(),
            lists: Vec::new(),
            element_links: ListArena::with_capacity(2 * elements_number + 4),
            superelement_links: ListArena::new(),
            sublist_links: ListArena::new(),
            root: ListId(0),
            initialized: false,
        };
        this.root = this.new_list(index);
        this
    }

    fn new_list(&mut self, index: i64) -> ListId {
        let elements = self.element_links.new_list();
        let singleton_elements = self.element_links.new_list();
        let singleton_superelements = self.superelement_links.new_list();
        let sublists = self.sublist_links.new_list();
        self.lists.push(ListNode {
            index,
            cost: INFINITE_COST,
            elements,
            singleton_elements,
            singleton_superelements,
            sublists,
            containing_list: None,
            spine_container: None,
        });
        ListId(self.lists.len() - 1)
    }

    fn push_element(&mut self, list: ListId, payload: Payload, cost: u64, at_end: bool) -> ElementId {
        let id = ElementId(self.elements.len());
        let container = if at_end {
            self.element_links.append(&mut self.lists[list.0].elements, id)
        } else {
            self.element_links.append_first(&mut self.lists[list.0].elements, id)
        };
        self.elements.push(ElementNode {
            payload,
            cost,
            container,
            superelement: None,
            containing_list: None,
            singleton_container: None,
        });
        id
    }

    /// Appends an element holding `position` with the given initial cost.
    /// Only valid before initialization.
    pub fn add(&mut self, position: usize, cost: u64) -> Result<ElementId> {
        if self.initialized {
            return Err(ThorupError::precondition_violation(
                "cannot add elements to an initialized split-findmin structure",
            ));
        }
        Ok(self.push_element(self.root, Payload::Position(position), cost, true))
    }

    /// Prepends an element holding `position` with the given initial cost.
    /// Only valid before initialization.
    pub fn add_first(&mut self, position: usize, cost: u64) -> Result<ElementId> {
        if self.initialized {
            return Err(ThorupError::precondition_violation(
                "cannot add elements to an initialized split-findmin structure",
            ));
        }
        Ok(self.push_element(self.root, Payload::Position(position), cost, false))
    }

    /// Closes the list, decomposing it greedily from the tail so that any
    /// left-over singletons sit at the head.
    pub fn initialize_head(&mut self) -> Result<()> {
        self.initialize(Direction::Head)
    }

    /// Closes the list, decomposing it greedily from the head so that any
    /// left-over singletons sit at the tail.
    pub fn initialize_tail(&mut self) -> Result<()> {
        self.initialize(Direction::Tail)
    }

    fn initialize(&mut self, direction: Direction) -> Result<()> {
        if self.initialized {
            return Err(ThorupError::precondition_violation(
                "split-findmin structure is already initialized",
            ));
        }
        self.initialized = true;
        let root = self.root;
        self.initialize_list(root, direction);
        Ok(())
    }

    /// The caller-supplied position carried by `x`, if it is an outermost
    /// element.
    pub fn position(&self, x: ElementId) -> Option<usize> {
        match self.elements[x.0].payload {
            Payload::Position(p) => Some(p),
            Payload::Superelement(_) => None,
        }
    }

    /// Current cost of `x`.
    pub fn element_cost(&self, x: ElementId) -> u64 {
        self.elements[x.0].cost
    }

    /// Minimum cost held by list `l`.
    pub fn list_cost(&self, l: ListId) -> u64 {
        self.lists[l.0].cost
    }

    /// Minimum cost of the list currently enclosing `x`.
    pub fn element_list_cost(&self, x: ElementId) -> u64 {
        self.list_cost(self.list_of(x))
    }

    /// The list currently enclosing `x`.
    pub fn list_of(&self, x: ElementId) -> ListId {
        if let Some(list) = self.elements[x.0].containing_list {
            return list;
        }
        if let Some(se) = self.elements[x.0].superelement {
            if let Some(list) = self.supers[se.0].containing_list {
                return list;
            }
            if let Some(sublist) = self.supers[se.0].containing_sublist {
                if let Some(list) = self.lists[sublist.0].containing_list {
                    return list;
                }
                return sublist;
            }
        }
        self.root
    }

    /// The elements of list `l` in order.
    pub fn elements_in_list(&self, l: ListId) -> Vec<ElementId> {
        self.element_links.items(&self.lists[l.0].elements)
    }

    /// Lowers the cost of `x` to `min(c(x), new_cost)` and renews every cost
    /// aggregate on its containment chain. Returns the enclosing list.
    /// A `new_cost` above the current cost leaves all costs unchanged.
    pub fn decrease_cost(&mut self, x: ElementId, new_cost: u64) -> ListId {
        let cost = self.elements[x.0].cost.min(new_cost);
        self.elements[x.0].cost = cost;

        if let Some(list) = self.elements[x.0].containing_list {
            self.lists[list.0].cost = self.lists[list.0].cost.min(new_cost);
            return list;
        }
        if let Some(se) = self.elements[x.0].superelement {
            if let Some(list) = self.supers[se.0].containing_list {
                self.supers[se.0].cost = self.supers[se.0].cost.min(new_cost);
                self.lists[list.0].cost = self.lists[list.0].cost.min(new_cost);
                return list;
            }
            if let Some(carrier) = self.supers[se.0].sublist_element {
                let sublist = self.decrease_cost(carrier, new_cost);
                self.supers[se.0].cost = self.supers[se.0].cost.min(new_cost);
                if let Some(list) = self.lists[sublist.0].containing_list {
                    self.lists[list.0].cost = self.lists[list.0].cost.min(new_cost);
                    return list;
                }
                return sublist;
            }
        }
        self.root
    }

    /// Splits the enclosing list of `x` after `x`: the prefix up to and
    /// including `x` stays in place, the suffix is returned as a new list.
    /// Splitting at the last element returns an empty list.
    pub fn split(&mut self, x: ElementId) -> ListId {
        let first = self.list_of(x);
        let index = self.lists[first.0].index;
        let second = self.new_list(index);

        if let Some(sc) = self.elements[x.0].singleton_container {
            // x is a left-over singleton: every spine cuts at a unit boundary.
            let singles =
                self.element_links.cut_after(&mut self.lists[first.0].singleton_elements, sc);
            self.lists[second.0].singleton_elements = singles;
            let sse_boundary = self.preceding_singleton_superelement(x);
            let sses = self.cut_singleton_superelements_after(first, sse_boundary);
            self.lists[second.0].singleton_superelements = sses;
            let sublist_boundary = self.preceding_sublist(x);
            let sublists = self.cut_sublists_after(first, sublist_boundary);
            self.lists[second.0].sublists = sublists;
        } else if let Some(se) = self.elements[x.0].superelement {
            if self.supers[se.0].containing_list.is_some() {
                if self.supers[se.0].last == x {
                    // Last element of a singleton superelement: the unit
                    // boundary falls right after the superelement.
                    let singles_boundary = self.preceding_singleton_element(x);
                    let singles = self.cut_singleton_elements_after(first, singles_boundary);
                    self.lists[second.0].singleton_elements = singles;
                    let sses =
                        self.cut_singleton_superelements_after(first, self.supers[se.0].singleton_container);
                    self.lists[second.0].singleton_superelements = sses;
                    let sublist_boundary = self.preceding_sublist(x);
                    let sublists = self.cut_sublists_after(first, sublist_boundary);
                    self.lists[second.0].sublists = sublists;
                } else {
                    self.dismantle(first, second, se, x, DeadUnit::SingletonSuperelement);
                }
            } else if self.supers[se.0].containing_sublist.is_some() {
                // x sits inside a superelement grouped in a sublist: split
                // that sublist twice so the superelement stands alone.
                let home = self.isolate_superelement(first, se);
                if self.supers[se.0].last == x {
                    let singles_boundary = self.preceding_singleton_element(x);
                    let singles = self.cut_singleton_elements_after(first, singles_boundary);
                    self.lists[second.0].singleton_elements = singles;
                    let sse_boundary = self.preceding_singleton_superelement(x);
                    let sses = self.cut_singleton_superelements_after(first, sse_boundary);
                    self.lists[second.0].singleton_superelements = sses;
                    let sublists =
                        self.cut_sublists_after(first, self.lists[home.0].spine_container);
                    self.lists[second.0].sublists = sublists;
                } else {
                    self.dismantle(first, second, se, x, DeadUnit::Sublist(home));
                }
            }
        }

        let x_container = self.elements[x.0].container;
        let elements = self.element_links.cut_after(&mut self.lists[first.0].elements, x_container);
        self.lists[second.0].elements = elements;
        self.lists[second.0].containing_list = self.lists[first.0].containing_list;

        self.lists[first.0].cost = self.unit_cost_minimum(first);
        self.repoint_units(second);
        second
    }

    /// Splits `se`'s sublist so that `se` ends up the only superelement of a
    /// unit in `first`'s sublists spine, and returns that unit.
    fn isolate_superelement(&mut self, first: ListId, se: SuperelementId) -> ListId {
        let Some(sl) = self.supers[se.0].containing_sublist else {
            return first;
        };
        let Some(carrier) = self.supers[se.0].sublist_element else {
            return sl;
        };

        let tail_sublist = self.split(carrier);
        self.adopt_superelements(tail_sublist);

        let carrier_prev = self
            .element_links
            .prev(self.elements[carrier.0].container)
            .and_then(|c| self.element_links.item(c));
        let home = if let Some(prev_carrier) = carrier_prev {
            let lone = self.split(prev_carrier);
            self.adopt_superelements(lone);
            lone
        } else {
            sl
        };

        let mut anchor = match self.lists[sl.0].spine_container {
            Some(c) => c,
            None => self.lists[first.0].sublists.sentinel(),
        };
        if home != sl {
            anchor = self
                .sublist_links
                .insert_after(&mut self.lists[first.0].sublists, anchor, home);
            self.lists[home.0].containing_list = Some(first);
            self.lists[home.0].spine_container = Some(anchor);
        }
        let tail_container =
            self.sublist_links
                .insert_after(&mut self.lists[first.0].sublists, anchor, tail_sublist);
        self.lists[tail_sublist.0].containing_list = Some(first);
        self.lists[tail_sublist.0].spine_container = Some(tail_container);

        home
    }

    /// Points the superelements carried by `sublist`'s elements back at it.
    fn adopt_superelements(&mut self, sublist: ListId) {
        for carrier in self.elements_in_list(sublist) {
            if let Payload::Superelement(se) = self.elements[carrier.0].payload {
                self.supers[se.0].containing_sublist = Some(sublist);
            }
        }
    }

    /// Splits with `x` strictly inside superelement `se`: the superelement is
    /// dismantled, both severed element runs are re-decomposed, and the new
    /// units are spliced into the spines where the dead unit used to sit.
    fn dismantle(
        &mut self,
        first: ListId,
        second: ListId,
        se: SuperelementId,
        x: ElementId,
        dead: DeadUnit,
    ) {
        let singles_anchor = match self.preceding_singleton_element(x) {
            Some(c) => c,
            None => self.lists[first.0].singleton_elements.sentinel(),
        };
        let (sses_anchor, sublists_anchor) = match dead {
            DeadUnit::SingletonSuperelement => {
                let sses_anchor = match self.supers[se.0].singleton_container {
                    Some(c) => self
                        .superelement_links
                        .remove(&mut self.lists[first.0].singleton_superelements, c),
                    None => self.lists[first.0].singleton_superelements.sentinel(),
                };
                let sublists_anchor = match self.preceding_sublist(x) {
                    Some(c) => c,
                    None => self.lists[first.0].sublists.sentinel(),
                };
                (sses_anchor, sublists_anchor)
            }
            DeadUnit::Sublist(dead_list) => {
                let sses_anchor = match self.preceding_singleton_superelement(x) {
                    Some(c) => c,
                    None => self.lists[first.0].singleton_superelements.sentinel(),
                };
                let sublists_anchor = match self.lists[dead_list.0].spine_container {
                    Some(c) => self.sublist_links.remove(&mut self.lists[first.0].sublists, c),
                    None => self.lists[first.0].sublists.sentinel(),
                };
                (sses_anchor, sublists_anchor)
            }
        };

        // Re-decompose the head run, splice its units in, and cut each spine
        // right after the spliced stretch. A head pass starts at its
        // rightmost container, which is x itself.
        let head_first = self.elements[self.supers[se.0].first.0].container;
        let x_container = self.elements[x.0].container;
        let head_count = self.range_length(head_first, x_container);
        let (h_singles, h_sses, h_sublists) =
            self.decompose_range(first, x_container, head_count, Direction::Head);

        let singles_boundary = self.element_links.insert_list(
            &mut self.lists[first.0].singleton_elements,
            singles_anchor,
            h_singles,
        );
        let sses_boundary = self.superelement_links.insert_list(
            &mut self.lists[first.0].singleton_superelements,
            sses_anchor,
            h_sses,
        );
        let sublists_boundary = self.sublist_links.insert_list(
            &mut self.lists[first.0].sublists,
            sublists_anchor,
            h_sublists,
        );

        let mut singles = self
            .element_links
            .cut_after(&mut self.lists[first.0].singleton_elements, singles_boundary);
        let mut sses = self
            .superelement_links
            .cut_after(&mut self.lists[first.0].singleton_superelements, sses_boundary);
        let mut sublists = self
            .sublist_links
            .cut_after(&mut self.lists[first.0].sublists, sublists_boundary);

        // Re-decompose the tail run and put its units in front of the cut-off
        // spines.
        if let Some(tail_first) = self.element_links.next(x_container) {
            let tail_last = self.elements[self.supers[se.0].last.0].container;
            let tail_count = self.range_length(tail_first, tail_last);
            let (mut t_singles, mut t_sses, mut t_sublists) =
                self.decompose_range(first, tail_first, tail_count, Direction::Tail);
            self.element_links.extend(&mut t_singles, singles);
            singles = t_singles;
            self.superelement_links.extend(&mut t_sses, sses);
            sses = t_sses;
            self.sublist_links.extend(&mut t_sublists, sublists);
            sublists = t_sublists;
        }

        self.lists[second.0].singleton_elements = singles;
        self.lists[second.0].singleton_superelements = sses;
        self.lists[second.0].sublists = sublists;
    }

    /// Number of containers from `from` to `to` inclusive.
    fn range_length(&self, from: ContainerId, to: ContainerId) -> usize {
        let mut n = 1;
        let mut current = from;
        while current != to {
            match self.element_links.next(current) {
                Some(c) => current = c,
                None => break,
            }
            n += 1;
        }
        n
    }

    /// Decomposes `size` elements starting at `start` (the leftmost container
    /// for `Tail`, the rightmost for `Head`) into fresh unit spines without
    /// touching the elements spine itself. New sublists are initialized
    /// recursively in the same direction.
    fn decompose_range(
        &mut self,
        list: ListId,
        start: ContainerId,
        size: usize,
        direction: Direction,
    ) -> (ListHandle, ListHandle, ListHandle) {
        let list_index = self.lists[list.0].index;
        let mut singles = self.element_links.new_list();
        let mut sses = self.superelement_links.new_list();
        let mut sublists = self.sublist_links.new_list();

        let mut remaining = size;
        let mut cursor = Some(start);
        let mut run: Vec<SuperelementId> = Vec::new();

        while remaining > 3 {
            let level = self.ackermann.get_inverse(list_index, remaining as u64);
            let width = 2 * self.ackermann.get_value(list_index, level).unwrap_or(2) as usize;

            let se = SuperelementId(self.supers.len());
            self.supers.push(SuperelementNode {
                level,
                first: ElementId(0),
                last: ElementId(0),
                cost: INFINITE_COST,
                containing_list: None,
                singleton_container: None,
                containing_sublist: None,
                sublist_element: None,
            });

            let mut entry_elem = None;
            let mut edge_elem = None;
            for _ in 0..width {
                let Some(current) = cursor else { break };
                let Some(elem) = self.element_links.item(current) else {
                    break;
                };
                self.elements[elem.0].superelement = Some(se);
                self.elements[elem.0].containing_list = None;
                self.elements[elem.0].singleton_container = None;
                self.supers[se.0].cost = self.supers[se.0].cost.min(self.elements[elem.0].cost);
                if entry_elem.is_none() {
                    entry_elem = Some(elem);
                }
                edge_elem = Some(elem);
                cursor = self.step(current, direction);
            }
            if let (Some(entry), Some(edge)) = (entry_elem, edge_elem) {
                match direction {
                    Direction::Head => {
                        self.supers[se.0].last = entry;
                        self.supers[se.0].first = edge;
                    }
                    Direction::Tail => {
                        self.supers[se.0].first = entry;
                        self.supers[se.0].last = edge;
                    }
                }
            }

            if let Some(&previous) = run.last() {
                if self.supers[previous.0].level != level {
                    let finished = std::mem::take(&mut run);
                    self.flush_run(list, list_index, finished, direction, &mut sses, &mut sublists);
                }
            }
            run.push(se);
            remaining = remaining.saturating_sub(width);
        }
        if !run.is_empty() {
            let finished = std::mem::take(&mut run);
            self.flush_run(list, list_index, finished, direction, &mut sses, &mut sublists);
        }

        for _ in 0..remaining {
            let Some(current) = cursor else { break };
            let Some(elem) = self.element_links.item(current) else {
                break;
            };
            let container = match direction {
                Direction::Head => self.element_links.append_first(&mut singles, elem),
                Direction::Tail => self.element_links.append(&mut singles, elem),
            };
            self.elements[elem.0].superelement = None;
            self.elements[elem.0].containing_list = Some(list);
            self.elements[elem.0].singleton_container = Some(container);
            cursor = self.step(current, direction);
        }

        (singles, sses, sublists)
    }

    fn step(&self, current: ContainerId, direction: Direction) -> Option<ContainerId> {
        match direction {
            Direction::Head => self.element_links.prev(current),
            Direction::Tail => self.element_links.next(current),
        }
    }

    /// Turns a finished run of same-level superelements into a unit: a
    /// singleton superelement for a run of one, otherwise a sublist of index
    /// `i - 1` carrying the run.
    fn flush_run(
        &mut self,
        list: ListId,
        list_index: i64,
        run: Vec<SuperelementId>,
        direction: Direction,
        sses: &mut ListHandle,
        sublists: &mut ListHandle,
    ) {
        if run.len() == 1 {
            let se = run[0];
            let container = match direction {
                Direction::Head => self.superelement_links.append_first(sses, se),
                Direction::Tail => self.superelement_links.append(sses, se),
            };
            let node = &mut self.supers[se.0];
            node.containing_list = Some(list);
            node.singleton_container = Some(container);
            node.containing_sublist = None;
            node.sublist_element = None;
            return;
        }

        let sublist = self.new_list(list_index - 1);
        let in_order: Vec<SuperelementId> = match direction {
            // A head pass collects superelements right to left.
            Direction::Head => run.into_iter().rev().collect(),
            Direction::Tail => run,
        };
        for se in in_order {
            let cost = self.supers[se.0].cost;
            let carrier = self.push_element(sublist, Payload::Superelement(se), cost, true);
            let node = &mut self.supers[se.0];
            node.sublist_element = Some(carrier);
            node.containing_sublist = Some(sublist);
            node.containing_list = None;
            node.singleton_container = None;
        }
        let container = match direction {
            Direction::Head => self.sublist_links.append_first(sublists, sublist),
            Direction::Tail => self.sublist_links.append(sublists, sublist),
        };
        self.lists[sublist.0].containing_list = Some(list);
        self.lists[sublist.0].spine_container = Some(container);
        self.initialize_list(sublist, direction);
    }

    /// Decomposes the whole elements spine of `list` and installs the
    /// resulting unit spines.
    fn initialize_list(&mut self, list: ListId, direction: Direction) {
        let size = self.elements_in_list(list).len();
        if size == 0 {
            self.lists[list.0].cost = INFINITE_COST;
            return;
        }
        let start = match direction {
            Direction::Head => self.lists[list.0].elements.last(),
            Direction::Tail => match self.element_links.first(&self.lists[list.0].elements) {
                Some(c) => c,
                None => return,
            },
        };
        let (singles, sses, sublists) = self.decompose_range(list, start, size, direction);
        self.lists[list.0].singleton_elements = singles;
        self.lists[list.0].singleton_superelements = sses;
        self.lists[list.0].sublists = sublists;
        self.lists[list.0].cost = self.unit_cost_minimum(list);
    }

    /// Minimum cost over the units of `list`.
    fn unit_cost_minimum(&self, list: ListId) -> u64 {
        let mut cost = INFINITE_COST;
        for e in self
            .element_links
            .items(&self.lists[list.0].singleton_elements)
        {
            cost = cost.min(self.elements[e.0].cost);
        }
        for se in self
            .superelement_links
            .items(&self.lists[list.0].singleton_superelements)
        {
            cost = cost.min(self.supers[se.0].cost);
        }
        for sub in self.sublist_links.items(&self.lists[list.0].sublists) {
            cost = cost.min(self.lists[sub.0].cost);
        }
        cost
    }

    /// Points every unit of `list` back at it and recomputes its cost.
    fn repoint_units(&mut self, list: ListId) {
        let mut cost = INFINITE_COST;
        for e in self
            .element_links
            .items(&self.lists[list.0].singleton_elements)
        {
            self.elements[e.0].containing_list = Some(list);
            cost = cost.min(self.elements[e.0].cost);
        }
        for se in self
            .superelement_links
            .items(&self.lists[list.0].singleton_superelements)
        {
            self.supers[se.0].containing_list = Some(list);
            cost = cost.min(self.supers[se.0].cost);
        }
        for sub in self.sublist_links.items(&self.lists[list.0].sublists) {
            self.lists[sub.0].containing_list = Some(list);
            cost = cost.min(self.lists[sub.0].cost);
        }
        self.lists[list.0].cost = cost;
    }

    /// Nearest left-over singleton before `x` in its elements spine.
    fn preceding_singleton_element(&self, x: ElementId) -> Option<ContainerId> {
        let mut cursor = self.element_links.prev(self.elements[x.0].container);
        while let Some(current) = cursor {
            let elem = self.element_links.item(current)?;
            if self.elements[elem.0].containing_list.is_some() {
                return self.elements[elem.0].singleton_container;
            }
            cursor = self.element_links.prev(current);
        }
        None
    }

    /// Nearest element before `x` covered by a singleton superelement.
    fn preceding_singleton_superelement(&self, x: ElementId) -> Option<ContainerId> {
        let mut cursor = self.element_links.prev(self.elements[x.0].container);
        while let Some(current) = cursor {
            let elem = self.element_links.item(current)?;
            if let Some(se) = self.elements[elem.0].superelement {
                if self.supers[se.0].containing_list.is_some() {
                    return self.supers[se.0].singleton_container;
                }
            }
            cursor = self.element_links.prev(current);
        }
        None
    }

    /// Nearest element before `x` covered by a superelement grouped in a
    /// sublist.
    fn preceding_sublist(&self, x: ElementId) -> Option<ContainerId> {
        let mut cursor = self.element_links.prev(self.elements[x.0].container);
        while let Some(current) = cursor {
            let elem = self.element_links.item(current)?;
            if let Some(se) = self.elements[elem.0].superelement {
                if let Some(sublist) = self.supers[se.0].containing_sublist {
                    return self.lists[sublist.0].spine_container;
                }
            }
            cursor = self.element_links.prev(current);
        }
        None
    }

    fn cut_singleton_elements_after(
        &mut self,
        list: ListId,
        boundary: Option<ContainerId>,
    ) -> ListHandle {
        let at = boundary.unwrap_or_else(|| self.lists[list.0].singleton_elements.sentinel());
        self.element_links
            .cut_after(&mut self.lists[list.0].singleton_elements, at)
    }

    fn cut_singleton_superelements_after(
        &mut self,
        list: ListId,
        boundary: Option<ContainerId>,
    ) -> ListHandle {
        let at = boundary.unwrap_or_else(|| self.lists[list.0].singleton_superelements.sentinel());
        self.superelement_links
            .cut_after(&mut self.lists[list.0].singleton_superelements, at)
    }

    fn cut_sublists_after(&mut self, list: ListId, boundary: Option<ContainerId>) -> ListHandle {
        let at = boundary.unwrap_or_else(|| self.lists[list.0].sublists.sentinel());
        self.sublist_links
            .cut_after(&mut self.lists[list.0].sublists, at)
    }
}
