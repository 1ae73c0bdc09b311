// ============================================================================
// Order Book Domain Model
// Placement-ordered order storage owned by the account
// ============================================================================

use std::collections::{BTreeMap, HashMap};

use super::{Order, OrderId};

/// All orders of one account, keyed by id and iterated in placement order.
///
/// Placement order makes evaluation deterministic across replays: when two
/// orders compete for the same budget at one tick, the earlier one wins.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    /// Orders keyed by their placement sequence number
    entries: BTreeMap<u64, Order>,

    /// Order index for id lookups (cancellation, execution)
    index: HashMap<OrderId, u64>,

    /// Next placement sequence number
    next_sequence: u64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.index.get(id).and_then(|seq| self.entries.get(seq))
    }

    /// Orders in placement order, settled ones included
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.entries.values()
    }

    /// Orders still subject to evaluation
    pub fn live(&self) -> impl Iterator<Item = &Order> {
        self.iter().filter(|order| !order.is_settled())
    }

    pub fn settled(&self) -> impl Iterator<Item = &Order> {
        self.iter().filter(|order| order.is_settled())
    }

    /// Ids of the live orders at this instant, in placement order
    pub fn live_ids(&self) -> Vec<OrderId> {
        self.live().map(|order| order.id).collect()
    }

    pub(crate) fn get_mut(&mut self, id: &OrderId) -> Option<&mut Order> {
        match self.index.get(id) {
            Some(seq) => self.entries.get_mut(seq),
            None => None,
        }
    }

    pub(crate) fn insert(&mut self, order: Order) -> OrderId {
        let id = order.id;
        let seq = self.next_sequence;
        self.next_sequence += 1;

        self.entries.insert(seq, order);
        self.index.insert(id, seq);
        id
    }

    pub(crate) fn remove(&mut self, id: &OrderId) -> Option<Order> {
        let seq = self.index.remove(id)?;
        self.entries.remove(&seq)
    }
}

impl<'a> IntoIterator for &'a OrderBook {
    type Item = &'a Order;
    type IntoIter = std::collections::btree_map::Values<'a, u64, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    #[test]
    fn test_placement_order_preserved() {
        let mut book = OrderBook::new();
        let ids: Vec<OrderId> = (0..10)
            .map(|i| {
                let limit = dec!(100) - rust_decimal::Decimal::from(i);
                book.insert(Order::limit(Side::Buy, dec!(1), limit))
            })
            .collect();

        let iterated: Vec<OrderId> = book.iter().map(|o| o.id).collect();
        assert_eq!(iterated, ids);
        assert_eq!(book.live_ids(), ids);
    }

    #[test]
    fn test_remove_and_lookup() {
        let mut book = OrderBook::new();
        let a = book.insert(Order::market(Side::Buy, dec!(1)));
        let b = book.insert(Order::market(Side::Sell, dec!(2)));

        assert!(book.contains(&a));
        assert_eq!(book.remove(&a).map(|o| o.id), Some(a));
        assert!(!book.contains(&a));
        assert!(book.remove(&a).is_none());
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(&b).map(|o| o.volume), Some(dec!(2)));
    }

    #[test]
    fn test_live_excludes_settled() {
        let mut book = OrderBook::new();
        let a = book.insert(Order::market(Side::Buy, dec!(1)));
        let b = book.insert(Order::market(Side::Buy, dec!(1)));

        let ts = DateTime::from_timestamp(0, 0).unwrap();
        book.get_mut(&a).unwrap().settle(dec!(10), ts).unwrap();

        assert_eq!(book.live_ids(), vec![b]);
        assert_eq!(book.settled().count(), 1);
        assert_eq!(book.len(), 2);
    }
}
