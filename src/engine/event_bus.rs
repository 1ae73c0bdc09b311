// ============================================================================
// Event Bus
// Synchronous publish/subscribe registry for price updates
// ============================================================================

use crate::domain::Account;
use crate::errors::EnvironmentError;
use crate::interfaces::Strategy;
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Event fired once per tick with the closing price
pub const UPDATE_EVENT: &str = "update";

/// Handle returned by [`EventBus::bind`], used to unbind later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallbackId(u64);

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type Callback = Box<dyn FnMut(Decimal, &mut Account)>;

/// Event name to ordered callback list.
///
/// Dispatch is synchronous: every callback finishes before the next one
/// starts, in the order they were bound.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<String, Vec<(CallbackId, Callback)>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback to `event`
    pub fn bind<F>(&mut self, event: impl Into<String>, callback: F) -> CallbackId
    where
        F: FnMut(Decimal, &mut Account) + 'static,
    {
        let id = CallbackId(self.next_id);
        self.next_id += 1;

        let event = event.into();
        tracing::debug!(%id, event = %event, "callback bound");
        self.handlers
            .entry(event)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Bind a shared strategy; the caller keeps its handle to inspect state
    pub fn bind_strategy<S>(&mut self, event: impl Into<String>, strategy: Rc<RefCell<S>>) -> CallbackId
    where
        S: Strategy + 'static,
    {
        self.bind(event, move |price, account| {
            strategy.borrow_mut().update(price, account)
        })
    }

    /// Remove a previously bound callback
    pub fn unbind(&mut self, event: &str, id: CallbackId) -> Result<(), EnvironmentError> {
        let not_found = || EnvironmentError::CallbackNotFound {
            event: event.to_string(),
            callback: id,
        };

        let callbacks = self.handlers.get_mut(event).ok_or_else(not_found)?;
        let position = callbacks
            .iter()
            .position(|(bound, _)| *bound == id)
            .ok_or_else(not_found)?;

        callbacks.remove(position);
        tracing::debug!(%id, event, "callback unbound");
        Ok(())
    }

    /// Invoke every callback bound to `event`. Returns how many ran.
    pub fn publish(&mut self, event: &str, price: Decimal, account: &mut Account) -> usize {
        match self.handlers.get_mut(event) {
            Some(callbacks) => {
                for (_, callback) in callbacks.iter_mut() {
                    callback(price, account);
                }
                callbacks.len()
            },
            None => 0,
        }
    }

    pub fn callback_count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(event, callbacks)| (event.as_str(), callbacks.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("callbacks", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account() -> Account {
        Account::new("SOL", dec!(100), dec!(0), dec!(0))
    }

    #[test]
    fn test_publish_in_registration_order() {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            bus.bind(UPDATE_EVENT, move |price, _: &mut Account| {
                log.borrow_mut().push((tag, price))
            });
        }

        let ran = bus.publish(UPDATE_EVENT, dec!(42), &mut account());
        assert_eq!(ran, 3);
        assert_eq!(
            *log.borrow(),
            vec![("first", dec!(42)), ("second", dec!(42)), ("third", dec!(42))]
        );
    }

    #[test]
    fn test_unbind() {
        let mut bus = EventBus::new();
        let calls = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&calls);
        let id = bus.bind(UPDATE_EVENT, move |_, _: &mut Account| *counter.borrow_mut() += 1);
        assert_eq!(bus.callback_count(UPDATE_EVENT), 1);

        bus.unbind(UPDATE_EVENT, id).unwrap();
        bus.publish(UPDATE_EVENT, dec!(1), &mut account());
        assert_eq!(*calls.borrow(), 0);

        assert_eq!(
            bus.unbind(UPDATE_EVENT, id),
            Err(EnvironmentError::CallbackNotFound {
                event: UPDATE_EVENT.to_string(),
                callback: id,
            })
        );
        assert!(bus.unbind("unknown", id).is_err());
    }

    #[test]
    fn test_callbacks_mutate_account() {
        let mut bus = EventBus::new();
        bus.bind(UPDATE_EVENT, |_, account: &mut Account| {
            account.place_market_buy(dec!(1));
        });

        let mut account = account();
        bus.publish(UPDATE_EVENT, dec!(10), &mut account);
        bus.publish("other", dec!(10), &mut account);
        assert_eq!(account.orders().len(), 1);
    }

    #[test]
    fn test_bind_strategy_keeps_shared_state() {
        struct Recorder(Vec<Decimal>);

        impl Strategy for Recorder {
            fn update(&mut self, price: Decimal, _account: &mut Account) {
                self.0.push(price);
            }
        }

        let mut bus = EventBus::new();
        let strategy = Rc::new(RefCell::new(Recorder(Vec::new())));
        bus.bind_strategy(UPDATE_EVENT, Rc::clone(&strategy));

        let mut account = account();
        bus.publish(UPDATE_EVENT, dec!(1), &mut account);
        bus.publish(UPDATE_EVENT, dec!(2), &mut account);
        assert_eq!(strategy.borrow().0, vec![dec!(1), dec!(2)]);
    }
}
