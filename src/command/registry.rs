//! Name → command table.
//!
//! Fixed capacity, insertion-ordered (so `help` lists commands in the order
//! they were registered). Registering a name that already exists replaces
//! the handler in place. Names are matched exactly; there is no case
//! folding.
//!
//! The table is only mutated at start-up and by the `add` built-in, both of
//! which run on the executor thread, so a `RefCell` is all the locking it
//! needs. No borrow is ever held across an `.await`.

use core::cell::RefCell;
use std::rc::Rc;

use heapless::FnvIndexMap;
use log::info;

use crate::error::{Error, Result};

use super::Command;

/// Maximum number of registered names (power of two for the index map).
pub const MAX_COMMANDS: usize = 32;

/// One registry entry.
#[derive(Clone)]
pub struct CommandRecord {
    pub handler: Rc<dyn Command>,
    pub help: &'static str,
    pub config_help: &'static str,
}

impl CommandRecord {
    fn new(handler: Rc<dyn Command>) -> Self {
        Self {
            help: handler.help(),
            config_help: handler.config_help(),
            handler,
        }
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    table: RefCell<FnvIndexMap<String, CommandRecord, MAX_COMMANDS>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace `name`.
    pub fn register(&self, name: &str, handler: Rc<dyn Command>) -> Result<()> {
        let record = CommandRecord::new(handler);
        let mut table = self.table.borrow_mut();
        match table.insert(name.to_owned(), record) {
            Ok(None) => info!("registered command '{}'", name),
            Ok(Some(_)) => info!("replaced command '{}'", name),
            Err(_) => return Err(Error::RegistryFull),
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Rc<dyn Command>> {
        self.table.borrow().get(name).map(|r| Rc::clone(&r.handler))
    }

    pub fn record(&self, name: &str) -> Option<CommandRecord> {
        self.table.borrow().get(name).cloned()
    }

    /// Snapshot of every entry in registration order.
    pub fn records(&self) -> Vec<(String, CommandRecord)> {
        self.table
            .borrow()
            .iter()
            .map(|(name, record)| (name.clone(), record.clone()))
            .collect()
    }

    /// Registered name of a handler instance, if it is in the table.
    pub fn name_of(&self, handler: &Rc<dyn Command>) -> Option<String> {
        self.table
            .borrow()
            .iter()
            .find(|(_, r)| Rc::ptr_eq(&r.handler, handler))
            .map(|(name, _)| name.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }
}
