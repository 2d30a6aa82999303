//! Account storage seam.
//!
//! The ledger owns committed account bytes; the state machine only needs to
//! fetch them and to commit a whole new image in one write.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::StoreError;
use crate::key::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitMode {
    /// Fails with `AccountInUse` if the account already holds data.
    CreateNew,
    /// Fails with `AccountMissing` if the account holds no data, and with
    /// `Conflict` if its bytes are no longer `expected`.
    Overwrite { expected: Vec<u8> },
}

pub trait AccountStore: Send + Sync {
    fn fetch(&self, address: &Address) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replaces the account's bytes atomically, subject to `mode`.
    fn commit(&self, address: &Address, data: Vec<u8>, mode: CommitMode)
        -> Result<(), StoreError>;
}

impl<T: AccountStore + ?Sized> AccountStore for &T {
    fn fetch(&self, address: &Address) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).fetch(address)
    }
    fn commit(&self, address: &Address, data: Vec<u8>, mode: CommitMode) -> Result<(), StoreError> {
        (**self).commit(address, data, mode)
    }
}

impl<T: AccountStore + ?Sized> AccountStore for Arc<T> {
    fn fetch(&self, address: &Address) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).fetch(address)
    }
    fn commit(&self, address: &Address, data: Vec<u8>, mode: CommitMode) -> Result<(), StoreError> {
        (**self).commit(address, data, mode)
    }
}

/// In-memory ledger state for tests and local replay.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<Address, Vec<u8>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let accounts = self.accounts.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(accounts.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl AccountStore for InMemoryAccountStore {
    fn fetch(&self, address: &Address) -> Result<Option<Vec<u8>>, StoreError> {
        let accounts = self.accounts.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(accounts.get(address).cloned())
    }

    fn commit(&self, address: &Address, data: Vec<u8>, mode: CommitMode) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().map_err(|_| StoreError::LockPoisoned)?;
        match (&mode, accounts.get(address)) {
            (CommitMode::CreateNew, Some(_)) => {
                return Err(StoreError::AccountInUse { address: *address })
            }
            (CommitMode::Overwrite { .. }, None) => {
                return Err(StoreError::AccountMissing { address: *address })
            }
            (CommitMode::Overwrite { expected }, Some(current)) if current != expected => {
                return Err(StoreError::Conflict { address: *address })
            }
            _ => {}
        }
        accounts.insert(*address, data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_new_refuses_occupied_account() {
        let store = InMemoryAccountStore::new();
        let a = Address::new([1; 32]);
        store.commit(&a, vec![1], CommitMode::CreateNew).unwrap();
        assert_eq!(
            store.commit(&a, vec![2], CommitMode::CreateNew),
            Err(StoreError::AccountInUse { address: a })
        );
        assert_eq!(store.fetch(&a).unwrap(), Some(vec![1]));
    }

    #[test]
    fn overwrite_requires_existing_account() {
        let store = InMemoryAccountStore::new();
        let a = Address::new([2; 32]);
        assert_eq!(
            store.commit(&a, vec![1], CommitMode::Overwrite { expected: vec![] }),
            Err(StoreError::AccountMissing { address: a })
        );
        assert!(store.is_empty().unwrap());
        store.commit(&a, vec![1], CommitMode::CreateNew).unwrap();
        store.commit(&a, vec![3, 4], CommitMode::Overwrite { expected: vec![1] }).unwrap();
        assert_eq!(store.fetch(&a).unwrap(), Some(vec![3, 4]));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn stale_overwrite_is_a_conflict() {
        let store = InMemoryAccountStore::new();
        let a = Address::new([4; 32]);
        store.commit(&a, vec![1], CommitMode::CreateNew).unwrap();
        store.commit(&a, vec![2], CommitMode::Overwrite { expected: vec![1] }).unwrap();

        // A writer that read [1] before the commit above must not clobber [2].
        assert_eq!(
            store.commit(&a, vec![9], CommitMode::Overwrite { expected: vec![1] }),
            Err(StoreError::Conflict { address: a })
        );
        assert_eq!(store.fetch(&a).unwrap(), Some(vec![2]));
    }

    #[test]
    fn poisoned_lock_surfaces_from_len() {
        let store = Arc::new(InMemoryAccountStore::new());
        let s = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = s.accounts.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert_eq!(store.len(), Err(StoreError::LockPoisoned));
        assert_eq!(store.is_empty(), Err(StoreError::LockPoisoned));
        assert_eq!(store.fetch(&Address::default()), Err(StoreError::LockPoisoned));
    }

    #[test]
    fn shared_handles_see_the_same_accounts() {
        let store = Arc::new(InMemoryAccountStore::new());
        let a = Address::new([3; 32]);
        let writer = Arc::clone(&store);
        writer.commit(&a, vec![7], CommitMode::CreateNew).unwrap();
        assert_eq!((&*store).fetch(&a).unwrap(), Some(vec![7]));
    }
}
