//! Read path: committed account bytes to typed records. Never mutates.

use crate::address::{AddressDeriver, AddressSpace};
use crate::error::{DecodeError, FavoritesError, Result};
use crate::key::{Address, Identity};
use crate::record::Record;
use crate::store::AccountStore;

#[derive(Debug, Clone)]
pub struct RecordAccessor<S> {
    store: S,
}

impl<S: AccountStore> RecordAccessor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn read(&self, address: &Address) -> Result<Record> {
        let data = self
            .store
            .fetch(address)?
            .ok_or(FavoritesError::NotFound { address: *address })?;
        Ok(Self::decode(&data)?)
    }

    /// Derives the owner's address, then reads it.
    pub fn read_for<A: AddressSpace>(
        &self,
        deriver: &AddressDeriver<A>,
        owner: &Identity,
    ) -> Result<Record> {
        let derived = deriver.derive_for(owner)?;
        self.read(&derived.address)
    }

    pub fn decode(data: &[u8]) -> Result<Record, DecodeError> {
        Record::decode(data)
    }
}
