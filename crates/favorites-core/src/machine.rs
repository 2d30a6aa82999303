//! Favorites state machine: Absent -> Present, Present -> Present.
//!
//! create: authority == owner, color fits, account Absent. Persists {owner, number, color}.
//! update: account Present, authority == stored owner, new color fits. Overwrites
//! only the fields set in the request.
//!
//! A transition validates and encodes the full next image before its single
//! commit, so a rejected transition leaves the store untouched.

use tracing::{debug, info, warn};

use crate::accessor::RecordAccessor;
use crate::address::{AddressDeriver, AddressSpace};
use crate::config::FavoritesConfig;
use crate::error::{FavoritesError, Result, StoreError};
use crate::instruction::{Transition, TransitionId, TransitionReceipt};
use crate::key::{Address, Identity};
use crate::record::{validate_color, FieldUpdate, Record};
use crate::store::{AccountStore, CommitMode};

pub struct FavoritesStateMachine<S, A> {
    store: S,
    deriver: AddressDeriver<A>,
    max_color_len: usize,
}

impl<S: AccountStore, A: AddressSpace> FavoritesStateMachine<S, A> {
    pub fn new(store: S, space: A, config: &FavoritesConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            deriver: AddressDeriver::new(space, config),
            max_color_len: config.max_color_len,
        })
    }

    pub fn deriver(&self) -> &AddressDeriver<A> {
        &self.deriver
    }

    pub fn accessor(&self) -> RecordAccessor<&S> {
        RecordAccessor::new(&self.store)
    }

    pub fn address_of(&self, owner: &Identity) -> Result<Address> {
        Ok(self.deriver.derive_for(owner)?.address)
    }

    /// Applies `transition` as signed by `authority`.
    pub fn submit(&self, transition: Transition, authority: &Identity) -> Result<TransitionReceipt> {
        let address = self.address_of(transition.owner())?;
        let data = transition.instruction_data();
        let prior = self.store.fetch(&address)?;
        let id = TransitionId::compute(&data, authority, prior.as_deref());

        let record = match transition {
            Transition::Create { owner, number, color } => {
                self.create(authority, &owner, number, color)?
            }
            Transition::Update { owner, number, color } => {
                self.update(authority, &owner, number, color)?
            }
        };
        Ok(TransitionReceipt { id, address, record })
    }

    pub fn create(
        &self,
        authority: &Identity,
        owner: &Identity,
        number: u64,
        color: String,
    ) -> Result<Record> {
        if authority != owner {
            warn!(%owner, %authority, "create rejected: signer is not the owner");
            return Err(FavoritesError::Unauthorized { expected: *owner, actual: *authority });
        }
        validate_color(&color, self.max_color_len)?;

        let address = self.address_of(owner)?;
        let record = Record { owner: *owner, number, color };
        match self.store.commit(&address, record.encode(), CommitMode::CreateNew) {
            Ok(()) => {}
            Err(StoreError::AccountInUse { address }) => {
                warn!(%owner, %address, "create rejected: favorites already set");
                return Err(FavoritesError::AlreadyExists { address });
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            %owner, %address, number = record.number, color = %record.color,
            "favorites created"
        );
        Ok(record)
    }

    pub fn update(
        &self,
        authority: &Identity,
        owner: &Identity,
        number: FieldUpdate<u64>,
        color: FieldUpdate<String>,
    ) -> Result<Record> {
        let address = self.address_of(owner)?;
        let prior = self
            .store
            .fetch(&address)?
            .ok_or(FavoritesError::NotFound { address })?;
        let mut record = Record::decode(&prior)?;

        if record.owner != *authority {
            warn!(%address, %authority, "update rejected: signer is not the owner");
            return Err(FavoritesError::Unauthorized {
                expected: record.owner,
                actual: *authority,
            });
        }
        if let FieldUpdate::SetTo(c) = &color {
            validate_color(c, self.max_color_len)?;
        }

        if number.is_keep() && color.is_keep() {
            debug!(%address, "update carries no fields");
            return Ok(record);
        }

        if let FieldUpdate::SetTo(n) = number {
            debug!(%address, number = n, "updating number");
            record.number = n;
        }
        if let FieldUpdate::SetTo(c) = color {
            debug!(%address, color = %c, "updating color");
            record.color = c;
        }

        // Compare-and-swap against the bytes read above; a concurrent writer
        // turns this into a Conflict instead of a lost update.
        self.store.commit(&address, record.encode(), CommitMode::Overwrite { expected: prior })?;
        info!(%address, number = record.number, color = %record.color, "favorites updated");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::UnconstrainedAddressSpace;
    use crate::error::ErrorKind;
    use crate::record::MAX_COLOR_LEN;
    use crate::store::InMemoryAccountStore;
    use std::sync::{Arc, Mutex};

    type Machine = FavoritesStateMachine<InMemoryAccountStore, UnconstrainedAddressSpace>;

    fn machine() -> Machine {
        FavoritesStateMachine::new(
            InMemoryAccountStore::new(),
            UnconstrainedAddressSpace,
            &FavoritesConfig::default(),
        )
        .unwrap()
    }

    fn user(b: u8) -> Identity {
        Identity::new([b; 32])
    }

    fn stored(m: &Machine, owner: &Identity) -> Record {
        m.accessor().read(&m.address_of(owner).unwrap()).unwrap()
    }

    #[test]
    fn create_persists_owner_and_fields() {
        let m = machine();
        let r = m.create(&user(1), &user(1), 23, "red".into()).unwrap();
        assert_eq!(r, Record { owner: user(1), number: 23, color: "red".into() });
        assert_eq!(stored(&m, &user(1)), r);
    }

    #[test]
    fn create_by_someone_else_is_unauthorized() {
        let m = machine();
        let err = m.create(&user(2), &user(1), 1, "red".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let at = m.address_of(&user(1)).unwrap();
        assert_eq!(m.accessor().read(&at).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn second_create_keeps_first_values() {
        let m = machine();
        m.create(&user(1), &user(1), 42, "blue".into()).unwrap();
        let err = m.create(&user(1), &user(1), 7, "pink".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(stored(&m, &user(1)).number, 42);
        assert_eq!(stored(&m, &user(1)).color, "blue");
    }

    #[test]
    fn partial_updates_leave_other_field_alone() {
        let m = machine();
        m.create(&user(1), &user(1), 42, "blue".into()).unwrap();

        let r = m.update(&user(1), &user(1), FieldUpdate::SetTo(99), FieldUpdate::Keep).unwrap();
        assert_eq!((r.number, r.color.as_str()), (99, "blue"));

        let r = m
            .update(&user(1), &user(1), FieldUpdate::Keep, FieldUpdate::SetTo("green".into()))
            .unwrap();
        assert_eq!((r.number, r.color.as_str()), (99, "green"));
        assert_eq!(stored(&m, &user(1)), r);
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let m = machine();
        let before = m.create(&user(1), &user(1), 5, "red".into()).unwrap();
        let after = m.update(&user(1), &user(1), FieldUpdate::Keep, FieldUpdate::Keep).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn update_by_non_owner_is_unauthorized() {
        let m = machine();
        m.create(&user(1), &user(1), 5, "red".into()).unwrap();
        let err = m
            .update(&user(9), &user(1), FieldUpdate::SetTo(6), FieldUpdate::Keep)
            .unwrap_err();
        assert!(matches!(
            err,
            FavoritesError::Unauthorized { expected, actual } if expected == user(1) && actual == user(9)
        ));
        assert_eq!(stored(&m, &user(1)).number, 5);
    }

    #[test]
    fn update_without_record_is_not_found() {
        let m = machine();
        let err = m.update(&user(3), &user(3), FieldUpdate::SetTo(1), FieldUpdate::Keep).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn oversized_color_is_rejected_without_side_effects() {
        let m = machine();
        let long = "c".repeat(MAX_COLOR_LEN + 1);
        let err = m.create(&user(1), &user(1), 1, long.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        m.create(&user(1), &user(1), 1, "red".into()).unwrap();
        let err = m
            .update(&user(1), &user(1), FieldUpdate::SetTo(2), FieldUpdate::SetTo(long))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        // number was valid but must not have been applied
        assert_eq!(stored(&m, &user(1)).number, 1);
    }

    #[test]
    fn configured_bound_is_tighter_than_account_capacity() {
        let cfg = FavoritesConfig { max_color_len: 4, ..Default::default() };
        let m = FavoritesStateMachine::new(InMemoryAccountStore::new(), UnconstrainedAddressSpace, &cfg)
            .unwrap();
        assert!(m.create(&user(1), &user(1), 1, "green".into()).is_err());
        assert!(m.create(&user(1), &user(1), 1, "blue".into()).is_ok());
    }

    #[test]
    fn invalid_config_is_refused() {
        let cfg = FavoritesConfig { max_color_len: MAX_COLOR_LEN + 1, ..Default::default() };
        let m = FavoritesStateMachine::new(InMemoryAccountStore::new(), UnconstrainedAddressSpace, &cfg);
        assert!(m.is_err());
    }

    /// Lets a second writer commit between a transition's read and its write.
    struct RacingStore {
        inner: InMemoryAccountStore,
        interloper: Mutex<Option<Vec<u8>>>,
    }

    impl AccountStore for RacingStore {
        fn fetch(&self, address: &Address) -> Result<Option<Vec<u8>>, StoreError> {
            self.inner.fetch(address)
        }

        fn commit(&self, address: &Address, data: Vec<u8>, mode: CommitMode) -> Result<(), StoreError> {
            if let Some(bytes) = self.interloper.lock().unwrap().take() {
                let current = self.inner.fetch(address)?.unwrap();
                self.inner.commit(address, bytes, CommitMode::Overwrite { expected: current })?;
            }
            self.inner.commit(address, data, mode)
        }
    }

    #[test]
    fn concurrent_update_is_not_lost() {
        let store = Arc::new(RacingStore {
            inner: InMemoryAccountStore::new(),
            interloper: Mutex::new(None),
        });
        let m = FavoritesStateMachine::new(
            Arc::clone(&store),
            UnconstrainedAddressSpace,
            &FavoritesConfig::default(),
        )
        .unwrap();
        m.create(&user(1), &user(1), 42, "blue".into()).unwrap();

        // Another transition sets color=green after our update has read {42, blue}.
        let theirs = Record { owner: user(1), number: 42, color: "green".into() };
        *store.interloper.lock().unwrap() = Some(theirs.encode());

        let err = m.update(&user(1), &user(1), FieldUpdate::SetTo(99), FieldUpdate::Keep).unwrap_err();
        assert!(matches!(err, FavoritesError::Store(StoreError::Conflict { .. })));
        assert_eq!(err.kind(), ErrorKind::Internal);
        // The stale {99, blue} image was not written over green.
        assert_eq!(m.accessor().read_for(m.deriver(), &user(1)).unwrap(), theirs);
    }

    #[test]
    fn submit_reports_address_and_stable_ids() {
        let m = machine();
        let t = Transition::Create { owner: user(1), number: 23, color: "red".into() };
        let receipt = m.submit(t.clone(), &user(1)).unwrap();
        assert_eq!(receipt.address, m.address_of(&user(1)).unwrap());
        assert_eq!(receipt.record.number, 23);

        let err = m.submit(t, &user(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let upd = Transition::Update {
            owner: user(1),
            number: FieldUpdate::SetTo(24),
            color: FieldUpdate::Keep,
        };
        let a = m.submit(upd.clone(), &user(1)).unwrap();
        let b = m.submit(upd, &user(1)).unwrap();
        // applied to different prior bytes
        assert_ne!(a.id, b.id);
        assert_eq!(a.record, b.record);
    }
}
