//! Deterministic record addresses.
//!
//! Seeds are `[namespace_tag, owner, [bump]]` under the program id. Bumps are
//! tried from 255 downward and the first candidate the ledger's address space
//! accepts wins, so the result is a pure function of (tag, owner, program).

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::FavoritesConfig;
use crate::error::DerivationError;
use crate::key::{Address, Identity, KEY_LEN};

/// Bumps tried per derivation: 255 down to 1.
pub const BUMP_CANDIDATES: usize = u8::MAX as usize;

/// Address-space rules of the collaborating ledger.
pub trait AddressSpace {
    /// Candidate address for `seeds` under `program_id`, or `None` when the
    /// ledger would not accept it as a derived address.
    fn create_address(&self, seeds: &[&[u8]], program_id: &Address) -> Option<Address>;

    /// Longest single seed the ledger accepts.
    fn max_seed_len(&self) -> usize {
        usize::MAX
    }
}

impl<T: AddressSpace + ?Sized> AddressSpace for &T {
    fn create_address(&self, seeds: &[&[u8]], program_id: &Address) -> Option<Address> {
        (**self).create_address(seeds, program_id)
    }
    fn max_seed_len(&self) -> usize {
        (**self).max_seed_len()
    }
}

/// Address space with no usability constraint: every candidate is accepted,
/// so derivation always settles on bump 255.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconstrainedAddressSpace;

impl AddressSpace for UnconstrainedAddressSpace {
    fn create_address(&self, seeds: &[&[u8]], program_id: &Address) -> Option<Address> {
        let mut h = Sha256::new();
        for seed in seeds {
            h.update(seed);
        }
        h.update(program_id.as_ref());
        h.update(b"DerivedAddress");
        let digest: [u8; KEY_LEN] = h.finalize().into();
        Some(Address::new(digest))
    }
}

/// Solana program-derived addresses: a candidate is usable only if it is not
/// a point on the ed25519 curve.
#[cfg(feature = "solana")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SolanaAddressSpace;

#[cfg(feature = "solana")]
impl AddressSpace for SolanaAddressSpace {
    fn create_address(&self, seeds: &[&[u8]], program_id: &Address) -> Option<Address> {
        use anchor_lang::prelude::Pubkey;
        Pubkey::create_program_address(seeds, &Pubkey::from(*program_id))
            .ok()
            .map(Address::from)
    }

    fn max_seed_len(&self) -> usize {
        crate::MAX_SEED_LEN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DerivedAddress {
    pub address: Address,
    pub bump: u8,
}

/// Maps (namespace tag, owner) to a record address. Holds no state beyond
/// the program id and the address-space capability.
#[derive(Debug, Clone)]
pub struct AddressDeriver<A> {
    space: A,
    program_id: Address,
    namespace_tag: Vec<u8>,
}

impl<A: AddressSpace> AddressDeriver<A> {
    pub fn new(space: A, config: &FavoritesConfig) -> Self {
        Self {
            space,
            program_id: config.program_id,
            namespace_tag: config.namespace_bytes().to_vec(),
        }
    }

    pub fn program_id(&self) -> &Address {
        &self.program_id
    }

    pub fn namespace_tag(&self) -> &[u8] {
        &self.namespace_tag
    }

    /// Derives the address for an arbitrary namespace tag.
    pub fn derive(
        &self,
        namespace_tag: &[u8],
        owner: &Identity,
    ) -> Result<DerivedAddress, DerivationError> {
        let max = self.space.max_seed_len();
        for seed in [namespace_tag, owner.as_ref()] {
            if seed.len() > max {
                return Err(DerivationError::SeedTooLong { len: seed.len(), max });
            }
        }

        for bump in (1..=u8::MAX).rev() {
            let bump_seed = [bump];
            let seeds: [&[u8]; 3] = [namespace_tag, owner.as_ref(), &bump_seed];
            if let Some(address) = self.space.create_address(&seeds, &self.program_id) {
                debug!(%owner, %address, bump, "derived record address");
                return Ok(DerivedAddress { address, bump });
            }
        }
        Err(DerivationError::Exhausted { tried: BUMP_CANDIDATES })
    }

    /// Derives the address under the configured namespace tag.
    pub fn derive_for(&self, owner: &Identity) -> Result<DerivedAddress, DerivationError> {
        self.derive(&self.namespace_tag, owner)
    }
}
