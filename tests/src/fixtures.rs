//! # Test Fixtures
//!
//! A token ledger standing in for the chain, and a fixture that wires an
//! authorizer, a dispatcher and a set of wallets together.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bw_01_authorization::{
    AuthorizationApi, AuthorizationConfig, Authorizer, CreateWalletRequest, Identity, IdentityRef,
    Payload,
};
use bw_02_batch_dispatch::{
    BatchDispatcher, CallOutcome, DispatcherConfig, ExecutionCall, ExecutionError,
    ExecutionGateway,
};
use parking_lot::Mutex;
use shared_crypto::{
    aggregate_public_keys, aggregate_signatures, keccak256, BlsKeyPair, BlsPublicKey, BlsSignature,
};
use shared_types::{u256_to_word, word_to_u256, Address, PublicKeyHash, U256, ZERO_ADDRESS};
use std::collections::HashMap;
use std::sync::{Arc, Once};
use tracing_subscriber::EnvFilter;

/// Address of the test token.
pub const TOKEN: Address = [0x70; 20];

static LOGGING: Once = Once::new();

/// Route `tracing` output through the test harness, filtered by `RUST_LOG`.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// `x·g2 − victim` where `x` is the attacker's secret.
///
/// Paired with the victim on the same message, the two keys sum to the
/// attacker's own key. Nobody knows the rogue key's secret.
pub fn rogue_key(attacker: &BlsKeyPair, victim: &BlsPublicKey) -> Result<BlsPublicKey> {
    // Flipping the compressed sign bit negates the point
    let mut negated = victim.to_bytes();
    negated[0] ^= 0x20;
    let negated = BlsPublicKey::from_bytes(&negated).map_err(|e| anyhow!("negate: {e}"))?;
    aggregate_public_keys(&[attacker.public_key().clone(), negated])
        .map_err(|e| anyhow!("rogue key: {e}"))
}

// =============================================================================
// TOKEN LEDGER (mock ExecutionGateway)
// =============================================================================

fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// ABI-encode `transfer(address,uint256)`.
pub fn transfer_call_data(to: &Address, amount: U256) -> Vec<u8> {
    let mut data = Vec::with_capacity(68);
    data.extend_from_slice(&selector("transfer(address,uint256)"));
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(to);
    data.extend_from_slice(&u256_to_word(&amount));
    data
}

fn decode_transfer(data: &[u8]) -> Option<(Address, U256)> {
    if data.len() != 68 || data[..4] != selector("transfer(address,uint256)") {
        return None;
    }
    let to: Address = data[16..36].try_into().ok()?;
    let amount: [u8; 32] = data[36..68].try_into().ok()?;
    Some((to, word_to_u256(&amount)))
}

/// In-memory token contract. Calls to the zero address are refused; calls to
/// any other target succeed as no-ops.
pub struct TokenLedger {
    token: Address,
    balances: Mutex<HashMap<Address, U256>>,
    applied: Mutex<Vec<ExecutionCall>>,
}

impl TokenLedger {
    pub fn new(token: Address) -> Self {
        Self {
            token,
            balances: Mutex::new(HashMap::new()),
            applied: Mutex::new(Vec::new()),
        }
    }

    pub fn mint(&self, holder: Address, amount: U256) {
        *self.balances.lock().entry(holder).or_default() += amount;
    }

    pub fn balance_of(&self, holder: &Address) -> U256 {
        self.balances.lock().get(holder).copied().unwrap_or_default()
    }

    /// Every call the dispatcher handed over, in order.
    pub fn applied(&self) -> Vec<ExecutionCall> {
        self.applied.lock().clone()
    }
}

#[async_trait]
impl ExecutionGateway for TokenLedger {
    async fn apply_call(&self, call: ExecutionCall) -> Result<CallOutcome, ExecutionError> {
        if call.target == ZERO_ADDRESS {
            return Err(ExecutionError::Rejected {
                reason: "no contract at the zero address".into(),
            });
        }
        self.applied.lock().push(call.clone());
        if call.target != self.token {
            return Ok(CallOutcome::success(Vec::new()));
        }
        let Some((to, amount)) = decode_transfer(&call.call_data) else {
            return Ok(CallOutcome::revert(b"unknown selector".to_vec()));
        };

        let mut balances = self.balances.lock();
        let available = balances.get(&call.wallet).copied().unwrap_or_default();
        if available < amount {
            return Ok(CallOutcome::revert(b"insufficient balance".to_vec()));
        }
        balances.insert(call.wallet, available - amount);
        *balances.entry(to).or_default() += amount;
        Ok(CallOutcome::success(u256_to_word(&U256::one()).to_vec()))
    }
}

// =============================================================================
// FIXTURE
// =============================================================================

/// A signing key and the identity registered for it.
pub struct Wallet {
    pub keypair: BlsKeyPair,
    pub identity: Identity,
}

impl Wallet {
    pub fn hash(&self) -> PublicKeyHash {
        self.identity.public_key_hash
    }

    pub fn id_ref(&self) -> IdentityRef {
        IdentityRef::Hash(self.hash())
    }

    pub fn address(&self) -> Address {
        self.identity.wallet
    }

    pub fn sign(&self, payload: &Payload) -> BlsSignature {
        payload.sign(&self.keypair)
    }
}

pub type TestDispatcher = BatchDispatcher<Authorizer, TokenLedger>;

pub struct Fixture {
    pub authorizer: Arc<Authorizer>,
    pub dispatcher: TestDispatcher,
    pub wallets: Vec<Wallet>,
}

impl Fixture {
    /// Fixture with no wallets.
    pub fn new() -> Self {
        init_test_logging();
        let authorizer = Arc::new(Authorizer::new(AuthorizationConfig::for_testing()));
        let dispatcher = BatchDispatcher::new(
            DispatcherConfig::for_testing(),
            Arc::clone(&authorizer),
            TokenLedger::new(TOKEN),
        );
        Self {
            authorizer,
            dispatcher,
            wallets: Vec::new(),
        }
    }

    /// `count` wallets registered directly at nonce 0, each with its proof
    /// of possession.
    pub fn with_registered(count: usize) -> Result<Self> {
        let mut fixture = Self::new();
        for _ in 0..count {
            let keypair = BlsKeyPair::generate();
            let identity = fixture
                .authorizer
                .register(keypair.public_key(), &keypair.prove_possession())
                .context("register wallet")?;
            fixture.wallets.push(Wallet { keypair, identity });
        }
        Ok(fixture)
    }

    /// `count` wallets created through the bootstrap path (nonce 1).
    pub fn with_created(count: usize) -> Result<Self> {
        let mut fixture = Self::new();
        let keypairs: Vec<BlsKeyPair> = (0..count).map(|_| BlsKeyPair::generate()).collect();
        let signatures: Vec<BlsSignature> = keypairs
            .iter()
            .map(|k| {
                fixture
                    .authorizer
                    .creation_payload(&k.public_key_hash(), U256::zero())
                    .sign(k)
            })
            .collect();
        let requests: Vec<CreateWalletRequest> = keypairs
            .iter()
            .map(|k| CreateWalletRequest::new(k.public_key().clone()))
            .collect();

        let identities = fixture
            .dispatcher
            .create_wallets(&requests, &aggregate_signatures(&signatures)?)
            .context("create wallets")?;
        fixture.wallets = keypairs
            .into_iter()
            .zip(identities)
            .map(|(keypair, identity)| Wallet { keypair, identity })
            .collect();
        Ok(fixture)
    }

    pub fn wallet(&self, index: usize) -> &Wallet {
        &self.wallets[index]
    }

    pub fn ledger(&self) -> &TokenLedger {
        self.dispatcher.gateway()
    }

    pub fn nonce(&self, index: usize) -> Result<U256> {
        Ok(self.authorizer.nonce_of(&self.wallet(index).id_ref())?)
    }

    pub fn nonces(&self) -> Result<Vec<U256>> {
        (0..self.wallets.len()).map(|i| self.nonce(i)).collect()
    }

    /// Payload on this fixture's chain with zero reward and value.
    pub fn payload(&self, nonce: U256, target: Address, call_data: &[u8]) -> Payload {
        Payload::new(
            self.authorizer.chain_id(),
            nonce,
            U256::zero(),
            U256::zero(),
            target,
            call_data,
        )
    }

    /// Token transfer from wallet `from` to wallet `to` at `from`'s current nonce.
    pub fn transfer(&self, from: usize, to: usize, amount: U256) -> Result<(Payload, Vec<u8>)> {
        let call_data = transfer_call_data(&self.wallet(to).address(), amount);
        let payload = self.payload(self.nonce(from)?, TOKEN, &call_data);
        Ok((payload, call_data))
    }

    /// Aggregate of each listed wallet's signature over its payload.
    pub fn aggregate(&self, signed: &[(usize, &Payload)]) -> Result<BlsSignature> {
        let signatures: Vec<BlsSignature> = signed
            .iter()
            .map(|(index, payload)| self.wallet(*index).sign(payload))
            .collect();
        aggregate_signatures(&signatures).map_err(|e| anyhow!("aggregate: {e}"))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_call_data_round_trip() {
        let to = [0x12; 20];
        let data = transfer_call_data(&to, U256::from(500));
        assert_eq!(data.len(), 68);
        assert_eq!(decode_transfer(&data), Some((to, U256::from(500))));
        assert_eq!(decode_transfer(&data[..67]), None);
    }

    #[tokio::test]
    async fn test_ledger_rejects_overdraft() {
        let ledger = TokenLedger::new(TOKEN);
        let wallet = [0x01; 20];
        ledger.mint(wallet, U256::from(10));

        let call = ExecutionCall {
            identity: PublicKeyHash::default(),
            wallet,
            nonce: U256::zero(),
            target: TOKEN,
            call_data: transfer_call_data(&[0x02; 20], U256::from(11)),
            value: U256::zero(),
            reward: U256::zero(),
        };
        let outcome = ledger.apply_call(call).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(ledger.balance_of(&wallet), U256::from(10));
    }
}
