//! # End-to-End Scenarios
//!
//! Wallets, authorizer, dispatcher and token ledger working together.

#[cfg(test)]
mod tests {
    use crate::fixtures::{transfer_call_data, Fixture, TOKEN};
    use bw_01_authorization::{
        AuthorizationApi, AuthorizationItem, IdentityRef, Payload,
    };
    use bw_02_batch_dispatch::{BatchSubmissionApi, CallResult};
    use shared_types::{U256, ZERO_ADDRESS};

    const AMOUNT: u64 = 1_000;

    /// Five wallets at nonce 0, each holding `AMOUNT`, each sending it to wallet #1.
    fn five_transfers(fixture: &Fixture) -> anyhow::Result<(Vec<Payload>, Vec<Vec<u8>>)> {
        for wallet in &fixture.wallets {
            fixture.ledger().mint(wallet.address(), U256::from(AMOUNT));
        }
        let mut payloads = Vec::new();
        let mut call_datas = Vec::new();
        for from in 0..5 {
            let (payload, call_data) = fixture.transfer(from, 0, U256::from(AMOUNT))?;
            payloads.push(payload);
            call_datas.push(call_data);
        }
        Ok((payloads, call_datas))
    }

    #[tokio::test]
    async fn test_five_wallet_transfer_batch() -> anyhow::Result<()> {
        let fixture = Fixture::with_registered(5)?;
        let (payloads, call_datas) = five_transfers(&fixture)?;
        let signed: Vec<(usize, &Payload)> = payloads.iter().enumerate().collect();
        let signature = fixture.aggregate(&signed)?;
        let identities: Vec<IdentityRef> = fixture.wallets.iter().map(|w| w.id_ref()).collect();

        let results = fixture
            .dispatcher
            .submit_batch(&identities, &payloads, &signature, &call_datas)
            .await?;

        assert!(results.iter().all(|r| r.success));
        assert_eq!(fixture.ledger().balance_of(&fixture.wallet(0).address()), U256::from(5 * AMOUNT));
        for wallet in &fixture.wallets[1..] {
            assert_eq!(fixture.ledger().balance_of(&wallet.address()), U256::zero());
        }
        assert_eq!(fixture.nonces()?, vec![U256::one(); 5]);
        Ok(())
    }

    #[tokio::test]
    async fn test_five_wallet_authorization_only() -> anyhow::Result<()> {
        let fixture = Fixture::with_registered(5)?;
        let (payloads, _) = five_transfers(&fixture)?;
        let signed: Vec<(usize, &Payload)> = payloads.iter().enumerate().collect();
        let signature = fixture.aggregate(&signed)?;
        let items: Vec<AuthorizationItem> = payloads
            .iter()
            .zip(&fixture.wallets)
            .map(|(payload, wallet)| AuthorizationItem::new(payload.clone(), wallet.id_ref()))
            .collect();

        let batch = fixture.authorizer.verify_batch(&items, &signature)?;

        assert_eq!(batch.accepted(), vec![true; 5]);
        assert!(batch.items.iter().all(|a| a.next_nonce == U256::one()));
        assert!(fixture.ledger().applied().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_aggregation_order_does_not_matter() -> anyhow::Result<()> {
        let fixture = Fixture::with_registered(3)?;
        let payloads: Vec<Payload> = (0..3)
            .map(|i| fixture.payload(U256::zero(), TOKEN, &[i as u8]))
            .collect();
        let forward = fixture.aggregate(&[(0, &payloads[0]), (1, &payloads[1]), (2, &payloads[2])])?;
        let reverse = fixture.aggregate(&[(2, &payloads[2]), (0, &payloads[0]), (1, &payloads[1])])?;
        assert_eq!(forward, reverse);

        let identities: Vec<IdentityRef> = fixture.wallets.iter().map(|w| w.id_ref()).collect();
        let call_datas: Vec<Vec<u8>> = (0..3).map(|i| vec![i as u8]).collect();
        fixture
            .dispatcher
            .submit_batch(&identities, &payloads, &reverse, &call_datas)
            .await?;
        assert_eq!(fixture.nonces()?, vec![U256::one(); 3]);
        Ok(())
    }

    #[tokio::test]
    async fn test_airdrop_from_one_wallet() -> anyhow::Result<()> {
        let fixture = Fixture::with_created(4)?;
        let sender = fixture.wallet(0);
        fixture.ledger().mint(sender.address(), U256::from(300));

        let call_datas: Vec<Vec<u8>> = fixture.wallets[1..]
            .iter()
            .map(|w| transfer_call_data(&w.address(), U256::from(100)))
            .collect();
        let rewards = vec![U256::zero(); call_datas.len()];
        let payloads = fixture
            .dispatcher
            .same_caller_payloads(&sender.id_ref(), &rewards, TOKEN, &call_datas)?;
        let signed: Vec<(usize, &Payload)> = payloads.iter().map(|p| (0, p)).collect();
        let signature = fixture.aggregate(&signed)?;

        let results = fixture
            .dispatcher
            .submit_same_caller(&sender.id_ref(), &signature, &rewards, TOKEN, &call_datas)
            .await?;

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(fixture.ledger().balance_of(&sender.address()), U256::zero());
        for wallet in &fixture.wallets[1..] {
            assert_eq!(fixture.ledger().balance_of(&wallet.address()), U256::from(100));
        }
        // Creation consumed nonce 0; the airdrop used 1, 2 and 3.
        assert_eq!(fixture.nonce(0)?, U256::from(4));
        Ok(())
    }

    #[tokio::test]
    async fn test_same_call_from_many_wallets() -> anyhow::Result<()> {
        let fixture = Fixture::with_created(3)?;
        let identities: Vec<IdentityRef> = fixture.wallets.iter().map(|w| w.id_ref()).collect();
        let rewards = vec![U256::from(1); 3];
        let call_data = b"register()".to_vec();
        let target = [0x99; 20];

        let payloads =
            fixture
                .dispatcher
                .same_call_payloads(&identities, &rewards, target, &call_data)?;
        let signed: Vec<(usize, &Payload)> = payloads.iter().enumerate().collect();
        let signature = fixture.aggregate(&signed)?;

        let results = fixture
            .dispatcher
            .submit_same_call(&identities, &signature, &rewards, target, &call_data)
            .await?;

        assert_eq!(results, vec![CallResult::succeeded(Vec::new()); 3]);
        let applied = fixture.ledger().applied();
        assert!(applied.iter().all(|c| c.reward == U256::from(1) && c.target == target));
        assert_eq!(fixture.nonces()?, vec![U256::from(2); 3]);
        Ok(())
    }

    #[tokio::test]
    async fn test_overdraft_reverts_without_blocking_batch() -> anyhow::Result<()> {
        let fixture = Fixture::with_registered(2)?;
        fixture.ledger().mint(fixture.wallet(1).address(), U256::from(50));

        // Wallet 0 has nothing; wallet 1 can pay.
        let (p0, c0) = fixture.transfer(0, 1, U256::from(10))?;
        let (p1, c1) = fixture.transfer(1, 0, U256::from(50))?;
        let signature = fixture.aggregate(&[(0, &p0), (1, &p1)])?;

        let results = fixture
            .dispatcher
            .submit_batch(
                &[fixture.wallet(0).id_ref(), fixture.wallet(1).id_ref()],
                &[p0, p1],
                &signature,
                &[c0, c1],
            )
            .await?;

        assert!(!results[0].success);
        assert_eq!(results[0].return_data, b"insufficient balance".to_vec());
        assert!(results[1].success);
        assert_eq!(fixture.ledger().balance_of(&fixture.wallet(0).address()), U256::from(50));
        assert_eq!(fixture.nonces()?, vec![U256::one(), U256::one()]);

        let stats = fixture.dispatcher.stats().await;
        assert_eq!((stats.calls_succeeded, stats.calls_failed), (1, 1));
        Ok(())
    }

    #[tokio::test]
    async fn test_refused_call_still_consumes_nonce() -> anyhow::Result<()> {
        let fixture = Fixture::with_registered(2)?;
        fixture.ledger().mint(fixture.wallet(1).address(), U256::from(AMOUNT));

        let refused = fixture.payload(U256::zero(), ZERO_ADDRESS, b"");
        let (paying, call_data) = fixture.transfer(1, 0, U256::from(AMOUNT))?;
        let signature = fixture.aggregate(&[(0, &refused), (1, &paying)])?;

        let results = fixture
            .dispatcher
            .submit_batch(
                &[fixture.wallet(0).id_ref(), fixture.wallet(1).id_ref()],
                &[refused, paying],
                &signature,
                &[Vec::new(), call_data],
            )
            .await?;

        assert_eq!(
            results[0],
            CallResult::gateway_failure("Call rejected: no contract at the zero address")
        );
        assert!(results[1].success);
        assert_eq!(fixture.ledger().applied().len(), 1);
        assert_eq!(fixture.ledger().balance_of(&fixture.wallet(0).address()), U256::from(AMOUNT));
        assert_eq!(fixture.nonces()?, vec![U256::one(), U256::one()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_created_wallet_checks_its_creation_signature() -> anyhow::Result<()> {
        let fixture = Fixture::with_created(1)?;
        let wallet = fixture.wallet(0);
        let creation = fixture.authorizer.creation_payload(&wallet.hash(), U256::zero());

        let check = fixture
            .authorizer
            .check_signature(&creation, &wallet.id_ref(), &wallet.sign(&creation))?;

        assert!(check.valid);
        assert_eq!(check.next_nonce, U256::one());
        assert_eq!(
            fixture.authorizer.wallet_from_hash(&wallet.hash()),
            Some(wallet.address())
        );
        Ok(())
    }
}
