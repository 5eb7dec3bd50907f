//! End-to-end scenarios for the escrow ledger.

use escrow_ledger::{
    DepositOutcome, Error, EscrowLedger, LinearCurve, MemoryToken, ParticipantId, Token,
};

const ADMIN: ParticipantId = ParticipantId([0xAA; 32]);
const CUSTODY: ParticipantId = ParticipantId([0xEE; 32]);

fn pid(b: u8) -> ParticipantId {
    ParticipantId::from_raw([b; 32])
}

fn ledger_with(funds: &[(u8, u128)]) -> EscrowLedger<MemoryToken, LinearCurve> {
    let mut token = MemoryToken::new();
    for (b, amount) in funds {
        token.mint(&pid(*b), *amount);
    }
    // 1 reward token per 1000 token-blocks
    EscrowLedger::new(token, LinearCurve::new(1, 1000), ADMIN, CUSTODY)
}

#[test]
fn scenario_lock_window() {
    // deposit 100, lock for 10 blocks at block 0
    let mut ledger = ledger_with(&[(1, 100)]);
    assert_eq!(ledger.deposit(pid(1), 100, 10).unwrap(), DepositOutcome::Locked);

    assert_eq!(ledger.currently_locked(&pid(1), Some(5)), 100);
    assert_eq!(ledger.currently_locked(&pid(1), Some(10)), 0);
}

#[test]
fn scenario_weighted_search() {
    // two participants lock 30 and 70 in that insertion order
    let mut ledger = ledger_with(&[(1, 30), (2, 70)]);
    ledger.deposit(pid(1), 30, 100).unwrap();
    ledger.deposit(pid(2), 70, 100).unwrap();

    let (winner, remainder) = ledger.cumulative_sum_search(None, 50).unwrap();
    assert_eq!(winner, pid(2));
    assert_eq!(remainder, 20);
}

#[test]
fn scenario_penalty_bounds() {
    let mut ledger = ledger_with(&[(1, 100)]);
    ledger.deposit(pid(1), 100, 50).unwrap();
    ledger.advance_to(10).unwrap();

    let before = ledger.entry(&pid(1)).unwrap().clone();
    let err = ledger.penalize(ADMIN, pid(1), 101).unwrap_err();
    assert!(matches!(err, Error::InsufficientLocked { .. }));
    assert_eq!(ledger.entry(&pid(1)).unwrap(), &before);
}

/// curve with a minimum viable volume, so extensions can be reward-empty
/// even though the original lock was not
struct ThresholdCurve {
    min_volume: u128,
}

impl escrow_ledger::RewardCurve for ThresholdCurve {
    fn compute_reward(
        &self,
        _participant: &ParticipantId,
        locked: u128,
        elapsed: u64,
        precision: escrow_ledger::PrecisionState,
    ) -> (u128, escrow_ledger::PrecisionState) {
        let total = locked * elapsed as u128 + precision.0;
        (total / 1000, escrow_ledger::PrecisionState(total % 1000))
    }

    fn is_reward_empty(&self, value: u128, blocks: u64) -> bool {
        value * (blocks as u128) < self.min_volume
    }
}

#[test]
fn scenario_reward_empty_extension_rejected() {
    let mut token = MemoryToken::new();
    token.mint(&pid(1), 2_000);
    let curve = ThresholdCurve { min_volume: 10_000 };
    let mut ledger = EscrowLedger::new(token, curve, ADMIN, CUSTODY);

    // 1000 tokens for 10 blocks clears the threshold
    ledger.deposit(pid(1), 1_000, 10).unwrap();
    ledger.advance_to(8).unwrap();
    assert_eq!(ledger.mint_reward(pid(1)).unwrap(), 8);
    let before = ledger.entry(&pid(1)).unwrap().clone();

    // combined proposal: 1500 tokens over 1 + (10 - 8) blocks = 4500 volume,
    // under the threshold, so the extension is refused and only the deposit
    // itself stands
    let outcome = ledger.deposit(pid(1), 500, 1).unwrap();
    assert_eq!(outcome, DepositOutcome::Unlocked(Error::RewardEmpty));

    let after = ledger.entry(&pid(1)).unwrap();
    assert_eq!(after.total_value, before.total_value + 500);
    assert_eq!(after.locked_value, before.locked_value);
    assert_eq!(after.release_block, before.release_block);
    assert_eq!(after.last_reward_block, before.last_reward_block);
}

#[test]
fn scenario_terminate_refunds_and_freezes() {
    let mut ledger = ledger_with(&[(1, 100), (2, 250), (3, 50)]);
    ledger.deposit(pid(1), 100, 10).unwrap();
    ledger.deposit(pid(2), 200, 10).unwrap();
    ledger.deposit(pid(3), 50, 10).unwrap();

    ledger.terminate(ADMIN).unwrap();

    assert_eq!(ledger.token().balance_of(&pid(1)), 100);
    assert_eq!(ledger.token().balance_of(&pid(2)), 250);
    assert_eq!(ledger.token().balance_of(&pid(3)), 50);
    assert_eq!(ledger.token().balance_of(&CUSTODY), 0);
    assert_eq!(ledger.participant_count(), 0);

    assert_eq!(ledger.deposit(pid(1), 10, 10), Err(Error::Terminated));
    assert_eq!(ledger.lock(pid(1), 10, 10), Err(Error::Terminated));
    assert_eq!(ledger.withdraw_all(pid(1)), Err(Error::Terminated));
    assert_eq!(ledger.mint_reward(pid(1)), Err(Error::Terminated));
}

#[test]
fn round_trip_deposit_withdraw_restores_balances() {
    let mut ledger = ledger_with(&[(1, 100)]);

    // blocks = 0 makes the bundled lock reward-empty, so it is refused and
    // the full deposit stays withdrawable
    let outcome = ledger.deposit(pid(1), 100, 0).unwrap();
    assert_eq!(outcome, DepositOutcome::Unlocked(Error::RewardEmpty));

    ledger.withdraw(pid(1), 100).unwrap();
    assert_eq!(ledger.token().balance_of(&pid(1)), 100);
    assert_eq!(ledger.token().balance_of(&CUSTODY), 0);

    // nothing outstanding: withdraw_all removes the empty entry
    ledger.withdraw_all(pid(1)).unwrap();
    assert_eq!(ledger.participant_count(), 0);
    assert!(ledger.entry(&pid(1)).is_none());
}

#[test]
fn withdraw_all_is_idempotent_for_absent_entries() {
    let mut ledger = ledger_with(&[]);
    ledger.withdraw_all(pid(7)).unwrap();
    ledger.withdraw_all(pid(7)).unwrap();
    assert_eq!(ledger.participant_count(), 0);
}

#[test]
fn full_lifecycle_deposit_mint_leave() {
    let mut ledger = ledger_with(&[(1, 500)]);
    ledger.deposit(pid(1), 500, 20).unwrap();

    ledger.advance_to(10).unwrap();
    // 500 * 10 / 1000 = 5
    assert_eq!(ledger.mint_reward(pid(1)).unwrap(), 5);

    ledger.advance_to(30).unwrap();
    // capped at release block 20: 500 * 10 / 1000 = 5 more
    assert_eq!(ledger.mint_reward(pid(1)).unwrap(), 5);

    // reward fully minted through release: free to leave
    ledger.withdraw_all(pid(1)).unwrap();
    assert_eq!(ledger.token().balance_of(&pid(1)), 500);
    assert_eq!(ledger.participant_count(), 0);
}

#[test]
fn extension_accrues_reward_from_combined_lock() {
    let mut ledger = ledger_with(&[(1, 1_000)]);
    ledger.deposit(pid(1), 400, 10).unwrap();
    ledger.advance_to(5).unwrap();

    // extend by 300 tokens and 10 blocks: lock becomes 700 until block 20
    ledger.lock(pid(1), 300, 10).unwrap();
    let entry = ledger.entry(&pid(1)).unwrap();
    assert_eq!(entry.locked_value, 700);
    assert_eq!(entry.release_block, 20);

    ledger.advance_to(20).unwrap();
    // whole combined lock rewarded over blocks 0..20 at its final size is
    // not what the curve sees: it sees 700 locked over 20 elapsed blocks
    assert_eq!(ledger.mint_reward(pid(1)).unwrap(), 14);
}

#[test]
fn aggregate_consistent_across_blocks() {
    let mut ledger = ledger_with(&[(1, 100), (2, 200), (3, 300)]);
    ledger.deposit(pid(1), 100, 10).unwrap();
    ledger.deposit(pid(2), 200, 20).unwrap();
    ledger.deposit(pid(3), 300, 30).unwrap();

    for at in [0u64, 5, 10, 15, 20, 25, 30, 100] {
        let expected: u128 = [pid(1), pid(2), pid(3)]
            .iter()
            .map(|id| ledger.currently_locked(id, Some(at)))
            .sum();
        assert_eq!(ledger.aggregate_locked(Some(at)), expected);
    }
    assert_eq!(ledger.aggregate_locked(Some(9)), 600);
    assert_eq!(ledger.aggregate_locked(Some(10)), 500);
    assert_eq!(ledger.aggregate_locked(Some(20)), 300);
    assert_eq!(ledger.aggregate_locked(Some(30)), 0);
}

#[test]
fn custody_always_covers_entry_totals() {
    let mut ledger = ledger_with(&[(1, 300), (2, 500)]);
    ledger.deposit(pid(1), 300, 10).unwrap();
    ledger.deposit(pid(2), 400, 20).unwrap();
    ledger.advance_to(10).unwrap();
    ledger.withdraw(pid(1), 100).unwrap();
    ledger.penalize(ADMIN, pid(2), 50).unwrap();

    let entry_total: u128 = ledger
        .participants()
        .map(|id| ledger.entry(&id).map_or(0, |e| e.total_value))
        .sum();
    assert_eq!(ledger.token().balance_of(&CUSTODY), entry_total);
}
