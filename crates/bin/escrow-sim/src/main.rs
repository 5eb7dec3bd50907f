use anyhow::Result;
use clap::Parser;
use escrow_ledger::{
    DepositOutcome, EscrowLedger, LinearCurve, MemoryToken, ParticipantId, Token,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "escrow-sim")]
#[command(about = "scripted escrow ledger lifecycle simulation", long_about = None)]
struct Args {
    /// number of participants
    #[arg(long, default_value_t = 5)]
    participants: u8,

    /// initial token balance per participant
    #[arg(long, default_value_t = 10_000)]
    funding: u128,

    /// reward curve rate numerator (per token-block)
    #[arg(long, default_value_t = 1)]
    rate_num: u128,

    /// reward curve rate denominator
    #[arg(long, default_value_t = 1000)]
    rate_denom: u128,

    /// lock duration in blocks
    #[arg(long, default_value_t = 100)]
    lock_blocks: u64,

    /// rng seed for deterministic runs
    #[arg(long, default_value_t = 42, env = "ESCROW_SIM_SEED")]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "escrow_sim=info".into()),
        )
        .init();

    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    info!("starting escrow-sim");
    info!("participants: {}", args.participants);
    info!("funding: {} each", args.funding);
    info!("curve rate: {}/{}", args.rate_num, args.rate_denom);
    info!("lock duration: {} blocks", args.lock_blocks);

    let admin = ParticipantId::from_raw([0xAA; 32]);
    let custody = ParticipantId::from_raw([0xEE; 32]);
    let ids: Vec<ParticipantId> = (1..=args.participants)
        .map(|b| ParticipantId::from_raw([b; 32]))
        .collect();

    let mut token = MemoryToken::new();
    for id in &ids {
        token.mint(id, args.funding);
    }
    let curve = LinearCurve::new(args.rate_num, args.rate_denom);
    let mut ledger = EscrowLedger::new(token, curve, admin, custody);

    // everyone deposits and locks a random share of their funding
    for id in &ids {
        let amount = rng.gen_range(args.funding / 10..=args.funding);
        match ledger.deposit(*id, amount, args.lock_blocks)? {
            DepositOutcome::Locked => {
                info!("{id} deposited and locked {amount} for {} blocks", args.lock_blocks)
            }
            DepositOutcome::Unlocked(reason) => {
                warn!("{id} deposited {amount} but the lock was refused: {reason}")
            }
        }
    }
    info!(
        "aggregate locked at block {}: {}",
        ledger.height(),
        ledger.aggregate_locked(None)
    );

    // halfway through the lock window, mint rewards and run a weighted draw
    let midpoint = args.lock_blocks / 2;
    ledger.advance_to(midpoint)?;
    info!("advanced to block {midpoint}");

    for id in &ids {
        match ledger.mint_reward(*id) {
            Ok(minted) => info!("{id} minted {minted} reward"),
            Err(e) => warn!("{id} mint rejected: {e}"),
        }
    }

    let total = ledger.aggregate_locked(None);
    if total > 0 {
        let delta = rng.gen_range(0..total);
        let (winner, remainder) = ledger.cumulative_sum_search(None, delta)?;
        info!("weighted draw at offset {delta}: {winner} (remainder {remainder})");

        // the drawn participant misbehaves and loses a tenth of its stake
        let penalty = ledger.currently_locked(&winner, None) / 10;
        if penalty > 0 {
            ledger.penalize(admin, winner, penalty)?;
            info!("penalized {winner} by {penalty} (burned from custody)");
        }
    }

    // run the locks out, settle rewards, and shut the ledger down
    ledger.advance_to(args.lock_blocks)?;
    info!("advanced to block {}", args.lock_blocks);
    for id in &ids {
        match ledger.mint_reward(*id) {
            Ok(minted) => info!("{id} minted {minted} reward"),
            Err(e) => warn!("{id} mint rejected: {e}"),
        }
    }

    ledger.terminate(admin)?;
    info!("ledger terminated, all participants refunded");
    for id in &ids {
        info!("{id} closing balance: {}", ledger.token().balance_of(id));
    }
    info!(
        "custody residual: {} (swept to admin: {})",
        ledger.token().balance_of(&custody),
        ledger.token().balance_of(&admin),
    );

    Ok(())
}
