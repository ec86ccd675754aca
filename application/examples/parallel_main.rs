//! Runs one committed auction round with a thread per child ledger and
//! prints the published outcome.

use sealed_auction_application::run_parallel_auction;
use sealed_auction_core::config::AuctionConfig;
use sealed_auction_core::protocols::committed::BidSubmission;
use tracing::info;

fn main() {
    tracing_subscriber::fmt().init();

    let groups = vec![
        vec![
            BidSubmission::new("CBC_0_User_1", 12),
            BidSubmission::new("CBC_0_User_2", 27),
            BidSubmission::new("CBC_0_User_3", 9),
        ],
        vec![
            BidSubmission::new("CBC_1_User_1", 21),
            BidSubmission::new("CBC_1_User_2", 30),
        ],
        vec![
            BidSubmission::new("CBC_2_User_1", 16),
            BidSubmission::new("CBC_2_User_2", 25),
            BidSubmission::new("CBC_2_User_3", 4),
        ],
    ];

    let config = AuctionConfig::default();
    match run_parallel_auction(groups, 2, &config, 7) {
        Ok(outcome) => {
            for (rank, winner) in outcome.winners.iter().enumerate() {
                info!(
                    rank = rank + 1,
                    bidder = winner.bidder_id.as_str(),
                    bid = winner.bid_value,
                    value = %winner.value,
                    "final winner"
                );
            }
            info!(
                coefficients = ?outcome.blinding_coefficients,
                commitment = %outcome.vector_commitment,
                "published vector commitment"
            );
        }
        Err(error) => {
            eprintln!("auction round aborted: {error}");
            std::process::exit(1);
        }
    }
}
