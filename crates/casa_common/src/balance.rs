//! Bill ledger reductions.
//!
//! The ledger is a flat list of transactions; balances are recomputed
//! from scratch on every fetch. The fold is linear and order-independent,
//! so the server is free to return the history in any order.

use std::collections::HashMap;

use crate::types::Transaction;

/// Net balance for one user across a group's ledger.
///
/// For every transaction the initiator's balance drops by the full
/// amount, and each splitter's rises by `amount / splitters`. A user
/// listed both as initiator and splitter gets both adjustments.
pub fn net_balance(transactions: &[Transaction], user_id: &str) -> f64 {
    let mut balance = 0.0;
    for tx in transactions {
        if tx.split_between.is_empty() {
            continue;
        }
        if tx.initiator_id == user_id {
            balance -= tx.amount;
        }
        if tx.split_between.iter().any(|s| s == user_id) {
            balance += tx.amount / tx.split_between.len() as f64;
        }
    }
    balance
}

/// Per-member breakdown of `user_id`'s position, keyed by member id.
///
/// Positive entries raise the user's net balance (their share of bills
/// someone else fronted), negative entries lower it (shares of the
/// user's own bills still out with other members).
pub fn member_balances(transactions: &[Transaction], user_id: &str) -> HashMap<String, f64> {
    let mut balances: HashMap<String, f64> = HashMap::new();
    for tx in transactions {
        if tx.split_between.is_empty() {
            continue;
        }
        let share = tx.amount / tx.split_between.len() as f64;
        if tx.initiator_id == user_id {
            for other in tx.split_between.iter().filter(|s| *s != user_id) {
                *balances.entry(other.clone()).or_insert(0.0) -= share;
            }
        } else if tx.split_between.iter().any(|s| s == user_id) {
            *balances.entry(tx.initiator_id.clone()).or_insert(0.0) += share;
        }
    }
    balances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, amount: f64, initiator: &str, splitters: &[&str]) -> Transaction {
        Transaction {
            id: id.to_string(),
            description: format!("tx {id}"),
            amount,
            initiator_id: initiator.to_string(),
            paid_by: initiator.to_string(),
            date: "2026-03-01T10:00:00".to_string(),
            split_between: splitters.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            tx("1", 30.0, "ana", &["ben", "cleo", "ana"]),
            tx("2", 12.0, "ben", &["ana", "cleo"]),
            tx("3", 7.5, "cleo", &["ana"]),
            tx("4", 4.0, "ana", &["ben"]),
        ]
    }

    #[test]
    fn splitter_gains_equal_share() {
        let txs = vec![tx("1", 30.0, "ana", &["ben", "cleo", "dan"])];
        assert!((net_balance(&txs, "ben") - 10.0).abs() < 1e-9);
        assert!((net_balance(&txs, "ana") + 30.0).abs() < 1e-9);
    }

    #[test]
    fn uninvolved_user_stays_at_zero() {
        assert_eq!(net_balance(&ledger(), "zoe"), 0.0);
    }

    #[test]
    fn empty_split_list_contributes_nothing() {
        let txs = vec![tx("1", 30.0, "ana", &[])];
        assert_eq!(net_balance(&txs, "ana"), 0.0);
    }

    #[test]
    fn reduction_is_order_independent() {
        let txs = ledger();
        let reference = net_balance(&txs, "ana");
        // rotate through every cyclic permutation plus a full reversal
        for shift in 0..txs.len() {
            let mut rotated = txs.clone();
            rotated.rotate_left(shift);
            assert!((net_balance(&rotated, "ana") - reference).abs() < 1e-9);
        }
        let mut reversed = txs.clone();
        reversed.reverse();
        assert!((net_balance(&reversed, "ana") - reference).abs() < 1e-9);
    }

    #[test]
    fn member_breakdown_sums_to_net_balance() {
        let txs = ledger();
        for user in ["ana", "ben", "cleo"] {
            let net = net_balance(&txs, user);
            let by_member: f64 = member_balances(&txs, user).values().sum();
            assert!((net - by_member).abs() < 1e-9, "user {user}");
        }
    }

    #[test]
    fn pairwise_balances_mirror_each_other() {
        let txs = vec![tx("2", 12.0, "ben", &["ana", "cleo"])];
        let ana = member_balances(&txs, "ana");
        let ben = member_balances(&txs, "ben");
        assert!((ana["ben"] - 6.0).abs() < 1e-9);
        assert!((ben["ana"] + 6.0).abs() < 1e-9);
    }
}
