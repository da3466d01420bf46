//! Endpoint path segments, relative to `api.base_url`.
//!
//! Ids are passed as separate segments so the client can percent-encode them.

pub fn transfer_detail(transfer_id: &str) -> Vec<&str> {
    vec!["transfers", transfer_id]
}

pub fn championship_transfers(championship_id: &str) -> Vec<&str> {
    vec!["championships", championship_id, "transfers"]
}

/// Approve/reject family for player-initiated requests
pub fn player_request_action<'a>(transfer_id: &'a str, action: &'a str) -> Vec<&'a str> {
    vec!["transfers", "player", transfer_id, action]
}

/// Approve/reject family for president-initiated requests
pub fn president_request_action<'a>(transfer_id: &'a str, action: &'a str) -> Vec<&'a str> {
    vec!["transfers", "president", transfer_id, action]
}

pub fn transfer_soft_delete(transfer_id: &str) -> Vec<&str> {
    vec!["transfers", transfer_id, "delete"]
}

pub fn match_detail(match_id: &str) -> Vec<&str> {
    vec!["matches", match_id]
}

pub fn reprogram_simulate(match_id: &str) -> Vec<&str> {
    vec!["matches", match_id, "reprogram", "simulate"]
}

pub fn reprogram_confirm(match_id: &str) -> Vec<&str> {
    vec!["matches", match_id, "reprogram", "confirm"]
}

pub const APPROVE: &str = "approve";
pub const REJECT: &str = "reject";
