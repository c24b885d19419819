//! How many voters each debate gets.
//!
//! Debates are always considered most important first, so any surplus
//! lands at the top of the draw.

/// Seats per panel debate under per-adjudicator ballots.
pub const PANEL_SIZE: usize = 3;

/// Number of solo-chaired debates when voting panels are allowed.
///
/// Every two voters beyond one-per-debate turn a solo debate into a
/// three-person panel, until there are no solo debates left.
pub fn solo_debates(n_debates: usize, n_voting: usize) -> usize {
    let surplus = n_voting as i64 - n_debates as i64;
    let solos = n_debates as i64 - surplus.div_euclid(2);
    solos.max(0) as usize
}

/// Importance shift for one seat of a voting panel.
///
/// In the more important half of panel debates the third seat may be
/// filled by a weaker adjudicator than the first two.
pub fn panel_seat_adjustment(debate_index: usize, n_panel_debates: usize, seat: usize) -> f64 {
    if seat == PANEL_SIZE - 1 && 2 * debate_index < n_panel_debates {
        -1.0
    } else {
        0.0
    }
}

/// Voters per debate under consensus ballots.
///
/// Everyone gets `n_voting / n_debates`; the remainder goes one each to the
/// first (most important) debates.
pub fn consensus_seats(n_debates: usize, n_voting: usize) -> Vec<usize> {
    if n_debates == 0 {
        return Vec::new();
    }
    let floor = n_voting / n_debates;
    let bigger = n_voting % n_debates;
    (0..n_debates)
        .map(|i| if i < bigger { floor + 1 } else { floor })
        .collect()
}

/// Importance shift for seat `seat` of a consensus panel.
///
/// Each further seat is costed one step lower, so the chair seat demands
/// the strongest adjudicator.
pub fn consensus_seat_adjustment(seat: usize) -> f64 {
    -(seat as f64)
}

/// Trainee seats are costed two steps below the debate.
pub const TRAINEE_ADJUSTMENT: f64 = -2.0;
