//! Bomber patrol sweep.
//!
//! A bomber visits every site that existed when it was built, always
//! heading for the nearest one it has not seen yet, then returns to its
//! start site and parks there for good.

use std::collections::BTreeMap;

use crate::math::Point;
use crate::sites::Site;
use crate::spaceship::{ShipKind, Spaceship};

/// Nearest pending site to `from`, or `start` when none are left.
///
/// Ties go to the earlier entry in `pending`.
fn next_site<'a>(
    start: &'a str,
    pending: &'a [String],
    sites: &BTreeMap<String, Site>,
    from: Point,
) -> &'a str {
    let mut best: Option<(&str, f64)> = None;
    for name in pending {
        let Some(site) = sites.get(name) else {
            continue;
        };
        let distance = site.location().distance(from);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((name.as_str(), distance));
        }
    }
    best.map_or(start, |(name, _)| name)
}

/// Retarget after the bomber has moved this tick.
pub(crate) fn patrol_step(ship: &mut Spaceship, sites: &BTreeMap<String, Site>) {
    let here = ship.location();
    let ShipKind::Bomber { start, pending } = ship.kind_mut() else {
        return;
    };

    let reached = pending
        .iter()
        .position(|name| sites.get(name).is_some_and(|site| site.location() == here));

    let at_start = sites
        .get(start.as_str())
        .is_some_and(|site| site.location() == here);

    let next = match reached {
        Some(index) => {
            pending.remove(index);
            next_site(start, pending, sites, here).to_string()
        }
        None if at_start => next_site(start, pending, sites, here).to_string(),
        None => return,
    };

    if let Some(site) = sites.get(&next) {
        tracing::debug!(bomber = ship.name(), next = %next, "Bomber retargeting");
        ship.steer_to(site);
    }
}
