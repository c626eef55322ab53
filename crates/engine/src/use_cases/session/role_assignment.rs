//! DM role notifications.
//!
//! Turns DM slot transitions into the messages members must observe:
//!
//! - into `Assigned`: `AssignDm` to the new DM, then `DmAssigned` and a
//!   `SyncPlayerData` re-sync request to everyone else
//! - into `Vacant` by departure: `DmRemoved` to the remaining members

use tablerelay_domain::{ConnectionId, Departure, DmTransition};
use tablerelay_shared::ServerMessage;

use crate::use_cases::routing::Delivery;

/// Deliveries announcing `transition` to `members`.
pub fn announce_transition(transition: DmTransition, members: &[ConnectionId]) -> Vec<Delivery> {
    match transition {
        DmTransition::Assigned { dm, previous } => {
            tracing::info!(dm = %dm, previous = ?previous.map(|p| p.to_string()), "DM assigned");
            let rest: Vec<ConnectionId> = members.iter().copied().filter(|m| *m != dm).collect();
            let mut deliveries = vec![Delivery::to(dm, ServerMessage::AssignDm)];
            if !rest.is_empty() {
                deliveries.push(Delivery::to_all(
                    rest.clone(),
                    ServerMessage::DmAssigned { dm: dm.into() },
                ));
                deliveries.push(Delivery::to_all(rest, ServerMessage::SyncPlayerData));
            }
            deliveries
        }
        DmTransition::Vacated { previous } => {
            tracing::info!(previous = %previous, "DM removed");
            if members.is_empty() {
                return Vec::new();
            }
            vec![Delivery::to_all(
                members.to_vec(),
                ServerMessage::DmRemoved {
                    previous: previous.into(),
                },
            )]
        }
    }
}

/// Deliveries for one member leaving: vacancy, reassignment, then the
/// departure itself, all to the remaining members.
pub fn announce_departure(departure: &Departure) -> Vec<Delivery> {
    let mut deliveries = Vec::new();
    if let Some(vacated) = departure.vacated {
        deliveries.extend(announce_transition(vacated, &departure.remaining));
    }
    if let Some(reassigned) = departure.reassigned {
        deliveries.extend(announce_transition(reassigned, &departure.remaining));
    }
    if !departure.remaining.is_empty() {
        deliveries.push(Delivery::to_all(
            departure.remaining.clone(),
            ServerMessage::RemovePlayer {
                player: departure.departed.to_string(),
            },
        ));
    }
    deliveries
}
