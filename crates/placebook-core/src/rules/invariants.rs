//! Membership invariants between `Place.creator` and `User.places`
//!
//! At every commit boundary a place is listed by exactly its creator, and
//! every listed id refers to an existing place created by that user. These
//! checks run over a loaded snapshot and never touch storage.

use std::collections::HashMap;

use crate::model::{Place, User};

/// A single violated membership rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipIssue {
    /// Place exists but its creator does not list it
    Unlisted { place_id: String, creator: String },
    /// Place names a creator that does not exist
    MissingCreator { place_id: String, creator: String },
    /// User lists a place id that does not exist
    Dangling { user_id: String, place_id: String },
    /// User lists a place created by someone else
    Misattributed {
        user_id: String,
        place_id: String,
        creator: String,
    },
}

impl std::fmt::Display for MembershipIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipIssue::Unlisted { place_id, creator } => {
                write!(f, "place {} is not listed by its creator {}", place_id, creator)
            }
            MembershipIssue::MissingCreator { place_id, creator } => {
                write!(f, "place {} points to unknown user {}", place_id, creator)
            }
            MembershipIssue::Dangling { user_id, place_id } => {
                write!(f, "user {} lists unknown place {}", user_id, place_id)
            }
            MembershipIssue::Misattributed {
                user_id,
                place_id,
                creator,
            } => write!(
                f,
                "user {} lists place {} created by {}",
                user_id, place_id, creator
            ),
        }
    }
}

/// Places missing from their creator's list, or whose creator is unknown
pub fn find_unlisted_places(places: &[Place], users: &[User]) -> Vec<MembershipIssue> {
    let by_id: HashMap<&str, &User> = users.iter().map(|u| (u.id.as_str(), u)).collect();

    places
        .iter()
        .filter_map(|place| match by_id.get(place.creator.as_str()) {
            None => Some(MembershipIssue::MissingCreator {
                place_id: place.id.clone(),
                creator: place.creator.clone(),
            }),
            Some(user) if !user.owns(&place.id) => Some(MembershipIssue::Unlisted {
                place_id: place.id.clone(),
                creator: place.creator.clone(),
            }),
            Some(_) => None,
        })
        .collect()
}

/// Membership entries pointing at missing places or at someone else's place
pub fn find_bad_memberships(places: &[Place], users: &[User]) -> Vec<MembershipIssue> {
    let creators: HashMap<&str, &str> = places
        .iter()
        .map(|p| (p.id.as_str(), p.creator.as_str()))
        .collect();

    let mut issues = Vec::new();
    for user in users {
        for place_id in &user.places {
            match creators.get(place_id.as_str()) {
                None => issues.push(MembershipIssue::Dangling {
                    user_id: user.id.clone(),
                    place_id: place_id.clone(),
                }),
                Some(creator) if *creator != user.id => {
                    issues.push(MembershipIssue::Misattributed {
                        user_id: user.id.clone(),
                        place_id: place_id.clone(),
                        creator: creator.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
    }
    issues
}

/// All membership issues, unlisted places first
pub fn find_membership_issues(places: &[Place], users: &[User]) -> Vec<MembershipIssue> {
    let mut issues = find_unlisted_places(places, users);
    issues.extend(find_bad_memberships(places, users));
    issues
}
