//! Observer seam: event systems report notable transitions here.
//!
//! The observer is a world resource so systems can take it as `ResMut<O>`. The
//! engine never reads anything back from it.

use std::fmt;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::spatial::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKind {
    Rider,
    Driver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Request,
    Cancel,
    Pickup,
    Dropoff,
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubjectKind::Rider => "rider",
            SubjectKind::Driver => "driver",
        })
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::Request => "request",
            ActionKind::Cancel => "cancel",
            ActionKind::Pickup => "pickup",
            ActionKind::Dropoff => "dropoff",
        })
    }
}

/// Receives timestamped notifications from the event systems.
pub trait Observer: Resource {
    fn notify(
        &mut self,
        timestamp: u64,
        subject: SubjectKind,
        action: ActionKind,
        id: &str,
        location: Location,
    );
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub timestamp: u64,
    pub subject: SubjectKind,
    pub action: ActionKind,
    pub id: String,
    pub location: Location,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} {} at {}",
            self.timestamp, self.subject, self.id, self.action, self.location
        )
    }
}
