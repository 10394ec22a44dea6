//! Room model.
//!
//! Rooms are the spatial resources sessions are assigned to. Each room has
//! a seating capacity, a kind (lecture room or laboratory), and ownership
//! metadata the surrounding application uses for cross-college sharing.

use serde::{Deserialize, Serialize};

/// A room available for scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: u32,
    /// Human-readable name (e.g. "NB-204").
    pub name: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Room classification.
    #[serde(rename = "type")]
    pub kind: RoomKind,
    /// Owning college, if the room is not shared campus-wide.
    pub owner_college_id: Option<u32>,
    /// Whether any college may book this room.
    pub is_general_use: bool,
}

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// Standard lecture room.
    Lecture,
    /// Laboratory.
    Lab,
}

impl Room {
    /// Creates a new room with capacity 0.
    pub fn new(id: u32, kind: RoomKind) -> Self {
        Self {
            id,
            name: String::new(),
            capacity: 0,
            kind,
            owner_college_id: None,
            is_general_use: true,
        }
    }

    /// Creates a lecture room.
    pub fn lecture(id: u32) -> Self {
        Self::new(id, RoomKind::Lecture)
    }

    /// Creates a laboratory.
    pub fn lab(id: u32) -> Self {
        Self::new(id, RoomKind::Lab)
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the seating capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the owning college and marks the room college-restricted.
    pub fn with_owner_college(mut self, college_id: u32) -> Self {
        self.owner_college_id = Some(college_id);
        self.is_general_use = false;
        self
    }

    /// Whether the room seats at least `students`.
    #[inline]
    pub fn fits(&self, students: u32) -> bool {
        self.capacity >= students
    }
}
