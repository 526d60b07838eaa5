//! Test fixtures shared by the unit tests.

use crate::tracked::Tracked;

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: u32,
    pub group: Option<String>,
    pub done: bool,
    pub weight: i64,
    pub created_at: i64,
}

impl Task {
    pub fn new(id: u32, group: &str, done: bool) -> Self {
        Self {
            id,
            group: Some(group.to_string()),
            done,
            weight: 0,
            created_at: id as i64,
        }
    }

    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = weight;
        self
    }
}

impl Tracked for Task {
    type Id = u32;
    type Group = String;
    type Status = bool;

    fn id(&self) -> u32 {
        self.id
    }

    fn group(&self) -> Option<String> {
        self.group.clone()
    }

    fn status(&self) -> bool {
        self.done
    }

    fn set_status(&mut self, status: bool) {
        self.done = status;
    }

    fn weight(&self) -> i64 {
        self.weight
    }
}
