use moodmix_agent::MoodAgent;
use moodmix_rooms::{RoomBlender, RoomRegistry};

#[derive(Clone)]
pub struct AppState {
    agent: MoodAgent,
    blender: RoomBlender,
    rooms: RoomRegistry,
}

impl AppState {
    pub fn new(agent: MoodAgent, blender: RoomBlender, rooms: RoomRegistry) -> Self {
        Self {
            agent,
            blender,
            rooms,
        }
    }

    pub fn agent(&self) -> &MoodAgent {
        &self.agent
    }

    pub fn blender(&self) -> &RoomBlender {
        &self.blender
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MoodAgent::default(), RoomBlender::default(), RoomRegistry::new())
    }
}
