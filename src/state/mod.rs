pub mod lobby;
pub mod registry;

pub use lobby::{Departure, Lobby, LobbyId, LobbyPhase, Participant, SPAWN_POSITION};
pub use registry::LobbyRegistry;
