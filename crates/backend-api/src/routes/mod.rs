pub mod agent;
pub mod emotion;
pub mod health;
pub mod rooms;
